//! # Chainlist Core
//!
//! An ordered-sequence container with positional insert/delete, pluggable
//! comparison/search/size/serialization behavior, in-place sorting, an
//! exclusive iteration session and a self-describing binary dump format.
//!
//! ## Modules
//!
//! - `constants`: Dump format constants and engine limits
//! - `types`: Core types (ListConfig, Direction, DumpHeader, RawElement)
//! - `capability`: Comparator, seeker, meter, serializer and unserializer slots
//! - `list`: Positional list core (insert, delete, clear, seek)
//! - `cursor`: Iteration session and borrowing iterator
//! - `sort`: Randomized quicksort with selection sort for short runs
//! - `encoder`: Dump encoding
//! - `decoder`: Strict dump decoding
//!
//! ## Example
//!
//! ```
//! use chainlist_core::{Direction, List};
//!
//! let mut list: List<Vec<u8>> = List::new();
//! list.append(b"pear".to_vec()).unwrap();
//! list.append(b"fig".to_vec()).unwrap();
//! list.insert_at(1, b"apple".to_vec()).unwrap();
//!
//! list.set_comparator(|a, b| a.cmp(b));
//! list.sort(Direction::Ascending).unwrap();
//! assert_eq!(list.get(0).unwrap(), b"apple");
//!
//! list.set_meter(|el| el.len());
//! let dump = list.dump_to_bytes().unwrap();
//!
//! let mut restored: List<Vec<u8>> = List::new();
//! restored.restore_from_bytes(&dump).unwrap();
//! assert!(restored.iter().eq(list.iter()));
//! ```

#![warn(missing_docs)]

extern crate alloc;

pub mod capability;
pub mod constants;
pub mod cursor;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod list;
pub mod sort;
mod store;
pub mod types;

// Re-export commonly used types
pub use capability::Capabilities;
pub use cursor::Iter;
pub use error::ListError;
pub use list::List;
pub use types::{Direction, DumpHeader, ListConfig, RawElement};

/// Result type alias for list operations
pub type Result<T> = core::result::Result<T, ListError>;
