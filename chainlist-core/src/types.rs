//! Core types shared by the list, the sort engine and the dump codec

use crate::constants::{DEFAULT_SPARE_CAPACITY, DUMP_FORMAT_VERSION, DUMP_HEADER_LEN};
use crate::error::ListError;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use core::cmp::Ordering;
use serde::{Deserialize, Serialize};

/// Per-list configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Maximum number of recycled node shells kept on the free list
    pub spare_capacity: usize,

    /// Seed for the list's pseudo-random generator (pivots, terminators).
    /// `None` seeds from the operating system.
    pub seed: Option<u64>,
}

impl ListConfig {
    /// Config with a fixed seed, for reproducible sorts and dumps
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            spare_capacity: DEFAULT_SPARE_CAPACITY,
            seed: None,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Smallest first
    Ascending,
    /// Largest first
    Descending,
}

impl Direction {
    /// Map a signed direction: positive is ascending, negative descending
    pub fn from_sign(sign: i32) -> Result<Self, ListError> {
        match sign.cmp(&0) {
            Ordering::Greater => Ok(Direction::Ascending),
            Ordering::Less => Ok(Direction::Descending),
            Ordering::Equal => Err(ListError::InvalidDirection(sign)),
        }
    }

    /// Orient a comparator result so that `Less` always means "goes first"
    pub fn orient(self, ord: Ordering) -> Ordering {
        match self {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    }
}

/// Fixed-size header at the start of every dump
///
/// Multi-byte fields are big-endian except `timestamp`, which is written in
/// native byte order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpHeader {
    /// Format version
    pub version: u16,

    /// Microseconds since the Unix epoch at dump time
    pub timestamp: i64,

    /// Random end marker, regenerated for every dump
    pub terminator: u32,

    /// Sum of all element payload lengths in bytes
    pub total_len: u32,

    /// Number of elements
    pub count: u32,

    /// Size of every element for fixed-size dumps, 0 for variable-size
    pub element_len: u32,

    /// Reserved list hash, always 0
    pub hash: u32,
}

impl DumpHeader {
    /// Create a header for a dump about to be written
    pub fn new(timestamp: i64, terminator: u32, count: u32) -> Self {
        Self {
            version: DUMP_FORMAT_VERSION,
            timestamp,
            terminator,
            total_len: 0,
            count,
            element_len: 0,
            hash: 0,
        }
    }

    /// True when every element has the same size and no length prefixes are used
    pub fn is_fixed(&self) -> bool {
        self.element_len > 0
    }

    /// Validate the header
    pub fn validate(&self) -> Result<(), ListError> {
        if self.version != DUMP_FORMAT_VERSION {
            return Err(ListError::UnsupportedVersion(self.version));
        }
        Ok(())
    }

    /// Serialize the header into its on-disk layout
    pub fn to_bytes(&self) -> [u8; DUMP_HEADER_LEN] {
        let mut buf = BytesMut::with_capacity(DUMP_HEADER_LEN);
        buf.put_u16(self.version);
        buf.put_slice(&self.timestamp.to_ne_bytes());
        buf.put_u32(self.terminator);
        buf.put_u32(self.total_len);
        buf.put_u32(self.count);
        buf.put_u32(self.element_len);
        buf.put_u32(self.hash);

        let mut out = [0u8; DUMP_HEADER_LEN];
        out.copy_from_slice(&buf);
        out
    }

    /// Parse a header from exactly `DUMP_HEADER_LEN` bytes
    pub fn from_bytes(raw: &[u8; DUMP_HEADER_LEN]) -> Self {
        let mut buf = &raw[..];
        let version = buf.get_u16();
        let timestamp = buf.get_i64_ne();
        Self {
            version,
            timestamp,
            terminator: buf.get_u32(),
            total_len: buf.get_u32(),
            count: buf.get_u32(),
            element_len: buf.get_u32(),
            hash: buf.get_u32(),
        }
    }
}

/// Raw byte view of an element, used when no serializer is installed
///
/// Dumping with only a meter writes the first `meter(element)` bytes of
/// [`RawElement::to_raw`]; restoring without an unserializer rebuilds each
/// element with [`RawElement::from_raw`]. Types that always persist through a
/// serializer can implement this trait with an empty body.
pub trait RawElement: Sized {
    /// Bytes backing this element
    fn to_raw(&self) -> Result<Bytes, ListError> {
        Err(ListError::Unsupported("raw byte view"))
    }

    /// Rebuild an element from bytes read out of a dump
    fn from_raw(_bytes: &[u8]) -> Result<Self, ListError> {
        Err(ListError::Unsupported("raw byte view"))
    }
}

impl RawElement for Vec<u8> {
    fn to_raw(&self) -> Result<Bytes, ListError> {
        Ok(Bytes::copy_from_slice(self))
    }

    fn from_raw(bytes: &[u8]) -> Result<Self, ListError> {
        Ok(bytes.to_vec())
    }
}

impl RawElement for Bytes {
    fn to_raw(&self) -> Result<Bytes, ListError> {
        Ok(self.clone())
    }

    fn from_raw(bytes: &[u8]) -> Result<Self, ListError> {
        Ok(Bytes::copy_from_slice(bytes))
    }
}

impl RawElement for Box<[u8]> {
    fn to_raw(&self) -> Result<Bytes, ListError> {
        Ok(Bytes::copy_from_slice(self))
    }

    fn from_raw(bytes: &[u8]) -> Result<Self, ListError> {
        Ok(bytes.into())
    }
}

impl RawElement for String {
    fn to_raw(&self) -> Result<Bytes, ListError> {
        Ok(Bytes::copy_from_slice(self.as_bytes()))
    }

    fn from_raw(bytes: &[u8]) -> Result<Self, ListError> {
        String::from_utf8(bytes.to_vec()).map_err(|e| ListError::InvalidArgument(e.to_string()))
    }
}

// Integers dump as their big-endian bytes
macro_rules! raw_element_int {
    ($($ty:ty),*) => {
        $(
            impl RawElement for $ty {
                fn to_raw(&self) -> Result<Bytes, ListError> {
                    Ok(Bytes::copy_from_slice(&self.to_be_bytes()))
                }

                fn from_raw(bytes: &[u8]) -> Result<Self, ListError> {
                    let arr = bytes.try_into().map_err(|_| {
                        ListError::InvalidArgument(alloc::format!(
                            "expected {} bytes for {}, got {}",
                            core::mem::size_of::<$ty>(),
                            stringify!($ty),
                            bytes.len()
                        ))
                    })?;
                    Ok(<$ty>::from_be_bytes(arr))
                }
            }
        )*
    };
}

raw_element_int!(u8, u16, u32, u64, i8, i16, i32, i64);
