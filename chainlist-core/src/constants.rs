//! Constants and limits for the list engine and its dump format

/// Current dump format version
pub const DUMP_FORMAT_VERSION: u16 = 1;

/// Dump header size
/// 2 (version) + 8 (timestamp) + 4 (terminator) + 4 (total_len)
/// + 4 (count) + 4 (element_len) + 4 (hash) = 30 bytes
pub const DUMP_HEADER_LEN: usize = 30;

/// Size of the per-element length prefix used by variable-size dumps
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Size of the random terminator written after the payload
pub const TERMINATOR_LEN: usize = 4;

/// Default number of recycled node shells a list keeps around
pub const DEFAULT_SPARE_CAPACITY: usize = 5;

/// Partitions at or below this length are sorted with selection sort
pub const SELECTION_SORT_THRESHOLD: usize = 24;

/// Upper bound on what restore reserves for a single element before its
/// bytes have actually been read from the stream
pub const MAX_PREALLOC: usize = 64 * 1024;

/// Arena index of the head sentinel
pub(crate) const HEAD: usize = 0;

/// Arena index of the tail sentinel
pub(crate) const TAIL: usize = 1;
