//! Error types for list operations

use alloc::string::String;

/// Errors that can occur during list operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ListError {
    /// Position outside the valid range for the operation
    #[error("Position {pos} out of range for list of {len} elements")]
    PositionOutOfRange {
        /// The requested position.
        pos: usize,
        /// The list length at the time of the call.
        len: usize,
    },

    /// Sort direction of zero
    #[error("Invalid sort direction: {0}")]
    InvalidDirection(i32),

    /// Any other rejected argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A structural operation was attempted while an iteration is active
    #[error("List is busy: an iteration is active")]
    Busy,

    /// The capability required by the operation is not installed
    #[error("Operation unsupported: no {0} installed")]
    Unsupported(&'static str),

    /// Node or buffer allocation failed
    #[error("Out of memory")]
    OutOfMemory,

    /// Dump was written by an unknown format version
    #[error("Unsupported dump format version: {0}")]
    UnsupportedVersion(u16),

    /// Stream ended before the dump was complete
    #[error("Truncated dump: expected {expected} bytes, got {actual}")]
    Truncated {
        /// The number of bytes expected.
        expected: usize,
        /// The number of bytes actually found.
        actual: usize,
    },

    /// End marker does not match the terminator announced in the header
    #[error("Terminator mismatch: expected {expected:08x}, got {actual:08x}")]
    TerminatorMismatch {
        /// Terminator recorded in the header.
        expected: u32,
        /// Terminator found after the payload.
        actual: u32,
    },

    /// Payload bytes read do not add up to the header's total length
    #[error("Payload length mismatch: header says {expected}, read {actual}")]
    LengthMismatch {
        /// Total length recorded in the header.
        expected: u64,
        /// Payload bytes actually read.
        actual: u64,
    },

    /// Bytes remain in the stream after the end marker
    #[error("Trailing bytes after end marker")]
    TrailingBytes,

    /// Payload does not fit the 32-bit length fields of the header
    #[error("Payload of {0} bytes does not fit the dump format")]
    PayloadTooLarge(u64),

    /// IO error during read/write
    #[error("IO error: {0}")]
    Io(String),
}

impl ListError {
    /// True for every error raised by dump validation on restore
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            ListError::UnsupportedVersion(_)
                | ListError::Truncated { .. }
                | ListError::TerminatorMismatch { .. }
                | ListError::LengthMismatch { .. }
                | ListError::TrailingBytes
                | ListError::PayloadTooLarge(_)
        )
    }

    /// True when the call was rejected because an iteration is active
    pub fn is_busy(&self) -> bool {
        matches!(self, ListError::Busy)
    }
}

impl From<std::io::Error> for ListError {
    fn from(err: std::io::Error) -> Self {
        ListError::Io(err.to_string())
    }
}

impl From<alloc::collections::TryReserveError> for ListError {
    fn from(_: alloc::collections::TryReserveError) -> Self {
        ListError::OutOfMemory
    }
}
