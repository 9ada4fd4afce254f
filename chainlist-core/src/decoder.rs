//! List dump decoding (strict mode)

use crate::constants::{DUMP_HEADER_LEN, LENGTH_PREFIX_LEN, MAX_PREALLOC, TERMINATOR_LEN};
use crate::error::ListError;
use crate::list::List;
use crate::types::{DumpHeader, RawElement};
use alloc::vec::Vec;
use std::fs::File;
use std::io::{BufReader, Cursor, ErrorKind, Read};
use std::path::Path;

#[cfg(feature = "logging")]
use tracing::{debug, warn};

impl DumpHeader {
    /// Read and validate a dump header from `reader`
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, ListError> {
        let raw = read_block(reader, DUMP_HEADER_LEN)?;
        let mut fixed = [0u8; DUMP_HEADER_LEN];
        fixed.copy_from_slice(&raw);

        let header = DumpHeader::from_bytes(&fixed);
        header.validate()?;
        Ok(header)
    }
}

impl<T: RawElement, Q: ?Sized> List<T, Q> {
    /// Append the elements of a dump read from `reader`
    ///
    /// This function performs strict validation:
    /// - Validates version
    /// - Validates that every element is complete
    /// - Validates the terminator and the total payload length
    /// - Validates that nothing follows the terminator
    ///
    /// Returns the in-memory length of the restored elements. Elements read
    /// before a failure stay appended.
    pub fn restore_from_stream<R: Read>(&mut self, reader: &mut R) -> Result<usize, ListError> {
        self.ensure_idle()?;

        let header = DumpHeader::read_from(reader)?;
        let mut payload_read = 0u64;
        let mut memory_len = 0usize;

        for _ in 0..header.count {
            let len = if header.is_fixed() {
                header.element_len as usize
            } else {
                read_u32(reader)? as usize
            };

            let block = read_block(reader, len)?;
            payload_read += len as u64;

            let (element, element_memory) = match &self.caps.unserializer {
                Some(unserializer) => unserializer(&block)?,
                None => (T::from_raw(&block)?, block.len()),
            };
            self.append(element)?;
            memory_len += element_memory;
        }

        let terminator = read_u32(reader)?;

        if payload_read != header.total_len as u64 {
            #[cfg(feature = "logging")]
            warn!(
                "Payload length mismatch: header says {}, read {}",
                header.total_len, payload_read
            );
            return Err(ListError::LengthMismatch {
                expected: header.total_len as u64,
                actual: payload_read,
            });
        }

        if terminator != header.terminator {
            #[cfg(feature = "logging")]
            warn!(
                "Terminator mismatch: expected {:08x}, got {:08x}",
                header.terminator, terminator
            );
            return Err(ListError::TerminatorMismatch {
                expected: header.terminator,
                actual: terminator,
            });
        }

        let mut extra = [0u8; 1];
        if read_some(reader, &mut extra)? != 0 {
            return Err(ListError::TrailingBytes);
        }

        #[cfg(feature = "logging")]
        debug!(
            "Restored {} elements ({} payload bytes)",
            header.count, payload_read
        );

        Ok(memory_len)
    }

    /// Append the elements of an in-memory dump
    pub fn restore_from_bytes(&mut self, data: &[u8]) -> Result<usize, ListError> {
        let mut cursor = Cursor::new(data);
        self.restore_from_stream(&mut cursor)
    }

    /// Append the elements of the dump stored at `path`
    pub fn restore_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, ListError> {
        self.ensure_idle()?;
        let mut reader = BufReader::new(File::open(path)?);
        self.restore_from_stream(&mut reader)
    }
}

/// Read exactly `len` bytes, reporting a short stream as truncation
///
/// Memory is reserved as bytes arrive, so a corrupt length cannot force a
/// large allocation up front.
fn read_block<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u8>, ListError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len.min(MAX_PREALLOC))?;

    let got = reader.by_ref().take(len as u64).read_to_end(&mut buf)?;
    if got < len {
        return Err(ListError::Truncated {
            expected: len,
            actual: got,
        });
    }
    Ok(buf)
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32, ListError> {
    debug_assert_eq!(LENGTH_PREFIX_LEN, TERMINATOR_LEN);
    let raw = read_block(reader, LENGTH_PREFIX_LEN)?;
    Ok(u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

fn read_some<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, ListError> {
    loop {
        match reader.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}
