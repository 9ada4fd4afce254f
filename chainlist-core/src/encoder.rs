//! List dump encoding
//!
//! Layout:
//! 1. Header (30 bytes, see [`DumpHeader`])
//! 2. Payload, one of:
//!    - fixed-size: `elem elem ... elem` when every element has the same length
//!    - variable-size: `len elem len elem ...` with 4-byte big-endian lengths
//! 3. Terminator (4 bytes, big-endian), equal to the header's terminator
//!
//! The encoder first assumes every element is as long as the first one. The
//! first element of a different length discards what was written so far and
//! the whole payload is emitted again in variable-size form.

use crate::constants::{DUMP_HEADER_LEN, LENGTH_PREFIX_LEN, TERMINATOR_LEN};
use crate::error::ListError;
use crate::list::List;
use crate::types::{DumpHeader, RawElement};
use alloc::format;
use bytes::{BufMut, Bytes, BytesMut};
use rand::Rng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(feature = "logging")]
use tracing::debug;

/// Outcome of one pass over the elements
enum Encoded {
    /// Every element was written
    Complete { total_len: u64, element_len: usize },
    /// Fixed-size speculation failed at this element index
    SizeChanged { index: usize },
}

impl<T: RawElement, Q: ?Sized> List<T, Q> {
    /// Encode the list into a complete dump
    ///
    /// Requires a serializer or a meter. Each dump carries a fresh random
    /// terminator drawn from the list's generator.
    pub fn dump_to_bytes(&mut self) -> Result<Bytes, ListError> {
        self.encode().map(|(_, bytes)| bytes)
    }

    /// Write a dump to `writer`, returning the payload length in bytes
    pub fn dump_to_stream<W: Write>(&mut self, writer: &mut W) -> Result<usize, ListError> {
        let (header, bytes) = self.encode()?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(header.total_len as usize)
    }

    /// Write a dump to the file at `path`, creating or truncating it
    pub fn dump_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, ListError> {
        let (header, bytes) = self.encode()?;
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(header.total_len as usize)
    }

    pub(crate) fn encode(&mut self) -> Result<(DumpHeader, Bytes), ListError> {
        if !self.caps.has_serializer() && !self.caps.has_meter() {
            return Err(ListError::Unsupported("meter or serializer"));
        }

        let count = u32::try_from(self.len).map_err(|_| ListError::PayloadTooLarge(self.len as u64))?;
        let mut header = DumpHeader::new(timestamp_micros(), self.rng.gen(), count);

        let mut buf = BytesMut::with_capacity(DUMP_HEADER_LEN + TERMINATOR_LEN);
        buf.put_bytes(0, DUMP_HEADER_LEN);

        let (total_len, element_len) = match self.encode_payload(&mut buf, true)? {
            Encoded::Complete {
                total_len,
                element_len,
            } => (total_len, element_len),
            Encoded::SizeChanged { index } => {
                #[cfg(feature = "logging")]
                debug!(
                    "Element {} breaks fixed-size encoding, re-emitting {} elements with length prefixes",
                    index, self.len
                );
                #[cfg(not(feature = "logging"))]
                let _ = index;

                buf.truncate(DUMP_HEADER_LEN);
                match self.encode_payload(&mut buf, false)? {
                    Encoded::Complete { total_len, .. } => (total_len, 0),
                    Encoded::SizeChanged { index } => {
                        return Err(ListError::InvalidArgument(format!(
                            "variable-size encoding rejected element {}",
                            index
                        )))
                    }
                }
            }
        };

        header.total_len =
            u32::try_from(total_len).map_err(|_| ListError::PayloadTooLarge(total_len))?;
        header.element_len = element_len as u32;

        buf.put_u32(header.terminator);
        buf[..DUMP_HEADER_LEN].copy_from_slice(&header.to_bytes());

        #[cfg(feature = "logging")]
        debug!(
            "Encoded {} elements, {} payload bytes, element_len {}",
            header.count, header.total_len, header.element_len
        );

        Ok((header, buf.freeze()))
    }

    /// Write every element after the header. With `speculate`, elements are
    /// written back to back for as long as they share the first one's length.
    fn encode_payload(&self, buf: &mut BytesMut, speculate: bool) -> Result<Encoded, ListError> {
        let mut total_len = 0u64;
        let mut fixed: Option<usize> = None;

        for (index, element) in self.iter().enumerate() {
            let bytes = self.element_bytes(element)?;
            let len = bytes.len();
            if len > u32::MAX as usize {
                return Err(ListError::PayloadTooLarge(len as u64));
            }

            if speculate {
                match fixed {
                    None if len == 0 => return Ok(Encoded::SizeChanged { index }),
                    None => fixed = Some(len),
                    Some(expected) if expected != len => {
                        return Ok(Encoded::SizeChanged { index })
                    }
                    Some(_) => {}
                }
            } else {
                buf.reserve(LENGTH_PREFIX_LEN + len);
                buf.put_u32(len as u32);
            }

            buf.put_slice(&bytes);
            total_len += len as u64;
        }

        Ok(Encoded::Complete {
            total_len,
            element_len: fixed.unwrap_or(0),
        })
    }

    /// Serialized form of one element: the serializer's output if installed,
    /// otherwise the first `meter(element)` raw bytes
    fn element_bytes(&self, element: &T) -> Result<Bytes, ListError> {
        if let Some(serializer) = &self.caps.serializer {
            return Ok(serializer(element));
        }

        let meter = self
            .caps
            .meter
            .as_ref()
            .ok_or(ListError::Unsupported("meter or serializer"))?;
        let raw = element.to_raw()?;
        let len = meter(element);
        if len > raw.len() {
            return Err(ListError::InvalidArgument(format!(
                "meter reports {} bytes for an element of {}",
                len,
                raw.len()
            )));
        }
        Ok(raw.slice(..len))
    }
}

fn timestamp_micros() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ListConfig;

    fn meter_list(items: &[&[u8]]) -> List<Vec<u8>> {
        let mut list = List::with_config(ListConfig::seeded(11));
        list.append_all(items.iter().map(|i| i.to_vec())).unwrap();
        list.set_meter(|el: &Vec<u8>| el.len());
        list
    }

    #[test]
    fn test_dump_requires_meter_or_serializer() {
        let mut list = List::<Vec<u8>>::new();
        list.append(vec![1]).unwrap();
        assert_eq!(
            list.dump_to_bytes(),
            Err(ListError::Unsupported("meter or serializer"))
        );
    }

    #[test]
    fn test_fixed_size_dump_layout() {
        let mut list = meter_list(&[b"abcd", b"efgh", b"ijkl"]);
        let (header, bytes) = list.encode().unwrap();

        assert_eq!(header.element_len, 4);
        assert_eq!(header.total_len, 12);
        assert_eq!(header.count, 3);
        assert_eq!(bytes.len(), DUMP_HEADER_LEN + 12 + TERMINATOR_LEN);
        assert_eq!(&bytes[DUMP_HEADER_LEN..DUMP_HEADER_LEN + 12], b"abcdefghijkl");
        assert_eq!(&bytes[bytes.len() - 4..], &header.terminator.to_be_bytes());
    }

    #[test]
    fn test_size_change_downgrades_to_variable() {
        let mut list = meter_list(&[b"abcd", b"efgh", b"ijkl", b"mnopqr"]);
        let (header, bytes) = list.encode().unwrap();

        assert_eq!(header.element_len, 0);
        assert_eq!(header.total_len, 18);
        assert_eq!(bytes.len(), DUMP_HEADER_LEN + 18 + 4 * LENGTH_PREFIX_LEN + TERMINATOR_LEN);
        let payload = &bytes[DUMP_HEADER_LEN..];
        assert_eq!(&payload[0..4], &4u32.to_be_bytes());
        assert_eq!(&payload[4..8], b"abcd");
        assert_eq!(&payload[24..28], &6u32.to_be_bytes());
        assert_eq!(&payload[28..34], b"mnopqr");
    }

    #[test]
    fn test_empty_list_dump() {
        let mut list = meter_list(&[]);
        let (header, bytes) = list.encode().unwrap();
        assert_eq!(header.count, 0);
        assert_eq!(header.total_len, 0);
        assert_eq!(header.element_len, 0);
        assert_eq!(bytes.len(), DUMP_HEADER_LEN + TERMINATOR_LEN);
    }

    #[test]
    fn test_meter_prefix_and_overrun() {
        let mut list = meter_list(&[b"abcdef", b"ghijkl"]);
        list.set_meter(|_| 2);
        let (header, bytes) = list.encode().unwrap();
        assert_eq!(header.element_len, 2);
        assert_eq!(&bytes[DUMP_HEADER_LEN..DUMP_HEADER_LEN + 4], b"abgh");

        list.set_meter(|_| 99);
        assert!(matches!(
            list.dump_to_bytes(),
            Err(ListError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_serializer_takes_precedence_over_meter() {
        let mut list = meter_list(&[b"a", b"b"]);
        list.set_serializer(|el: &Vec<u8>| Bytes::from(el.repeat(3)));
        let (header, _) = list.encode().unwrap();
        assert_eq!(header.element_len, 3);
        assert_eq!(header.total_len, 6);
    }

    #[test]
    fn test_terminator_changes_between_dumps() {
        let mut list = meter_list(&[b"x"]);
        let (first, _) = list.encode().unwrap();
        let (second, _) = list.encode().unwrap();
        assert_ne!(first.terminator, second.terminator);
    }
}
