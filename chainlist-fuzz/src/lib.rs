//! Fuzz entry points for chainlist-core
//!
//! To use with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Add a target calling `fuzz_restore` or `fuzz_ops`
//! 3. Run fuzzer: cargo fuzz run <target>

use bytes::Buf;
use chainlist_core::{Direction, List, ListConfig};

pub fn fuzz_restore(data: &[u8]) {
    let mut list: List<Vec<u8>> = List::new();

    // Try to restore - should never panic
    let _ = list.restore_from_bytes(data);

    // Whatever was appended must dump and restore cleanly
    list.set_meter(|el| el.len());
    if let Ok(dump) = list.dump_to_bytes() {
        let mut again: List<Vec<u8>> = List::new();
        let _ = again.restore_from_bytes(&dump);
        assert!(again.iter().eq(list.iter()));
    }
}

/// Drive a list with a byte-coded operation sequence and check it against a
/// `Vec` model after every step
pub fn fuzz_ops(data: &[u8]) {
    let mut buf = data;
    let mut list: List<u8> = List::with_config(ListConfig {
        spare_capacity: 3,
        seed: Some(0),
    });
    list.set_comparator(|a, b| a.cmp(b));
    let mut model: Vec<u8> = Vec::new();

    while buf.remaining() >= 2 {
        let op = buf.get_u8();
        let arg = buf.get_u8();

        match op % 6 {
            0 => {
                let pos = arg as usize % (model.len() + 1);
                if list.insert_at(pos, arg).is_ok() {
                    model.insert(pos, arg);
                }
            }
            1 => {
                let pos = arg as usize;
                match list.delete_at(pos) {
                    Ok(v) => assert_eq!(v, model.remove(pos)),
                    Err(_) => assert!(pos >= model.len() || list.is_iterating()),
                }
            }
            2 => {
                let direction = if arg % 2 == 0 {
                    Direction::Ascending
                } else {
                    Direction::Descending
                };
                if list.sort(direction).is_ok() {
                    model.sort();
                    if direction == Direction::Descending {
                        model.reverse();
                    }
                }
            }
            3 => {
                if list.is_iterating() {
                    list.iter_stop();
                } else {
                    list.iter_start();
                }
            }
            4 => {
                let _ = list.iter_next();
            }
            _ => {
                if let Ok(drained) = list.clear() {
                    assert_eq!(drained, model);
                    model.clear();
                }
            }
        }

        assert_eq!(list.len(), model.len());
        assert!(list.spare_count() <= 3);
        let median = match model.len() {
            0 => None,
            n => Some(&model[(n - 1) / 2]),
        };
        assert_eq!(list.mid(), median);
        assert!(list.iter().eq(model.iter()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzz_restore_empty() {
        fuzz_restore(&[]);
    }

    #[test]
    fn test_fuzz_restore_random() {
        fuzz_restore(&[0x00, 0x01, 0x56, 0x78, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_fuzz_restore_valid_dump() {
        let mut list: List<Vec<u8>> = List::with_config(ListConfig::seeded(1));
        list.append_all([b"ab".to_vec(), b"c".to_vec()]).unwrap();
        list.set_meter(|el| el.len());
        fuzz_restore(&list.dump_to_bytes().unwrap());
    }

    #[test]
    fn test_fuzz_ops_empty() {
        fuzz_ops(&[]);
    }

    #[test]
    fn test_fuzz_ops_mixed() {
        let mut ops = Vec::new();
        for i in 0..200u8 {
            ops.push(i.wrapping_mul(7));
            ops.push(i.wrapping_mul(13));
        }
        fuzz_ops(&ops);
    }

    #[test]
    fn test_fuzz_ops_busy_session() {
        // insert, start, delete (rejected), stop, delete
        fuzz_ops(&[0, 5, 3, 0, 1, 0, 3, 0, 1, 0]);
    }
}
