//! Property-based tests using proptest

use bytes::Bytes;
use chainlist_core::{Direction, List, ListConfig, ListError};
use proptest::prelude::*;

/// One positional edit applied to both the list and a `Vec` model
#[derive(Debug, Clone)]
enum Edit {
    Insert(usize, u16),
    Delete(usize),
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        3 => (any::<usize>(), any::<u16>()).prop_map(|(p, v)| Edit::Insert(p, v)),
        2 => any::<usize>().prop_map(Edit::Delete),
    ]
}

fn sorted_list(values: &[i64], seed: u64) -> List<i64> {
    let mut list = List::with_config(ListConfig::seeded(seed));
    list.append_all(values.iter().copied()).unwrap();
    list.set_comparator(|a, b| a.cmp(b));
    list
}

proptest! {
    #[test]
    fn prop_edits_match_vec_model(edits in prop::collection::vec(edit_strategy(), 0..200)) {
        let mut list = List::<u16>::with_config(ListConfig { spare_capacity: 4, seed: Some(0) });
        let mut model: Vec<u16> = Vec::new();

        for edit in edits {
            match edit {
                Edit::Insert(pos, value) => {
                    let pos = pos % (model.len() + 1);
                    list.insert_at(pos, value).unwrap();
                    model.insert(pos, value);
                }
                Edit::Delete(pos) => {
                    if model.is_empty() {
                        let rejected =
                            matches!(list.delete_at(pos), Err(ListError::PositionOutOfRange { .. }));
                        prop_assert!(rejected);
                        continue;
                    }
                    let pos = pos % model.len();
                    prop_assert_eq!(list.delete_at(pos).unwrap(), model.remove(pos));
                }
            }

            prop_assert_eq!(list.len(), model.len());
            prop_assert!(list.spare_count() <= 4);
            match model.len() {
                0 => prop_assert!(list.mid().is_none()),
                n => prop_assert_eq!(list.mid(), Some(&model[(n - 1) / 2])),
            }
        }

        prop_assert!(list.iter().eq(model.iter()));
        prop_assert!(list.iter().rev().eq(model.iter().rev()));
        for (i, value) in model.iter().enumerate() {
            prop_assert_eq!(list.get(i), Some(value));
        }
    }

    #[test]
    fn prop_insert_then_delete_restores(
        values in prop::collection::vec(any::<u16>(), 0..64),
        pos in any::<usize>(),
        extra in any::<u16>()
    ) {
        let mut list = List::<u16>::new();
        list.append_all(values.iter().copied()).unwrap();
        let pos = pos % (values.len() + 1);

        list.insert_at(pos, extra).unwrap();
        prop_assert_eq!(list.get(pos), Some(&extra));
        prop_assert_eq!(list.delete_at(pos).unwrap(), extra);
        prop_assert!(list.iter().eq(values.iter()));
    }

    #[test]
    fn prop_sort_matches_std(
        values in prop::collection::vec(-50i64..50, 0..300),
        seed in any::<u64>()
    ) {
        let mut list = sorted_list(&values, seed);
        let mut expected = values.clone();
        expected.sort();

        list.sort(Direction::Ascending).unwrap();
        prop_assert!(list.iter().eq(expected.iter()));
        if !expected.is_empty() {
            prop_assert_eq!(list.mid(), Some(&expected[(expected.len() - 1) / 2]));
        }

        list.sort(Direction::Descending).unwrap();
        prop_assert!(list.iter().eq(expected.iter().rev()));
    }

    #[test]
    fn prop_sort_distinct_reverse_and_idempotent(
        values in prop::collection::btree_set(any::<i64>(), 0..100),
        seed in any::<u64>()
    ) {
        let values: Vec<i64> = values.into_iter().collect();
        let mut list = sorted_list(&values, seed);

        list.sort(Direction::Descending).unwrap();
        let descending: Vec<i64> = list.iter().copied().collect();
        list.sort(Direction::Descending).unwrap();
        prop_assert!(list.iter().eq(descending.iter()));

        list.sort(Direction::Ascending).unwrap();
        prop_assert!(list.iter().eq(descending.iter().rev()));
    }

    #[test]
    fn prop_meter_dump_restore_identity(
        items in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..16), 0..40)
    ) {
        let mut source: List<Vec<u8>> = List::with_config(ListConfig::seeded(7));
        source.append_all(items.iter().cloned()).unwrap();
        source.set_meter(|el| el.len());
        let dump = source.dump_to_bytes().unwrap();

        let mut target: List<Vec<u8>> = List::new();
        let restored = target.restore_from_bytes(&dump).unwrap();
        prop_assert_eq!(restored, items.iter().map(Vec::len).sum::<usize>());
        prop_assert!(target.iter().eq(items.iter()));
    }

    #[test]
    fn prop_serializer_dump_restore_identity(
        items in prop::collection::vec(any::<i32>(), 0..40)
    ) {
        let mut source: List<i32> = List::with_config(ListConfig::seeded(9));
        source.append_all(items.iter().copied()).unwrap();
        source.set_serializer(|el| Bytes::from(el.to_string().into_bytes()));
        let dump = source.dump_to_bytes().unwrap();

        let mut target: List<i32> = List::new();
        target.set_unserializer(|raw| {
            let text = core::str::from_utf8(raw)
                .map_err(|e| ListError::InvalidArgument(e.to_string()))?;
            let value: i32 = text
                .parse()
                .map_err(|_| ListError::InvalidArgument(text.to_string()))?;
            Ok((value, core::mem::size_of::<i32>()))
        });
        target.restore_from_bytes(&dump).unwrap();
        prop_assert!(target.iter().eq(items.iter()));
    }

    #[test]
    fn prop_truncated_dump_is_rejected(
        items in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..8), 1..20),
        cut in any::<usize>()
    ) {
        let mut source: List<Vec<u8>> = List::with_config(ListConfig::seeded(3));
        source.append_all(items.iter().cloned()).unwrap();
        source.set_meter(|el| el.len());
        let dump = source.dump_to_bytes().unwrap();
        let cut = cut % dump.len();

        let mut target: List<Vec<u8>> = List::new();
        let err = target.restore_from_bytes(&dump[..cut]).unwrap_err();
        prop_assert!(err.is_format_error());

        // Whatever was appended is a prefix of the source, element for element
        prop_assert!(target.len() <= items.len());
        prop_assert!(target.iter().eq(items[..target.len()].iter()));
    }

    #[test]
    fn prop_restore_never_panics(
        data in prop::collection::vec(any::<u8>(), 0..512)
    ) {
        let mut list: List<Vec<u8>> = List::new();
        let _ = list.restore_from_bytes(&data);
    }
}
