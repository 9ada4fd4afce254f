//! In-place sorting: randomized quicksort over node payloads, selection sort
//! for short partitions
//!
//! Only payloads move between nodes. Node identities and links never change.

use crate::constants::{HEAD, SELECTION_SORT_THRESHOLD, TAIL};
use crate::error::ListError;
use crate::list::List;
use crate::store::NodeStore;
use crate::types::Direction;
use alloc::vec::Vec;
use core::cmp::Ordering;
use rand::rngs::StdRng;
use rand::Rng;

#[cfg(feature = "logging")]
use tracing::{debug, trace};

/// Contiguous run of nodes, by list index and by node id
#[derive(Debug, Clone, Copy)]
struct Partition {
    first: usize,
    first_node: usize,
    last: usize,
    last_node: usize,
}

impl Partition {
    fn len(&self) -> usize {
        self.last - self.first + 1
    }
}

impl<T, Q: ?Sized> List<T, Q> {
    /// Sort the list in place with the installed comparator
    pub fn sort(&mut self, direction: Direction) -> Result<(), ListError> {
        self.ensure_idle()?;
        let comparator = self
            .caps
            .comparator
            .as_deref()
            .ok_or(ListError::Unsupported("comparator"))?;

        if self.len <= 1 {
            return Ok(());
        }

        #[cfg(feature = "logging")]
        debug!("Sorting {} elements {:?}", self.len, direction);

        let mut sorter = Sorter {
            store: &mut self.store,
            comparator,
            direction,
            rng: &mut self.rng,
        };
        let whole = Partition {
            first: 0,
            first_node: sorter.store.next(HEAD),
            last: self.len - 1,
            last_node: sorter.store.prev(TAIL),
        };
        sorter.run(whole);
        Ok(())
    }

    /// Sort with a signed direction: positive ascending, negative descending
    pub fn sort_by_sign(&mut self, sign: i32) -> Result<(), ListError> {
        self.sort(Direction::from_sign(sign)?)
    }
}

struct Sorter<'a, T> {
    store: &'a mut NodeStore<T>,
    comparator: &'a dyn Fn(&T, &T) -> Ordering,
    direction: Direction,
    rng: &'a mut StdRng,
}

impl<'a, T> Sorter<'a, T> {
    /// `Less` when the payload of `a` belongs before the payload of `b`
    fn order(&self, a: usize, b: usize) -> Ordering {
        let ord = match (self.store.data(a), self.store.data(b)) {
            (Some(a), Some(b)) => (self.comparator)(a, b),
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
        };
        self.direction.orient(ord)
    }

    fn run(&mut self, whole: Partition) {
        let mut pending = Vec::new();
        pending.push(whole);

        while let Some(part) = pending.pop() {
            if part.last <= part.first {
                continue;
            }
            if part.len() <= SELECTION_SORT_THRESHOLD {
                self.selection_sort(part);
                continue;
            }

            let (pivot, offset) = self.partition(part);
            #[cfg(feature = "logging")]
            trace!(
                "Partition [{}, {}] split at {}",
                part.first,
                part.last,
                part.first + offset
            );

            if offset > 0 {
                pending.push(Partition {
                    first: part.first,
                    first_node: part.first_node,
                    last: part.first + offset - 1,
                    last_node: self.store.prev(pivot),
                });
            }
            if part.first + offset < part.last {
                pending.push(Partition {
                    first: part.first + offset + 1,
                    first_node: self.store.next(pivot),
                    last: part.last,
                    last_node: part.last_node,
                });
            }
        }
    }

    fn selection_sort(&mut self, part: Partition) {
        let mut unsorted = part.first_node;
        while unsorted != part.last_node {
            let mut best = unsorted;
            let mut cursor = self.store.next(unsorted);
            loop {
                if self.order(best, cursor) == Ordering::Greater {
                    best = cursor;
                }
                if cursor == part.last_node {
                    break;
                }
                cursor = self.store.next(cursor);
            }
            self.store.swap_data(unsorted, best);
            unsorted = self.store.next(unsorted);
        }
    }

    /// Place a random pivot between smaller and larger payloads.
    /// Returns the pivot node and its offset from the partition start.
    fn partition(&mut self, part: Partition) -> (usize, usize) {
        let len = part.len();
        let mut offset = self.rng.gen_range(0..len);

        let mut pivot = if offset < len / 2 {
            (0..offset).fold(part.first_node, |id, _| self.store.next(id))
        } else {
            (offset..len - 1).fold(part.last_node, |id, _| self.store.prev(id))
        };

        let mut left = part.first_node;
        let mut right = part.last_node;
        while left != pivot && right != pivot {
            while left != pivot && self.order(left, pivot) != Ordering::Greater {
                left = self.store.next(left);
            }
            while right != pivot && self.order(right, pivot) != Ordering::Less {
                right = self.store.prev(right);
            }
            if left != pivot && right != pivot {
                self.store.swap_data(left, right);
                left = self.store.next(left);
                right = self.store.prev(right);
            }
        }

        if right == pivot {
            // Unscanned run left of the pivot: shift larger payloads past it
            while left != pivot {
                if self.order(left, pivot) == Ordering::Greater {
                    let before = self.store.prev(pivot);
                    self.store.swap_data(left, before);
                    self.store.swap_data(before, pivot);
                    pivot = before;
                    offset -= 1;
                    if pivot == left {
                        break;
                    }
                } else {
                    left = self.store.next(left);
                }
            }
        } else {
            while right != pivot {
                if self.order(right, pivot) == Ordering::Less {
                    let after = self.store.next(pivot);
                    self.store.swap_data(right, after);
                    self.store.swap_data(after, pivot);
                    pivot = after;
                    offset += 1;
                    if pivot == right {
                        break;
                    }
                } else {
                    right = self.store.prev(right);
                }
            }
        }

        (pivot, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ListConfig;

    fn sorted_list(values: &[i64], seed: u64) -> List<i64> {
        let mut list = List::with_config(ListConfig::seeded(seed));
        list.append_all(values.iter().copied()).unwrap();
        list.set_comparator(|a, b| a.cmp(b));
        list
    }

    fn values(list: &List<i64>) -> Vec<i64> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_sort_small_both_directions() {
        let mut list = sorted_list(&[5, 3, 1, 4, 1, 5, 9], 7);
        list.sort(Direction::Ascending).unwrap();
        assert_eq!(values(&list), vec![1, 1, 3, 4, 5, 5, 9]);
        list.sort(Direction::Descending).unwrap();
        assert_eq!(values(&list), vec![9, 5, 5, 4, 3, 1, 1]);
    }

    #[test]
    fn test_quicksort_large_with_duplicates() {
        let input: Vec<i64> = (0..500).map(|i| (i * 7919) % 101 - 50).collect();
        for seed in 0..5 {
            let mut list = sorted_list(&input, seed);
            list.sort(Direction::Ascending).unwrap();
            let mut expected = input.clone();
            expected.sort();
            assert_eq!(values(&list), expected);

            list.sort(Direction::Descending).unwrap();
            expected.reverse();
            assert_eq!(values(&list), expected);
        }
    }

    #[test]
    fn test_sort_keeps_mid_consistent() {
        let input: Vec<i64> = (0..101).rev().collect();
        let mut list = sorted_list(&input, 3);
        list.sort(Direction::Ascending).unwrap();
        assert_eq!(list.mid(), Some(&50));
        assert_eq!(list.get(0), Some(&0));
        assert_eq!(list.get(100), Some(&100));
    }

    #[test]
    fn test_sort_requires_comparator() {
        let mut list = List::<i64>::new();
        list.append_all([2, 1]).unwrap();
        assert_eq!(
            list.sort(Direction::Ascending),
            Err(ListError::Unsupported("comparator"))
        );
        assert_eq!(values(&list), vec![2, 1]);
    }

    #[test]
    fn test_sort_by_sign() {
        let mut list = sorted_list(&[2, 3, 1], 1);
        list.sort_by_sign(-4).unwrap();
        assert_eq!(values(&list), vec![3, 2, 1]);
        assert_eq!(list.sort_by_sign(0), Err(ListError::InvalidDirection(0)));
    }

    #[test]
    fn test_sort_trivial_lists() {
        let mut list = sorted_list(&[], 1);
        list.sort(Direction::Ascending).unwrap();
        let mut list = sorted_list(&[42], 1);
        list.sort(Direction::Descending).unwrap();
        assert_eq!(values(&list), vec![42]);
    }
}
