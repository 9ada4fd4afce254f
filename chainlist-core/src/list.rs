//! Positional list core: sentinel chain, median reference and quadrant lookup

use crate::capability::Capabilities;
use crate::constants::{HEAD, TAIL};
use crate::cursor::{Cursor, Iter};
use crate::error::ListError;
use crate::store::NodeStore;
use crate::types::ListConfig;
use alloc::boxed::Box;
use alloc::format;
use alloc::vec::Vec;
use bytes::Bytes;
use core::cmp::Ordering;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[cfg(feature = "logging")]
use tracing::debug;

/// Ordered sequence of elements with positional access
///
/// `T` is the element type, `Q` the indicator type handed to the seeker.
/// The list keeps a reference to its median node so that any position is
/// reached by walking at most about a quarter of the list.
pub struct List<T, Q: ?Sized = T> {
    pub(crate) store: NodeStore<T>,
    pub(crate) len: usize,
    /// Node at index `(len - 1) / 2`, `None` when empty
    pub(crate) mid: Option<usize>,
    pub(crate) caps: Capabilities<T, Q>,
    pub(crate) cursor: Cursor,
    pub(crate) rng: StdRng,
}

impl<T, Q: ?Sized> List<T, Q> {
    /// Create an empty list with the default configuration
    pub fn new() -> Self {
        Self::with_config(ListConfig::default())
    }

    /// Create an empty list
    pub fn with_config(config: ListConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            store: NodeStore::new(config.spare_capacity),
            len: 0,
            mid: None,
            caps: Capabilities::none(),
            cursor: Cursor::idle(),
            rng,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the list holds no elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of recycled node shells currently held for reuse
    pub fn spare_count(&self) -> usize {
        self.store.spare_count()
    }

    /// Maximum number of recycled node shells
    pub fn spare_capacity(&self) -> usize {
        self.store.spare_capacity()
    }

    /// Installed capabilities
    pub fn capabilities(&self) -> &Capabilities<T, Q> {
        &self.caps
    }

    /// Install the comparator used by sort
    pub fn set_comparator<F>(&mut self, comparator: F)
    where
        F: Fn(&T, &T) -> Ordering + 'static,
    {
        self.caps.comparator = Some(Box::new(comparator));
    }

    /// Remove the comparator
    pub fn clear_comparator(&mut self) {
        self.caps.comparator = None;
    }

    /// Install the seeker used by seek
    pub fn set_seeker<F>(&mut self, seeker: F)
    where
        F: Fn(&T, &Q) -> bool + 'static,
    {
        self.caps.seeker = Some(Box::new(seeker));
    }

    /// Remove the seeker
    pub fn clear_seeker(&mut self) {
        self.caps.seeker = None;
    }

    /// Install the meter used to dump raw element bytes
    pub fn set_meter<F>(&mut self, meter: F)
    where
        F: Fn(&T) -> usize + 'static,
    {
        self.caps.meter = Some(Box::new(meter));
    }

    /// Remove the meter
    pub fn clear_meter(&mut self) {
        self.caps.meter = None;
    }

    /// Install the serializer used by dump
    pub fn set_serializer<F>(&mut self, serializer: F)
    where
        F: Fn(&T) -> Bytes + 'static,
    {
        self.caps.serializer = Some(Box::new(serializer));
    }

    /// Remove the serializer
    pub fn clear_serializer(&mut self) {
        self.caps.serializer = None;
    }

    /// Install the unserializer used by restore
    pub fn set_unserializer<F>(&mut self, unserializer: F)
    where
        F: Fn(&[u8]) -> Result<(T, usize), ListError> + 'static,
    {
        self.caps.unserializer = Some(Box::new(unserializer));
    }

    /// Remove the unserializer
    pub fn clear_unserializer(&mut self) {
        self.caps.unserializer = None;
    }

    /// Append an element at the end
    pub fn append(&mut self, data: T) -> Result<(), ListError> {
        self.insert_at(self.len, data)
    }

    /// Append every element of `items`, returning how many were added
    pub fn append_all<I>(&mut self, items: I) -> Result<usize, ListError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut added = 0;
        for item in items {
            self.append(item)?;
            added += 1;
        }
        Ok(added)
    }

    /// Insert an element so that it ends up at index `pos` (`0..=len`)
    pub fn insert_at(&mut self, pos: usize, data: T) -> Result<(), ListError> {
        self.ensure_idle()?;
        if pos > self.len {
            return Err(ListError::PositionOutOfRange { pos, len: self.len });
        }

        let prev = self.find_slot(pos);
        let id = self.store.acquire(data)?;
        self.store.link_after(prev, id);
        self.len += 1;

        let half = (self.len - 1) / 2;
        self.mid = match self.mid {
            None => Some(id),
            Some(m) if self.len % 2 == 1 && pos >= half => Some(self.store.next(m)),
            Some(m) if self.len % 2 == 0 && pos <= half => Some(self.store.prev(m)),
            keep => keep,
        };

        Ok(())
    }

    /// Remove the element at index `pos` (`0..len`) and hand it back
    pub fn delete_at(&mut self, pos: usize) -> Result<T, ListError> {
        self.ensure_idle()?;
        if pos >= self.len {
            return Err(ListError::PositionOutOfRange { pos, len: self.len });
        }

        let id = self.find_slot(pos + 1);

        // Repair against the length before removal
        let half = self.len / 2;
        self.mid = match self.mid {
            _ if self.len == 1 => None,
            Some(m) if self.len % 2 == 1 && pos >= half => Some(self.store.prev(m)),
            Some(m) if self.len % 2 == 0 && pos < half => Some(self.store.next(m)),
            keep => keep,
        };

        self.store.unlink(id);
        self.len -= 1;

        self.store
            .release(id)
            .ok_or_else(|| ListError::InvalidArgument(format!("node at {} holds no element", pos)))
    }

    /// Remove every element, returning them in list order
    ///
    /// Up to `spare_capacity` node shells are kept for reuse.
    pub fn clear(&mut self) -> Result<Vec<T>, ListError> {
        self.ensure_idle()?;

        let drained = self.store.release_chain();
        #[cfg(feature = "logging")]
        debug!(
            "Cleared {} elements, {} shells kept",
            drained.len(),
            self.store.spare_count()
        );

        self.len = 0;
        self.mid = None;
        Ok(drained)
    }

    /// Element at index `pos`
    pub fn get(&self, pos: usize) -> Option<&T> {
        if pos >= self.len {
            return None;
        }
        self.store.data(self.find_slot(pos + 1))
    }

    /// Mutable element at index `pos`
    pub fn get_mut(&mut self, pos: usize) -> Option<&mut T> {
        if pos >= self.len {
            return None;
        }
        let id = self.find_slot(pos + 1);
        self.store.data_mut(id)
    }

    /// Element at the median index `(len - 1) / 2`
    pub fn mid(&self) -> Option<&T> {
        self.mid.and_then(|id| self.store.data(id))
    }

    /// First element accepted by the seeker for `indicator`
    pub fn seek(&self, indicator: &Q) -> Result<Option<&T>, ListError> {
        let seeker = self
            .caps
            .seeker
            .as_ref()
            .ok_or(ListError::Unsupported("seeker"))?;
        Ok(self.iter().find(|el| seeker(el, indicator)))
    }

    /// Index of the first element accepted by the seeker for `indicator`
    pub fn seek_position(&self, indicator: &Q) -> Result<Option<usize>, ListError> {
        let seeker = self
            .caps
            .seeker
            .as_ref()
            .ok_or(ListError::Unsupported("seeker"))?;
        Ok(self.iter().position(|el| seeker(el, indicator)))
    }

    /// Borrowing iterator over the elements in order
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.store, self.len)
    }

    pub(crate) fn ensure_idle(&self) -> Result<(), ListError> {
        if self.cursor.is_active() {
            return Err(ListError::Busy);
        }
        Ok(())
    }

    /// Node id at `slot`, where slot 0 is the head sentinel, slot `len + 1`
    /// the tail sentinel and slot `i + 1` the element at index `i`.
    ///
    /// Walks from whichever of head, median or tail is nearest.
    pub(crate) fn find_slot(&self, slot: usize) -> usize {
        debug_assert!(slot <= self.len + 1);
        let len = self.len;
        let mid = match self.mid {
            Some(mid) if len > 0 => mid,
            _ => return if slot == 0 { HEAD } else { TAIL },
        };
        let mid_slot = (len - 1) / 2 + 1;

        if 4 * slot <= len {
            self.walk_forward(HEAD, slot)
        } else if 2 * slot < len {
            self.walk_backward(mid, mid_slot - slot)
        } else if 4 * slot <= 3 * len {
            self.walk_forward(mid, slot - mid_slot)
        } else {
            self.walk_backward(TAIL, len + 1 - slot)
        }
    }

    fn walk_forward(&self, mut id: usize, steps: usize) -> usize {
        for _ in 0..steps {
            id = self.store.next(id);
        }
        id
    }

    fn walk_backward(&self, mut id: usize, steps: usize) -> usize {
        for _ in 0..steps {
            id = self.store.prev(id);
        }
        id
    }
}

impl<T, Q: ?Sized> Default for List<T, Q> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: core::fmt::Debug, Q: ?Sized> core::fmt::Debug for List<T, Q> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T, Q: ?Sized> IntoIterator for &'a List<T, Q> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
