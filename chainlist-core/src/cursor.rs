//! Iteration: the list's exclusive iteration session and a borrowing iterator
//!
//! While a session is active, `insert_at`, `delete_at`, `clear`, `sort` and
//! restore are rejected with [`ListError::Busy`](crate::ListError::Busy).

use crate::constants::{HEAD, TAIL};
use crate::list::List;
use crate::store::NodeStore;

/// Iteration session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cursor {
    active: bool,
    pos: usize,
    current: usize,
}

impl Cursor {
    pub(crate) fn idle() -> Self {
        Self {
            active: false,
            pos: 0,
            current: TAIL,
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }
}

impl<T, Q: ?Sized> List<T, Q> {
    /// Start an iteration session
    ///
    /// Always succeeds. Starting while a session is active is a no-op that
    /// keeps the current position.
    pub fn iter_start(&mut self) -> bool {
        if self.cursor.active {
            return true;
        }
        self.cursor = Cursor {
            active: true,
            pos: 0,
            current: self.store.next(HEAD),
        };
        true
    }

    /// Next element of the active session
    ///
    /// Returns `None` when no session is active or the list is exhausted.
    pub fn iter_next(&mut self) -> Option<&T> {
        if !self.cursor.active || self.cursor.pos >= self.len {
            return None;
        }
        let id = self.cursor.current;
        self.cursor.current = self.store.next(id);
        self.cursor.pos += 1;
        self.store.data(id)
    }

    /// Check if the active session has more elements
    pub fn iter_has_next(&self) -> bool {
        self.cursor.active && self.cursor.pos < self.len
    }

    /// End the iteration session
    ///
    /// Returns `false` if no session was active.
    pub fn iter_stop(&mut self) -> bool {
        let was_active = self.cursor.active;
        self.cursor = Cursor::idle();
        was_active
    }

    /// Check if an iteration session is active
    pub fn is_iterating(&self) -> bool {
        self.cursor.active
    }
}

/// Borrowing iterator over list elements, front to back
pub struct Iter<'a, T> {
    store: &'a NodeStore<T>,
    front: usize,
    back: usize,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(store: &'a NodeStore<T>, len: usize) -> Self {
        Self {
            store,
            front: store.next(HEAD),
            back: store.prev(TAIL),
            remaining: len,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front;
        self.front = self.store.next(id);
        self.remaining -= 1;
        self.store.data(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back;
        self.back = self.store.prev(id);
        self.remaining -= 1;
        self.store.data(id)
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}
