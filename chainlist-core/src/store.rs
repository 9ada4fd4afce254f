//! Node store: an arena of list nodes with a bounded free list of recycled shells
//!
//! Nodes are addressed by stable arena indices. Slots 0 and 1 hold the head
//! and tail sentinels for the lifetime of the store. A released node goes back
//! to the free list while it has room; beyond that the node is freed. Freed
//! slots at the end of the arena are popped, freed slots in the middle wait
//! in a max-heap until they become trailing or a fresh node is placed there.
//! Clearing the chain rebuilds the arena as sentinels plus spare shells.

use crate::constants::{HEAD, TAIL};
use crate::error::ListError;
use alloc::collections::BinaryHeap;
use alloc::vec::Vec;

#[cfg(feature = "logging")]
use tracing::trace;

/// One arena slot: a payload plus its chain links
#[derive(Debug)]
pub(crate) struct Node<T> {
    /// Element payload, `None` for sentinels and released shells
    pub(crate) data: Option<T>,
    /// Owning link to the successor
    pub(crate) next: usize,
    /// Back-reference used for traversal only
    pub(crate) prev: usize,
}

impl<T> Node<T> {
    fn shell() -> Self {
        Self {
            data: None,
            next: TAIL,
            prev: HEAD,
        }
    }
}

#[derive(Debug)]
pub(crate) struct NodeStore<T> {
    nodes: Vec<Node<T>>,
    spare: Vec<usize>,
    /// Freed slot ids, all below `nodes.len()`
    vacant: BinaryHeap<usize>,
    spare_capacity: usize,
}

impl<T> NodeStore<T> {
    /// Create a store holding only the two sentinels, linked to each other
    pub(crate) fn new(spare_capacity: usize) -> Self {
        Self {
            nodes: Self::fresh_arena(0),
            spare: Vec::with_capacity(spare_capacity),
            vacant: BinaryHeap::new(),
            spare_capacity,
        }
    }

    /// Linked sentinels followed by `shells` unlinked spare shells
    fn fresh_arena(shells: usize) -> Vec<Node<T>> {
        let mut nodes = Vec::with_capacity(2 + shells);
        nodes.resize_with(2 + shells, Node::shell);
        nodes
    }

    /// Take a node for `data`: a recycled shell if one is spare, else a fresh slot
    pub(crate) fn acquire(&mut self, data: T) -> Result<usize, ListError> {
        let id = if let Some(id) = self.spare.pop() {
            #[cfg(feature = "logging")]
            trace!("Recycled spare node {}", id);
            id
        } else if let Some(id) = self.vacant.pop() {
            // A new node in a freed slot
            self.nodes[id] = Node::shell();
            id
        } else {
            self.nodes.try_reserve(1)?;
            self.nodes.push(Node::shell());
            self.nodes.len() - 1
        };

        self.nodes[id].data = Some(data);
        Ok(id)
    }

    /// Return a node that is no longer linked into the chain, handing back its payload
    pub(crate) fn release(&mut self, id: usize) -> Option<T> {
        debug_assert!(id != HEAD && id != TAIL, "sentinels are never released");
        let data = self.nodes[id].data.take();

        if self.spare.len() < self.spare_capacity {
            self.spare.push(id);
        } else {
            self.nodes[id] = Node::shell();
            self.vacant.push(id);
            self.pop_trailing_vacant();
        }

        data
    }

    /// Drop freed slots from the end of the arena and give back excess capacity
    fn pop_trailing_vacant(&mut self) {
        while self.vacant.peek() == Some(&(self.nodes.len() - 1)) {
            self.vacant.pop();
            self.nodes.pop();
        }

        let len = self.nodes.len();
        if self.nodes.capacity() > 4 * len.max(16) {
            self.nodes.shrink_to(2 * len);
        }
    }

    pub(crate) fn next(&self, id: usize) -> usize {
        self.nodes[id].next
    }

    pub(crate) fn prev(&self, id: usize) -> usize {
        self.nodes[id].prev
    }

    pub(crate) fn data(&self, id: usize) -> Option<&T> {
        self.nodes[id].data.as_ref()
    }

    pub(crate) fn data_mut(&mut self, id: usize) -> Option<&mut T> {
        self.nodes[id].data.as_mut()
    }

    /// Exchange the payloads of two nodes; links are untouched
    pub(crate) fn swap_data(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (left, right) = self.nodes.split_at_mut(hi);
        core::mem::swap(&mut left[lo].data, &mut right[0].data);
    }

    /// Link a detached node between `prev` and `prev.next`
    pub(crate) fn link_after(&mut self, prev: usize, id: usize) {
        let next = self.nodes[prev].next;
        self.nodes[id].prev = prev;
        self.nodes[id].next = next;
        self.nodes[prev].next = id;
        self.nodes[next].prev = id;
    }

    /// Detach a node from its neighbours
    pub(crate) fn unlink(&mut self, id: usize) {
        let (next, prev) = (self.nodes[id].next, self.nodes[id].prev);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    /// Release every node between the sentinels, returning payloads in chain order
    ///
    /// The arena is rebuilt with only the sentinels and up to `spare_capacity`
    /// shells, so no slot ids survive this call.
    pub(crate) fn release_chain(&mut self) -> Vec<T> {
        let mut out = Vec::new();
        let mut released = 0usize;
        let mut cursor = self.nodes[HEAD].next;
        while cursor != TAIL {
            let next = self.nodes[cursor].next;
            if let Some(data) = self.nodes[cursor].data.take() {
                out.push(data);
            }
            released += 1;
            cursor = next;
        }

        let shells = (self.spare.len() + released).min(self.spare_capacity);
        #[cfg(feature = "logging")]
        trace!(
            "Rebuilding arena: {} slots freed, {} shells kept",
            self.nodes.len() - 2 - shells,
            shells
        );

        self.nodes = Self::fresh_arena(shells);
        self.spare.clear();
        self.spare.extend(2..2 + shells);
        self.vacant.clear();
        out
    }

    /// Number of arena slots, sentinels included
    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of shells waiting on the free list
    pub(crate) fn spare_count(&self) -> usize {
        self.spare.len()
    }

    pub(crate) fn spare_capacity(&self) -> usize {
        self.spare_capacity
    }
}
