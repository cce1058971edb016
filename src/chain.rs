//! Chain: doubly linked list stored in a generational arena.
//!
//! Nodes live in a `SlotMap` and refer to their neighbours by
//! `NodeHandle`. There are no owning pointers between nodes, so the
//! prev/next links cannot form ownership cycles; dropping the chain drops
//! the arena. A handle stays valid until its node is popped, after which it
//! never resolves again, even if the slot is reused.

use core::fmt;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable reference to one node of a [`Chain`].
    pub struct NodeHandle;
}

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<NodeHandle>,
    next: Option<NodeHandle>,
}

pub struct Chain<T> {
    nodes: SlotMap<NodeHandle, Node<T>>,
    head: Option<NodeHandle>,
    tail: Option<NodeHandle>,
}

impl<T> Chain<T> {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            head: None,
            tail: None,
        }
    }

    /// One-node chain holding `value`.
    pub fn with_value(value: T) -> Self {
        let mut chain = Self::new();
        chain.push_to_tail(value);
        chain
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn head(&self) -> Option<NodeHandle> {
        self.head
    }

    pub fn tail(&self) -> Option<NodeHandle> {
        self.tail
    }

    pub fn get(&self, handle: NodeHandle) -> Option<&T> {
        self.nodes.get(handle).map(|n| &n.value)
    }

    pub fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut T> {
        self.nodes.get_mut(handle).map(|n| &mut n.value)
    }

    /// Insert `value` as the new head. Returns the new length.
    pub fn push_to_head(&mut self, value: T) -> usize {
        let k = self.nodes.insert(Node {
            value,
            prev: None,
            next: None,
        });
        self.link_front(k);
        self.len()
    }

    /// Insert `value` as the new tail. Returns the new length.
    pub fn push_to_tail(&mut self, value: T) -> usize {
        let k = self.nodes.insert(Node {
            value,
            prev: None,
            next: None,
        });
        self.link_back(k);
        self.len()
    }

    /// Remove the node behind `handle` in O(1) and return its value.
    ///
    /// Returns `None` if the node was already popped. Handles are only
    /// meaningful to the chain that issued them: each chain numbers its
    /// slots independently, so a handle from another chain may name a live
    /// node here.
    pub fn pop_node(&mut self, handle: NodeHandle) -> Option<T> {
        if !self.nodes.contains_key(handle) {
            return None;
        }
        self.unlink(handle);
        self.nodes.remove(handle).map(|n| n.value)
    }

    pub fn pop_from_head(&mut self) -> Option<T> {
        self.head.and_then(|h| self.pop_node(h))
    }

    pub fn pop_from_tail(&mut self) -> Option<T> {
        self.tail.and_then(|t| self.pop_node(t))
    }

    /// Relink an existing node at the head. The handle stays valid.
    /// Returns the (unchanged) length.
    pub fn move_to_head(&mut self, handle: NodeHandle) -> usize {
        if self.nodes.contains_key(handle) && self.head != Some(handle) {
            self.unlink(handle);
            self.link_front(handle);
        }
        self.len()
    }

    /// Relink an existing node at the tail. The handle stays valid.
    /// Returns the (unchanged) length.
    pub fn move_to_tail(&mut self, handle: NodeHandle) -> usize {
        if self.nodes.contains_key(handle) && self.tail != Some(handle) {
            self.unlink(handle);
            self.link_back(handle);
        }
        self.len()
    }

    /// Head-to-tail traversal yielding each value with its handle.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            chain: self,
            cursor: self.head,
            remaining: self.len(),
        }
    }

    // Detach `k` from its neighbours; the node itself stays in the arena.
    fn unlink(&mut self, k: NodeHandle) {
        let (prev, next) = {
            let n = &mut self.nodes[k];
            (n.prev.take(), n.next.take())
        };
        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => self.tail = prev,
        }
    }

    fn link_front(&mut self, k: NodeHandle) {
        self.nodes[k].next = self.head;
        match self.head {
            Some(h) => self.nodes[h].prev = Some(k),
            None => self.tail = Some(k),
        }
        self.head = Some(k);
    }

    fn link_back(&mut self, k: NodeHandle) {
        self.nodes[k].prev = self.tail;
        match self.tail {
            Some(t) => self.nodes[t].next = Some(k),
            None => self.head = Some(k),
        }
        self.tail = Some(k);
    }

    /// Walk the links both ways and check them against the arena.
    #[cfg(test)]
    pub(crate) fn assert_links(&self) {
        let mut forward = Vec::new();
        let mut prev = None;
        let mut cur = self.head;
        while let Some(k) = cur {
            let n = &self.nodes[k];
            assert_eq!(n.prev, prev, "prev link mismatch");
            forward.push(k);
            assert!(forward.len() <= self.len(), "cycle in next links");
            prev = Some(k);
            cur = n.next;
        }
        assert_eq!(prev, self.tail, "tail is not the last reachable node");
        assert_eq!(forward.len(), self.len(), "len != reachable nodes");
        if self.len() == 1 {
            assert_eq!(self.head, self.tail);
        }
        if let Some(h) = self.head {
            assert!(self.nodes[h].prev.is_none());
        }
        if let Some(t) = self.tail {
            assert!(self.nodes[t].next.is_none());
        }
    }
}

impl<T> Default for Chain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Chain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter().map(|(v, _)| v)).finish()
    }
}

/// Borrowing iterator over a [`Chain`], head to tail.
pub struct Iter<'a, T> {
    chain: &'a Chain<T>,
    cursor: Option<NodeHandle>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (&'a T, NodeHandle);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cursor?;
        let node = &self.chain.nodes[k];
        self.cursor = node.next;
        self.remaining -= 1;
        Some((&node.value, k))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a Chain<T> {
    type Item = (&'a T, NodeHandle);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator that drains a [`Chain`] from head to tail.
pub struct IntoIter<T>(Chain<T>);

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop_from_head()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len(), Some(self.0.len()))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> IntoIterator for Chain<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self)
    }
}
