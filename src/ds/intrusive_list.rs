//! Doubly linked list whose nodes live in a [`SlotArena`].
//!
//! Nodes are linked by [`SlotId`] instead of pointers, so a cache can keep a
//! node's id in its index and later move or unlink that node in O(1) without
//! any `unsafe`.
//!
//! ```text
//!   head ─► [id_3] ◄──► [id_1] ◄──► [id_2] ◄── tail
//!            MRU                       LRU
//! ```
//!
//! | Operation        | Complexity |
//! |------------------|------------|
//! | `push_front`     | O(1)       |
//! | `pop_back`       | O(1)       |
//! | `move_to_front`  | O(1)       |
//! | `remove(id)`     | O(1)       |
//! | `iter`           | O(n)       |

use crate::ds::slot_arena::{SlotArena, SlotId};

#[derive(Debug)]
struct Link<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// Arena-backed list ordered from front (most recent) to back (least recent).
#[derive(Debug)]
pub struct IntrusiveList<T> {
    arena: SlotArena<Link<T>>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl<T> IntrusiveList<T> {
    pub fn new() -> Self {
        Self {
            arena: SlotArena::new(),
            head: None,
            tail: None,
        }
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: SlotArena::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.arena.contains(id)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.arena.get(id).map(|link| &link.value)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.arena.get_mut(id).map(|link| &mut link.value)
    }

    /// Links `value` at the front and returns its handle.
    pub fn push_front(&mut self, value: T) -> SlotId {
        let id = self.arena.insert(Link {
            value,
            prev: None,
            next: self.head,
        });
        match self.head.and_then(|head| self.arena.get_mut(head)) {
            Some(old_head) => old_head.prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        id
    }

    /// Unlinks and returns the back value.
    pub fn pop_back(&mut self) -> Option<T> {
        let id = self.tail?;
        self.remove(id)
    }

    /// Unlinks `id` and returns its value.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        self.unlink(id)?;
        self.arena.remove(id).map(|link| link.value)
    }

    /// Moves `id` to the front; `false` if `id` is not in the list.
    pub fn move_to_front(&mut self, id: SlotId) -> bool {
        if !self.arena.contains(id) {
            return false;
        }
        if self.head == Some(id) {
            return true;
        }
        self.unlink(id);
        self.link_front(id);
        true
    }

    /// Drops every node.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.head = None;
        self.tail = None;
    }

    /// Iterates values from front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    fn unlink(&mut self, id: SlotId) -> Option<()> {
        let (prev, next) = {
            let link = self.arena.get(id)?;
            (link.prev, link.next)
        };

        match prev.and_then(|p| self.arena.get_mut(p)) {
            Some(prev_link) => prev_link.next = next,
            None => self.head = next,
        }
        match next.and_then(|n| self.arena.get_mut(n)) {
            Some(next_link) => next_link.prev = prev,
            None => self.tail = prev,
        }

        if let Some(link) = self.arena.get_mut(id) {
            link.prev = None;
            link.next = None;
        }
        Some(())
    }

    fn link_front(&mut self, id: SlotId) {
        let old_head = self.head;
        if let Some(link) = self.arena.get_mut(id) {
            link.prev = None;
            link.next = old_head;
        }
        match old_head.and_then(|h| self.arena.get_mut(h)) {
            Some(head_link) => head_link.prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    /// Walks the list both ways and panics on a broken link.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if self.head.is_none() || self.tail.is_none() {
            assert!(self.head.is_none() && self.tail.is_none());
            assert_eq!(self.len(), 0);
            return;
        }

        let mut count = 0usize;
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let link = self.arena.get(id).expect("dangling SlotId in list");
            assert_eq!(link.prev, prev, "prev link mismatch");
            if link.next.is_none() {
                assert_eq!(self.tail, Some(id), "tail does not match last node");
            }
            prev = Some(id);
            cursor = link.next;
            count += 1;
            assert!(count <= self.len(), "cycle detected");
        }
        assert_eq!(count, self.len());
    }
}

impl<T> Default for IntrusiveList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Front-to-back iterator over an [`IntrusiveList`].
pub struct Iter<'a, T> {
    list: &'a IntrusiveList<T>,
    cursor: Option<SlotId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.list.arena.get(self.cursor?)?;
        self.cursor = link.next;
        Some(&link.value)
    }
}
