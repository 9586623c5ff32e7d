//! Cursors: bidirectional positions over the sorted list threading.
//!
//! A cursor points at either a real entry or the end position (the
//! sentinel). Stepping costs O(1) by following the intrusive list links;
//! there is no tree descent. [`Cursor`] observes, [`CursorMut`] can edit the
//! current value and erase entries. A `CursorMut` converts one way into a
//! `Cursor` via [`CursorMut::as_cursor`]; there is no conversion back.

use std::fmt as StdFmt;

use crate::map::ListMap;
use crate::node::{Links, Node};

// ============================================================================
//  Cursor
// ============================================================================

/// A shared position in a [`ListMap`], at an entry or at the end.
pub struct Cursor<'a, K, V> {
    map: &'a ListMap<K, V>,
    /// Real node, sentinel, or null when the map never allocated one.
    pos: *mut Links,
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Cursor<'_, K, V> {}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(crate) fn new(map: &'a ListMap<K, V>, pos: *mut Links) -> Self {
        Self { map, pos }
    }

    /// Whether this is the end position (one past the greatest key).
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.map.is_end(self.pos)
    }

    /// Key at the current position, `None` at the end.
    #[must_use]
    pub fn key(&self) -> Option<&'a K> {
        if self.is_end() {
            None
        } else {
            unsafe { Some(&(*Node::<K, V>::from_links(self.pos)).key) }
        }
    }

    /// Value at the current position, `None` at the end.
    #[must_use]
    pub fn value(&self) -> Option<&'a V> {
        if self.is_end() {
            None
        } else {
            unsafe { Some(&(*Node::<K, V>::from_links(self.pos)).value) }
        }
    }

    /// Key and value at the current position.
    #[must_use]
    pub fn key_value(&self) -> Option<(&'a K, &'a V)> {
        Some((self.key()?, self.value()?))
    }

    /// Step to the next entry in key order. Saturates at the end position.
    pub fn move_next(&mut self) {
        if !self.is_end() {
            self.pos = unsafe { (*self.pos).next };
        }
    }

    /// Step to the previous entry in key order. From the end position this
    /// reaches the greatest entry; at the first entry it stays put.
    pub fn move_prev(&mut self) {
        if self.pos.is_null() {
            return;
        }
        let prev = unsafe { (*self.pos).prev };
        if !prev.is_null() {
            self.pos = prev;
        }
    }
}

/// Position identity: two cursors are equal when they sit on the same node
/// of the same map.
impl<K, V> PartialEq for Cursor<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.map, other.map) && self.pos == other.pos
    }
}

impl<K, V> Eq for Cursor<'_, K, V> {}

impl<K: StdFmt::Debug, V: StdFmt::Debug> StdFmt::Debug for Cursor<'_, K, V> {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        f.debug_tuple("Cursor").field(&self.key_value()).finish()
    }
}

// ============================================================================
//  CursorMut
// ============================================================================

/// An exclusive position in a [`ListMap`], at an entry or at the end.
///
/// On top of the [`Cursor`] surface this can edit the current value and
/// [`remove`](Self::remove) the current entry.
pub struct CursorMut<'a, K, V> {
    map: &'a mut ListMap<K, V>,
    pos: *mut Links,
}

impl<'a, K, V> CursorMut<'a, K, V> {
    pub(crate) fn new(map: &'a mut ListMap<K, V>, pos: *mut Links) -> Self {
        Self { map, pos }
    }

    /// Whether this is the end position.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.map.is_end(self.pos)
    }

    /// Key at the current position, `None` at the end.
    #[must_use]
    pub fn key(&self) -> Option<&K> {
        if self.is_end() {
            None
        } else {
            unsafe { Some(&(*Node::<K, V>::from_links(self.pos)).key) }
        }
    }

    /// Value at the current position, `None` at the end.
    #[must_use]
    pub fn value(&self) -> Option<&V> {
        if self.is_end() {
            None
        } else {
            unsafe { Some(&(*Node::<K, V>::from_links(self.pos)).value) }
        }
    }

    /// Exclusive value reference at the current position.
    #[must_use]
    pub fn value_mut(&mut self) -> Option<&mut V> {
        if self.is_end() {
            None
        } else {
            unsafe { Some(&mut (*Node::<K, V>::from_links(self.pos)).value) }
        }
    }

    /// Consume the cursor into a value reference with the full borrow
    /// lifetime, `None` at the end.
    #[must_use]
    pub fn into_value_mut(self) -> Option<&'a mut V> {
        if self.is_end() {
            None
        } else {
            unsafe { Some(&mut (*Node::<K, V>::from_links(self.pos)).value) }
        }
    }

    /// Step to the next entry in key order. Saturates at the end position.
    pub fn move_next(&mut self) {
        if !self.is_end() {
            self.pos = unsafe { (*self.pos).next };
        }
    }

    /// Step to the previous entry in key order. From the end position this
    /// reaches the greatest entry; at the first entry it stays put.
    pub fn move_prev(&mut self) {
        if self.pos.is_null() {
            return;
        }
        let prev = unsafe { (*self.pos).prev };
        if !prev.is_null() {
            self.pos = prev;
        }
    }

    /// Remove the current entry and advance to the one after it.
    ///
    /// Returns the removed pair, or `None` at the end position. Expected
    /// O(log n) for the tree unlink; the list unlink is O(1).
    pub fn remove(&mut self) -> Option<(K, V)> {
        if self.is_end() {
            return None;
        }
        let node = unsafe { Node::<K, V>::from_links(self.pos) };
        let (key, value, next) = unsafe { self.map.erase_node(node) };
        self.pos = next;
        Some((key, value))
    }

    /// Reborrow as a shared cursor. The reverse conversion does not exist.
    #[must_use]
    pub fn as_cursor(&self) -> Cursor<'_, K, V> {
        Cursor::new(self.map, self.pos)
    }
}

impl<K: StdFmt::Debug, V: StdFmt::Debug> StdFmt::Debug for CursorMut<'_, K, V> {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        f.debug_tuple("CursorMut")
            .field(&self.as_cursor().key_value())
            .finish()
    }
}

// ============================================================================
//  Cursor constructors on ListMap
// ============================================================================

impl<K, V> ListMap<K, V> {
    /// Cursor at the least entry, or at the end when empty.
    #[must_use]
    pub fn cursor_first(&self) -> Cursor<'_, K, V> {
        Cursor::new(self, self.first)
    }

    /// Cursor at the end position.
    #[must_use]
    pub fn cursor_end(&self) -> Cursor<'_, K, V> {
        Cursor::new(self, self.sentinel)
    }

    /// Mutable cursor at the least entry, or at the end when empty.
    #[must_use]
    pub fn cursor_first_mut(&mut self) -> CursorMut<'_, K, V> {
        let first = self.first;
        CursorMut::new(self, first)
    }

    /// Mutable cursor at the end position.
    #[must_use]
    pub fn cursor_end_mut(&mut self) -> CursorMut<'_, K, V> {
        let sentinel = self.sentinel;
        CursorMut::new(self, sentinel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_map_cursors_are_end() {
        let map: ListMap<i32, i32> = ListMap::new();
        assert!(map.cursor_first().is_end());
        assert_eq!(map.cursor_first(), map.cursor_end());
        assert_eq!(map.cursor_first().key(), None);
    }

    #[test]
    fn walk_forward_and_back() {
        let map: ListMap<i32, i32> = [(1, 10), (2, 20), (3, 30)].into();
        let mut cursor = map.cursor_first();
        assert_eq!(cursor.key(), Some(&1));
        cursor.move_next();
        cursor.move_next();
        assert_eq!(cursor.key_value(), Some((&3, &30)));
        cursor.move_next();
        assert!(cursor.is_end());
        // Saturates at end.
        cursor.move_next();
        assert!(cursor.is_end());
        // End decrements to the greatest entry.
        cursor.move_prev();
        assert_eq!(cursor.key(), Some(&3));
        cursor.move_prev();
        cursor.move_prev();
        assert_eq!(cursor.key(), Some(&1));
        // Stays at the first entry.
        cursor.move_prev();
        assert_eq!(cursor.key(), Some(&1));
    }

    #[test]
    fn cursor_mut_edits_and_removes() {
        let mut map: ListMap<i32, i32> = [(1, 10), (2, 20), (3, 30)].into();
        let mut cursor = map.find_mut(&2);
        *cursor.value_mut().unwrap() = 99;
        assert_eq!(cursor.remove(), Some((2, 99)));
        // Advanced to the next entry.
        assert_eq!(cursor.key(), Some(&3));
        assert_eq!(cursor.remove(), Some((3, 30)));
        assert!(cursor.is_end());
        assert_eq!(cursor.remove(), None);
        map.check_invariants();
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn mutable_cursor_downgrades() {
        let mut map: ListMap<i32, i32> = [(1, 10)].into();
        let cursor = map.cursor_first_mut();
        let shared = cursor.as_cursor();
        assert_eq!(shared.value(), Some(&10));
    }

    #[test]
    fn cursor_equality_is_position_identity() {
        let map: ListMap<i32, i32> = [(1, 10), (2, 20)].into();
        assert_eq!(map.find(&1), map.cursor_first());
        assert_ne!(map.find(&1), map.find(&2));
        assert_eq!(map.find(&7), map.cursor_end());
    }
}
