//! Iterators over the sorted list threading.
//!
//! All iterators walk the intrusive list, never the tree: each step is one
//! pointer chase. Forward iteration yields ascending keys; every iterator is
//! double-ended, so reverse traversal needs no separate machinery. The
//! consuming iterator pops entries off the ends of the map, which is cheap
//! because boundary nodes have at most one child.

use std::fmt as StdFmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::map::ListMap;
use crate::node::{Links, Node};

// ============================================================================
//  Iter / IterMut
// ============================================================================

/// Shared iterator over `(&K, &V)` in ascending key order.
pub struct Iter<'a, K, V> {
    /// Next front position; only read while `remaining > 0`.
    front: *mut Links,
    /// One past the next back position (initially the sentinel).
    back: *mut Links,
    remaining: usize,
    _marker: PhantomData<(&'a K, &'a V)>,
}

// An Iter hands out shared references only.
unsafe impl<K: Sync, V: Sync> Send for Iter<'_, K, V> {}
unsafe impl<K: Sync, V: Sync> Sync for Iter<'_, K, V> {}

/// Exclusive iterator over `(&K, &mut V)` in ascending key order.
pub struct IterMut<'a, K, V> {
    front: *mut Links,
    back: *mut Links,
    remaining: usize,
    _marker: PhantomData<(&'a K, &'a mut V)>,
}

unsafe impl<K: Sync, V: Send> Send for IterMut<'_, K, V> {}
unsafe impl<K: Sync, V: Sync> Sync for IterMut<'_, K, V> {}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        unsafe {
            let node = &*Node::<K, V>::from_links(self.front);
            self.front = node.links.next;
            Some((&node.key, &node.value))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        unsafe {
            self.back = (*self.back).prev;
            let node = &*Node::<K, V>::from_links(self.back);
            Some((&node.key, &node.value))
        }
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            front: self.front,
            back: self.back,
            remaining: self.remaining,
            _marker: PhantomData,
        }
    }
}

impl<K: StdFmt::Debug, V: StdFmt::Debug> StdFmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        unsafe {
            let node = &mut *Node::<K, V>::from_links(self.front);
            self.front = node.links.next;
            Some((&node.key, &mut node.value))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        unsafe {
            self.back = (*self.back).prev;
            let node = &mut *Node::<K, V>::from_links(self.back);
            Some((&node.key, &mut node.value))
        }
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

// ============================================================================
//  Keys / Values / ValuesMut
// ============================================================================

/// Iterator over `&K` in ascending order.
#[derive(Clone)]
pub struct Keys<'a, K, V>(Iter<'a, K, V>);

/// Iterator over `&V` in ascending key order.
#[derive(Clone)]
pub struct Values<'a, K, V>(Iter<'a, K, V>);

/// Iterator over `&mut V` in ascending key order.
pub struct ValuesMut<'a, K, V>(IterMut<'a, K, V>);

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}
impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

// ============================================================================
//  IntoIter
// ============================================================================

/// Consuming iterator over `(K, V)` in ascending key order.
///
/// Pops from the map's ends; whatever is left when the iterator is dropped
/// is freed by the map's own teardown.
pub struct IntoIter<K, V> {
    map: ListMap<K, V>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.map.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.map.len(), Some(self.map.len()))
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.map.pop_last()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

// ============================================================================
//  Constructors
// ============================================================================

impl<K, V> ListMap<K, V> {
    /// Iterate over `(&K, &V)` in ascending key order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            front: self.first,
            back: self.sentinel,
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    /// Iterate over `(&K, &mut V)` in ascending key order.
    #[must_use]
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            front: self.first,
            back: self.sentinel,
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    /// Iterate over keys in ascending order.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    /// Iterate over values in ascending key order.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }

    /// Iterate over exclusive value references in ascending key order.
    #[must_use]
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut(self.iter_mut())
    }
}

impl<'a, K, V> IntoIterator for &'a ListMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut ListMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V> IntoIterator for ListMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { map: self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_iteration_is_sorted() {
        let map: ListMap<i32, i32> = (0..50).map(|i| ((i * 31) % 50, i)).collect();
        let keys: Vec<i32> = map.keys().copied().collect();
        assert_eq!(keys, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn reverse_iteration_is_reverse_sorted() {
        let map: ListMap<i32, i32> = (0..20).map(|i| (i, i)).collect();
        let keys: Vec<i32> = map.keys().rev().copied().collect();
        assert_eq!(keys, (0..20).rev().collect::<Vec<_>>());
    }

    #[test]
    fn meet_in_the_middle() {
        let map: ListMap<i32, i32> = (0..5).map(|i| (i, i)).collect();
        let mut iter = map.iter();
        assert_eq!(iter.next().map(|(k, _)| *k), Some(0));
        assert_eq!(iter.next_back().map(|(k, _)| *k), Some(4));
        assert_eq!(iter.next_back().map(|(k, _)| *k), Some(3));
        assert_eq!(iter.next().map(|(k, _)| *k), Some(1));
        assert_eq!(iter.len(), 1);
        assert_eq!(iter.next().map(|(k, _)| *k), Some(2));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn empty_map_iterates_nothing() {
        let map: ListMap<i32, i32> = ListMap::new();
        assert_eq!(map.iter().count(), 0);
        assert_eq!(map.iter().next_back(), None);
    }

    #[test]
    fn iter_mut_edits_every_value() {
        let mut map: ListMap<i32, i32> = (0..10).map(|i| (i, i)).collect();
        for (_, v) in &mut map {
            *v += 100;
        }
        assert!(map.values().all(|v| *v >= 100));
        map.check_invariants();
    }

    #[test]
    fn into_iter_yields_owned_pairs_in_order() {
        let map: ListMap<i32, String> = (0..10).map(|i| (i, i.to_string())).collect();
        let pairs: Vec<(i32, String)> = map.into_iter().collect();
        assert_eq!(pairs.len(), 10);
        assert!(pairs.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn into_iter_partial_consumption_frees_cleanly() {
        let map: ListMap<i32, Vec<u8>> = (0..10).map(|i| (i, vec![0; 16])).collect();
        let mut iter = map.into_iter();
        iter.next();
        iter.next_back();
        // Remaining entries are freed by drop.
    }
}
