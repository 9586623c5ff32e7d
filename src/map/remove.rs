//! Erasure: O(1) list unlink, then case-split tree deletion.
//!
//! Deletion never rotates. A removed node's replacement (its in-order
//! predecessor, or its sole child) inherits the removed node's priority, so
//! no priority ever rises above an ancestor's and the heap property is
//! preserved everywhere.

use std::borrow::Borrow;

use crate::node::{Links, Node};
use crate::tracing_helpers::trace_log;

use super::{ListMap, SearchMode};

impl<K, V> ListMap<K, V> {
    /// Detach `node` from the list and the tree, free it, and hand back its
    /// key, value, and the list position that followed it.
    ///
    /// # Safety
    ///
    /// `node` must be a live node owned by this map.
    pub(crate) unsafe fn erase_node(&mut self, node: *mut Node<K, V>) -> (K, V, *mut Links) {
        unsafe {
            let prev = (*node).links.prev;
            let next = (*node).links.next;

            // List unlink. `next` is never null for a live node: the last
            // node points at the sentinel.
            if prev.is_null() {
                self.first = next;
            } else {
                (*prev).next = next;
            }
            (*next).prev = prev;

            let left = (*node).left;
            let right = (*node).right;

            if !left.is_null() && !right.is_null() {
                // Two children: relocate the in-order predecessor (the list
                // gave it to us in O(1)) into the erased node's tree slot.
                // Reusing the predecessor node keeps external cursors to it
                // valid. As a predecessor inside the left subtree it has no
                // right child.
                let pred = Node::<K, V>::from_links(prev);

                // When the predecessor is the left child itself it simply
                // keeps its own left subtree; otherwise its (possibly null)
                // left child is lifted into its old slot and it takes over
                // the erased node's left subtree.
                if (*pred).parent != node {
                    let pred_slot = self.owner_slot(pred);
                    let child = (*pred).left;
                    if !child.is_null() {
                        (*child).priority = (*pred).priority;
                        (*child).parent = (*pred).parent;
                    }
                    *pred_slot = child;

                    (*pred).left = left;
                    (*left).parent = pred;
                }

                (*pred).right = right;
                (*right).parent = pred;

                (*pred).priority = (*node).priority;
                let node_slot = self.owner_slot(node);
                (*pred).parent = (*node).parent;
                *node_slot = pred;
            } else if !left.is_null() {
                self.replace_by_child(node, left);
            } else if !right.is_null() {
                self.replace_by_child(node, right);
            } else {
                *self.owner_slot(node) = std::ptr::null_mut();
            }

            self.len -= 1;
            let boxed = Box::from_raw(node);
            (boxed.key, boxed.value, next)
        }
    }

    /// One-child deletion: the child takes over the node's slot, parent
    /// linkage, and priority. The priority transfer is not needed for heap
    /// correctness (the child's priority was already below every ancestor's)
    /// but keeps the replacement uniform with the two-child case.
    unsafe fn replace_by_child(&mut self, node: *mut Node<K, V>, child: *mut Node<K, V>) {
        unsafe {
            (*child).priority = (*node).priority;
            (*child).parent = (*node).parent;
            *self.owner_slot(node) = child;
        }
    }

    /// Remove the entry with this key, returning its value.
    ///
    /// Absent keys are a no-op returning `None`.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Remove the entry with this key, returning the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        let pos = self.locate(key, SearchMode::Exact);
        if self.is_end(pos) {
            return None;
        }
        trace_log!("remove: key found");
        let (key, value, _) = unsafe { self.erase_node(Node::from_links(pos)) };
        Some((key, value))
    }

    /// Remove and return the least entry. O(1) expected: the first node has
    /// no left child, so deletion is the leaf or one-child case.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        if self.is_empty() {
            return None;
        }
        let node = unsafe { Node::<K, V>::from_links(self.first) };
        let (key, value, _) = unsafe { self.erase_node(node) };
        Some((key, value))
    }

    /// Remove and return the greatest entry.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        if self.is_empty() {
            return None;
        }
        let last = unsafe { (*self.sentinel).prev };
        let node = unsafe { Node::<K, V>::from_links(last) };
        let (key, value, _) = unsafe { self.erase_node(node) };
        Some((key, value))
    }

    /// Keep only the entries for which the predicate returns `true`,
    /// visiting them in ascending key order.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut pos = self.first;
        while !self.is_end(pos) {
            let node = unsafe { Node::<K, V>::from_links(pos) };
            let keep = unsafe { f(&(*node).key, &mut (*node).value) };
            pos = if keep {
                unsafe { (*node).links.next }
            } else {
                unsafe { self.erase_node(node).2 }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(map: &ListMap<i32, i32>) -> Vec<i32> {
        map.keys().copied().collect()
    }

    #[test]
    fn remove_present_and_absent() {
        let mut map: ListMap<i32, i32> = (0..10).map(|i| (i, i * 10)).collect();
        assert_eq!(map.remove(&4), Some(40));
        assert_eq!(map.len(), 9);
        assert_eq!(map.remove(&4), None);
        assert_eq!(map.len(), 9);
        assert!(!map.contains_key(&4));
        map.check_invariants();
    }

    #[test]
    fn remove_entry_returns_stored_key() {
        let mut map: ListMap<String, i32> = [("k".to_owned(), 7)].into();
        let (key, value) = map.remove_entry("k").unwrap();
        assert_eq!((key.as_str(), value), ("k", 7));
        assert!(map.is_empty());
        map.check_invariants();
    }

    #[test]
    fn remove_every_node_shape() {
        // Erase in an order that exercises leaf, one-child, and two-child
        // deletions against a checked structure.
        let mut map: ListMap<i32, i32> = (0..64).map(|i| ((i * 37) % 64, i)).collect();
        for key in [31, 0, 63, 17, 32, 1, 2, 62, 40] {
            assert!(map.remove(&key).is_some());
            map.check_invariants();
        }
        for key in keys(&map) {
            map.remove(&key);
            map.check_invariants();
        }
        assert!(map.is_empty());
    }

    #[test]
    fn pop_first_and_last_drain_in_order() {
        let mut map: ListMap<i32, i32> = (0..10).map(|i| (i, i)).collect();
        assert_eq!(map.pop_first(), Some((0, 0)));
        assert_eq!(map.pop_last(), Some((9, 9)));
        map.check_invariants();

        let mut drained = Vec::new();
        while let Some((k, _)) = map.pop_first() {
            drained.push(k);
        }
        assert_eq!(drained, [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(map.pop_first(), None);
        assert_eq!(map.pop_last(), None);
    }

    #[test]
    fn retain_keeps_matching_entries() {
        let mut map: ListMap<i32, i32> = (0..20).map(|i| (i, i)).collect();
        map.retain(|k, v| {
            *v *= 2;
            k % 3 == 0
        });
        assert_eq!(keys(&map), [0, 3, 6, 9, 12, 15, 18]);
        assert_eq!(map[&6], 12);
        map.check_invariants();
    }

    #[test]
    fn erasing_sole_node_leaves_usable_map() {
        let mut map: ListMap<i32, i32> = [(1, 1)].into();
        assert_eq!(map.remove(&1), Some(1));
        assert!(map.is_empty());
        assert!(map.iter().next().is_none());
        map.check_invariants();
        map.insert(2, 2);
        assert_eq!(map.len(), 1);
        map.check_invariants();
    }
}
