//! Insertion: BST descent, O(1) list splice, rotate-up to restore the heap.

use std::cmp::Ordering;

use rand::RngCore;

use crate::cursor::CursorMut;
use crate::node::{Links, Node};
use crate::tracing_helpers::trace_log;

use super::ListMap;

/// Which child edge of a parent the rotation pivots around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl<K: Ord, V> ListMap<K, V> {
    /// Insert a key/value pair.
    ///
    /// Returns a cursor to the entry with this key and whether a new entry
    /// was created. When the key is already present nothing changes - the
    /// stored value is kept, no priority is drawn, and the flag is `false`.
    ///
    /// Expected O(log n): one descent, an O(1) splice into the sorted list
    /// between the descent's last left-turn and right-turn nodes, then
    /// rotations while the fresh priority beats the parent's.
    pub fn insert(&mut self, key: K, value: V) -> (CursorMut<'_, K, V>, bool) {
        let mut pos = self.root;
        let mut parent: *mut Node<K, V> = std::ptr::null_mut();
        // In-order neighbors of the insertion point: the last node the
        // descent turned right from precedes the new key, the last node it
        // turned left from succeeds it.
        let mut pred: *mut Node<K, V> = std::ptr::null_mut();
        let mut succ: *mut Node<K, V> = std::ptr::null_mut();

        while !pos.is_null() {
            let current = unsafe { &*pos };
            match key.cmp(&current.key) {
                Ordering::Equal => {
                    let links = Node::as_links(pos);
                    return (CursorMut::new(self, links), false);
                }
                Ordering::Less => {
                    succ = pos;
                    parent = pos;
                    pos = current.left;
                }
                Ordering::Greater => {
                    pred = pos;
                    parent = pos;
                    pos = current.right;
                }
            }
        }

        let priority = self.rng.next_u64();
        trace_log!(priority, "insert: new node");

        let node = Node::alloc(
            key,
            value,
            priority,
            parent,
            Node::as_links(pred),
            Node::as_links(succ),
        );
        if self.sentinel.is_null() {
            self.sentinel = Links::alloc_sentinel();
        }

        // All allocation is done; from here to the end of the splice no
        // operation can fail or panic, so the two structures never observe a
        // half-linked node.
        unsafe {
            // List splice between pred and succ.
            if pred.is_null() {
                self.first = Node::as_links(node);
            } else {
                (*pred).links.next = Node::as_links(node);
            }
            if succ.is_null() {
                // New greatest key: terminate at the sentinel.
                (*node).links.next = self.sentinel;
                (*self.sentinel).prev = Node::as_links(node);
            } else {
                (*succ).links.prev = Node::as_links(node);
            }

            // Attach as a leaf under the descent's final parent. The last
            // step went left exactly when the parent was recorded as the
            // successor.
            if parent.is_null() {
                self.root = node;
            } else if succ == parent {
                (*parent).left = node;
            } else {
                (*parent).right = node;
            }
        }

        let node = self.bubble_up(node);
        self.len += 1;
        (CursorMut::new(self, Node::as_links(node)), true)
    }

    /// Restore the max-heap property after `node` was attached as a leaf:
    /// rotate it up while its priority exceeds its parent's. Returns the
    /// node's final position (unchanged allocation, new links).
    fn bubble_up(&mut self, node: *mut Node<K, V>) -> *mut Node<K, V> {
        loop {
            let parent = unsafe { (*node).parent };
            if parent.is_null() || unsafe { (*node).priority < (*parent).priority } {
                return node;
            }
            let side = if unsafe { (*parent).left } == node {
                Side::Left
            } else {
                Side::Right
            };
            self.rotate(parent, side);
        }
    }

    /// Single treap rotation lifting `a`'s child on `side` into `a`'s place.
    ///
    /// ```text
    ///  side = Left        side = Right
    ///      a        b         a            b
    ///     / \      / \       / \          / \
    ///    b   * => *   a     *   b   =>   a   *
    ///   / \          / \       / \      / \
    ///  *   x        x   *     x   *    *   x
    /// ```
    ///
    /// Reassigns exactly three owning edges (`a`'s slot, the pivot's inner
    /// edge, the pivot's slot under its new parent) and the matching three
    /// parent back-references. BST order is preserved by construction; list
    /// links are untouched because rotation does not change in-order order.
    fn rotate(&mut self, a: *mut Node<K, V>, side: Side) -> *mut Node<K, V> {
        unsafe {
            let slot = self.owner_slot(a);
            let b = match side {
                Side::Left => (*a).left,
                Side::Right => (*a).right,
            };

            // a takes over the pivot's inner subtree.
            let inner = match side {
                Side::Left => std::mem::replace(&mut (*b).right, std::ptr::null_mut()),
                Side::Right => std::mem::replace(&mut (*b).left, std::ptr::null_mut()),
            };
            match side {
                Side::Left => (*a).left = inner,
                Side::Right => (*a).right = inner,
            }
            if !inner.is_null() {
                (*inner).parent = a;
            }

            (*b).parent = (*a).parent;
            (*a).parent = b;
            match side {
                Side::Left => (*b).right = a,
                Side::Right => (*b).left = a,
            }
            *slot = b;
            b
        }
    }
}
