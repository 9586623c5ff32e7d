//! Whole-structure invariant validation.
//!
//! Walks the entire map and panics on the first violation of the coupling
//! contract between the tree and the list. Never called on a production
//! path; the test suites invoke it after mutating operations. The checks
//! mirror the structure's definition:
//!
//! - every node's list neighbors bracket its key (BST order, verified
//!   against the list rather than by subtree min/max bookkeeping),
//! - child priorities never exceed the parent's (max-heap order),
//! - `parent`/`left`/`right` and `prev`/`next` back-references are mutually
//!   consistent, including the sentinel's,
//! - the list from `first` to the sentinel has exactly `len` nodes and
//!   strictly ascending keys.

use crate::map::ListMap;
use crate::node::Node;

impl<K: Ord, V> ListMap<K, V> {
    /// Validate every structural invariant, panicking with a description of
    /// the first violation. Test/debug use only.
    ///
    /// # Panics
    ///
    /// Panics when the structure is inconsistent.
    #[doc(hidden)]
    pub fn check_invariants(&self) {
        if self.root.is_null() {
            assert_eq!(self.len, 0, "empty tree but len = {}", self.len);
            assert!(
                self.first.is_null() || self.first == self.sentinel,
                "empty tree but first points at a node"
            );
            if !self.sentinel.is_null() {
                assert!(
                    unsafe { (*self.sentinel).prev.is_null() },
                    "empty tree but sentinel has a predecessor"
                );
            }
            return;
        }

        assert!(!self.sentinel.is_null(), "nonempty tree without a sentinel");
        assert!(
            unsafe { (*self.root).parent.is_null() },
            "root has a parent"
        );
        self.check_node(self.root);
        self.check_list();
    }

    fn check_node(&self, node: *mut Node<K, V>) {
        let n = unsafe { &*node };
        let links = Node::as_links(node);

        // List back-reference consistency around this node.
        let prev = n.links.prev;
        let next = n.links.next;
        assert!(!next.is_null(), "live node with null next");
        if !prev.is_null() {
            assert!(unsafe { (*prev).next } == links, "prev.next != node");
        } else {
            assert!(self.first == links, "null prev on a non-first node");
        }
        assert!(unsafe { (*next).prev } == links, "next.prev != node");

        // BST order against list neighbors: the predecessor is the greatest
        // smaller key, the successor the least greater one, so comparing
        // against them subsumes subtree bounds.
        if !prev.is_null() {
            let p = unsafe { &*Node::<K, V>::from_links(prev) };
            assert!(p.key < n.key, "list order broken before node");
        }
        if next != self.sentinel {
            let s = unsafe { &*Node::<K, V>::from_links(next) };
            assert!(n.key < s.key, "list order broken after node");
        }

        // Tree back-references, heap order, and subtree/list agreement: a
        // nonempty left subtree means the predecessor lies inside it.
        if !n.left.is_null() {
            let left = unsafe { &*n.left };
            assert!(left.parent == node, "left child's parent is wrong");
            assert!(left.priority <= n.priority, "heap order broken on left");
            assert!(!prev.is_null(), "left subtree but no list predecessor");
            let p = unsafe { &*Node::<K, V>::from_links(prev) };
            assert!(left.key <= p.key, "left subtree reaches past predecessor");
            self.check_node(n.left);
        }
        if !n.right.is_null() {
            let right = unsafe { &*n.right };
            assert!(right.parent == node, "right child's parent is wrong");
            assert!(right.priority <= n.priority, "heap order broken on right");
            assert!(next != self.sentinel, "right subtree but no list successor");
            let s = unsafe { &*Node::<K, V>::from_links(next) };
            assert!(s.key <= right.key, "right subtree reaches before successor");
            self.check_node(n.right);
        }
    }

    /// The list from `first` to the sentinel holds exactly `len` nodes.
    fn check_list(&self) {
        let mut count = 0;
        let mut pos = self.first;
        while pos != self.sentinel {
            assert!(!pos.is_null(), "list broke off before the sentinel");
            count += 1;
            assert!(count <= self.len, "list longer than len (cycle?)");
            pos = unsafe { (*pos).next };
        }
        assert_eq!(count, self.len, "list length disagrees with len");
        assert!(
            unsafe { (*self.sentinel).next.is_null() },
            "sentinel grew a successor"
        );
    }
}
