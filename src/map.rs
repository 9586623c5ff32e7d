//! `ListMap` - an ordered map on a treap threaded through a sorted list.
//!
//! This module holds the container state, the unified search routine, and
//! the structural plumbing (ownership slots, teardown). Insertion and
//! erasure live in the `insert` and `remove` submodules.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt as StdFmt;
use std::marker::PhantomData;
use std::ptr;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::cursor::{Cursor, CursorMut};
use crate::node::{Links, Node};
use crate::tracing_helpers::debug_log;

mod insert;
mod remove;

// ============================================================================
//  ListMap
// ============================================================================

/// An ordered map from keys to values.
///
/// Backed by a treap (a binary search tree that is simultaneously a max-heap
/// on random per-node priorities) whose nodes are threaded into a doubly
/// linked list in ascending key order. Insert, erase, and search run in
/// expected O(log n); stepping to a neighbor in key order is exact O(1).
///
/// Unlike [`std::collections::BTreeMap`], [`insert`](Self::insert) never
/// overwrites: inserting a key that is already present leaves the stored
/// value untouched and reports `false`. Use [`entry`](Self::entry) or
/// [`get_mut`](Self::get_mut) to update values in place.
///
/// # Example
///
/// ```
/// use listmap::ListMap;
///
/// let mut map = ListMap::new();
/// map.insert(2, "two");
/// map.insert(1, "one");
/// map.insert(3, "three");
///
/// let keys: Vec<i32> = map.keys().copied().collect();
/// assert_eq!(keys, [1, 2, 3]);
/// ```
pub struct ListMap<K, V> {
    /// Owning edge to the tree root; null when empty.
    pub(crate) root: *mut Node<K, V>,
    /// Owned end-of-list marker; allocated on first insert, null before.
    pub(crate) sentinel: *mut Links,
    /// Alias of the least node (or the sentinel once one exists).
    pub(crate) first: *mut Links,
    pub(crate) len: usize,
    /// Priority source; advanced once per successful insert.
    pub(crate) rng: SmallRng,
    /// `ListMap` logically owns `Node<K, V>` allocations.
    pub(crate) _marker: PhantomData<Box<Node<K, V>>>,
}

// Raw pointers only ever alias allocations owned by this map, so the usual
// container rules apply.
unsafe impl<K: Send, V: Send> Send for ListMap<K, V> {}
unsafe impl<K: Sync, V: Sync> Sync for ListMap<K, V> {}

/// Which query the unified descent answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchMode {
    /// Stop on equality; miss reports the end position.
    Exact,
    /// First position with key >= target.
    LowerBound,
    /// First position with key > target; equality descends right.
    UpperBound,
}

impl<K, V> ListMap<K, V> {
    /// Create an empty map.
    ///
    /// Allocates nothing; the sentinel appears on first insert. The priority
    /// engine is seeded from the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: ptr::null_mut(),
            sentinel: ptr::null_mut(),
            first: ptr::null_mut(),
            len: 0,
            rng: SmallRng::from_entropy(),
            _marker: PhantomData,
        }
    }

    /// Number of entries in the map.
    #[must_use]
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the map holds no entries.
    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remove every entry.
    ///
    /// Frees all nodes and the sentinel; the map returns to its freshly
    /// constructed state (minus the already-advanced priority engine).
    pub fn clear(&mut self) {
        debug_log!(len = self.len, "clear");
        Self::drop_subtree(self.root);
        if !self.sentinel.is_null() {
            unsafe { drop(Box::from_raw(self.sentinel)) };
        }
        self.root = ptr::null_mut();
        self.sentinel = ptr::null_mut();
        self.first = ptr::null_mut();
        self.len = 0;
    }

    /// Free `node` and everything below it via the owning child edges.
    fn drop_subtree(node: *mut Node<K, V>) {
        if node.is_null() {
            return;
        }
        let boxed = unsafe { Box::from_raw(node) };
        Self::drop_subtree(boxed.left);
        Self::drop_subtree(boxed.right);
    }

    // ------------------------------------------------------------------
    //  Search
    // ------------------------------------------------------------------

    /// Unified descent for exact / lower-bound / upper-bound queries.
    ///
    /// Returns the list position answering the query: a real node, or the
    /// sentinel (possibly still null on a never-inserted map) for "one past
    /// the last".
    pub(crate) fn locate<Q>(&self, key: &Q, mode: SearchMode) -> *mut Links
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        let mut x = self.root;
        // Most recent node descended left from: the least key >= target seen.
        let mut bound = self.sentinel;

        while !x.is_null() {
            let node = unsafe { &*x };
            match key.cmp(node.key.borrow()) {
                Ordering::Equal if mode != SearchMode::UpperBound => {
                    return Node::as_links(x);
                }
                Ordering::Less => {
                    bound = Node::as_links(x);
                    x = node.left;
                }
                Ordering::Greater | Ordering::Equal => x = node.right,
            }
        }

        match mode {
            SearchMode::Exact => self.sentinel,
            SearchMode::LowerBound | SearchMode::UpperBound => bound,
        }
    }

    /// Cursor to the entry with exactly this key, or the end cursor.
    pub fn find<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        Cursor::new(self, self.locate(key, SearchMode::Exact))
    }

    /// Mutable cursor to the entry with exactly this key, or the end cursor.
    pub fn find_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        let pos = self.locate(key, SearchMode::Exact);
        CursorMut::new(self, pos)
    }

    /// Cursor to the first entry with key >= `key`, or the end cursor.
    pub fn lower_bound<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        Cursor::new(self, self.locate(key, SearchMode::LowerBound))
    }

    /// Mutable counterpart of [`lower_bound`](Self::lower_bound).
    pub fn lower_bound_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        let pos = self.locate(key, SearchMode::LowerBound);
        CursorMut::new(self, pos)
    }

    /// Cursor to the first entry with key > `key`, or the end cursor.
    pub fn upper_bound<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        Cursor::new(self, self.locate(key, SearchMode::UpperBound))
    }

    /// Mutable counterpart of [`upper_bound`](Self::upper_bound).
    pub fn upper_bound_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        let pos = self.locate(key, SearchMode::UpperBound);
        CursorMut::new(self, pos)
    }

    /// Shared reference to the value stored under `key`.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        let pos = self.locate(key, SearchMode::Exact);
        if self.is_end(pos) {
            None
        } else {
            unsafe { Some(&(*Node::<K, V>::from_links(pos)).value) }
        }
    }

    /// Exclusive reference to the value stored under `key`.
    #[must_use]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        let pos = self.locate(key, SearchMode::Exact);
        if self.is_end(pos) {
            None
        } else {
            unsafe { Some(&mut (*Node::<K, V>::from_links(pos)).value) }
        }
    }

    /// Whether an entry with this key exists.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        !self.is_end(self.locate(key, SearchMode::Exact))
    }

    /// Entry with the least key, or `None` when empty. O(1).
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        if self.is_empty() {
            return None;
        }
        let node = unsafe { &*Node::<K, V>::from_links(self.first) };
        Some((&node.key, &node.value))
    }

    /// Entry with the greatest key, or `None` when empty. O(1).
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        if self.is_empty() {
            return None;
        }
        let last = unsafe { (*self.sentinel).prev };
        let node = unsafe { &*Node::<K, V>::from_links(last) };
        Some((&node.key, &node.value))
    }

    // ------------------------------------------------------------------
    //  Internal plumbing
    // ------------------------------------------------------------------

    /// Whether a list position is the end position (sentinel, or null on a
    /// map that never allocated one).
    #[inline]
    pub(crate) fn is_end(&self, pos: *mut Links) -> bool {
        pos.is_null() || pos == self.sentinel
    }

    /// The owning slot holding `node`: the root field, or the parent's
    /// matching child edge. Returned as a raw place so callers can retarget
    /// it while holding other aliases.
    pub(crate) fn owner_slot(&mut self, node: *mut Node<K, V>) -> *mut *mut Node<K, V> {
        unsafe {
            let parent = (*node).parent;
            if parent.is_null() {
                &raw mut self.root
            } else if (*parent).left == node {
                &raw mut (*parent).left
            } else {
                &raw mut (*parent).right
            }
        }
    }
}

impl<K, V> Drop for ListMap<K, V> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K, V> Default for ListMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
//  Construction from sequences
// ============================================================================

impl<K: Ord, V> FromIterator<(K, V)> for ListMap<K, V> {
    /// Build a map from key/value pairs.
    ///
    /// Duplicate keys keep the **first** occurrence, matching
    /// [`insert`](ListMap::insert) semantics.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for ListMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for ListMap<K, V> {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

// ============================================================================
//  Comparisons and formatting
// ============================================================================

impl<K: PartialEq, V: PartialEq> PartialEq for ListMap<K, V> {
    /// Logical equality: same key/value sequence. Priorities (and hence tree
    /// shape) are balancing state and deliberately excluded.
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for ListMap<K, V> {}

impl<K: StdFmt::Debug, V: StdFmt::Debug> StdFmt::Debug for ListMap<K, V> {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, Q, V> std::ops::Index<&Q> for ListMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: Ord + ?Sized,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is absent.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

// ============================================================================
//  Clone
// ============================================================================

impl<K: Clone, V: Clone> Clone for ListMap<K, V> {
    /// Deep copy reproducing tree shape, priorities, and list order.
    ///
    /// One recursive pass discovers each subtree's in-order boundary nodes
    /// and splices list links on the way up, so the copy needs no
    /// rebalancing. The copy draws a fresh entropy seed for its own priority
    /// engine; priorities are balancing state, not part of logical equality.
    ///
    /// If `K::clone` or `V::clone` panics mid-copy the partially built clone
    /// is leaked, never freed twice.
    fn clone(&self) -> Self {
        debug_log!(len = self.len, "clone");
        let mut map = Self::new();
        if self.is_empty() {
            return map;
        }

        let mut first: *mut Links = ptr::null_mut();
        let mut last: *mut Links = ptr::null_mut();
        let root = Self::clone_subtree(self.root, &mut first, &mut last);
        let sentinel = Links::alloc_sentinel();

        // No panicking code below this point.
        unsafe {
            (*sentinel).prev = last;
            (*last).next = sentinel;
        }
        map.root = root;
        map.sentinel = sentinel;
        map.first = first;
        map.len = self.len;
        map
    }
}

impl<K: Clone, V: Clone> ListMap<K, V> {
    /// Clone the subtree under `node`, reporting its in-order first and last
    /// nodes through `first`/`last` so the caller can splice list links
    /// across subtree boundaries.
    fn clone_subtree(
        node: *const Node<K, V>,
        first: &mut *mut Links,
        last: &mut *mut Links,
    ) -> *mut Node<K, V> {
        let source = unsafe { &*node };

        // In-order neighbors of the new node, discovered by the recursive
        // calls: its predecessor is the left subtree's last node, its
        // successor the right subtree's first.
        let mut prev: *mut Links = ptr::null_mut();
        let mut next: *mut Links = ptr::null_mut();

        let left = if source.left.is_null() {
            ptr::null_mut()
        } else {
            Self::clone_subtree(source.left, first, &mut prev)
        };
        let right = if source.right.is_null() {
            ptr::null_mut()
        } else {
            Self::clone_subtree(source.right, &mut next, last)
        };

        let root = Box::into_raw(Box::new(Node {
            links: Links::new(prev, next),
            parent: ptr::null_mut(),
            left,
            right,
            priority: source.priority,
            key: source.key.clone(),
            value: source.value.clone(),
        }));

        unsafe {
            if left.is_null() {
                *first = Node::as_links(root);
            } else {
                (*left).parent = root;
            }
            if right.is_null() {
                *last = Node::as_links(root);
            } else {
                (*right).parent = root;
            }
            if !prev.is_null() {
                (*prev).next = Node::as_links(root);
            }
            if !next.is_null() {
                (*next).prev = Node::as_links(root);
            }
        }

        root
    }
}
