//! Node layout: one allocation that lives in the tree and the list at once.
//!
//! Every element of the map is a single heap allocation with two identities:
//!
//! - a **tree node**: `parent` back-reference plus `left`/`right` child edges.
//!   The child edges are the *owning* edges; a node is freed exactly once, by
//!   whoever clears the owning edge pointing at it.
//! - a **list node**: the embedded [`Links`] pair threads the node into a
//!   doubly linked list kept in ascending key order, giving O(1)
//!   predecessor/successor steps during iteration and erasure.
//!
//! The list's terminal marker is a *sentinel*: a bare `Links` allocation with
//! no key, value, or tree presence. Both structs are `#[repr(C)]` with
//! `Links` as the first field of [`Node`], so a `*mut Links` that is known to
//! address a real node can be cast back to `*mut Node<K, V>`. Cursors and
//! iterators only ever hold `*mut Links` and perform that cast after checking
//! against the sentinel.

use std::ptr;

/// Priorities are drawn once per node from the map's random engine and never
/// change except during erasure, where a relocated replacement inherits the
/// erased node's priority.
pub(crate) type Priority = u64;

// ============================================================================
//  Links
// ============================================================================

/// The intrusive list core: predecessor/successor pointers in key order.
///
/// Embedded as the first field of every [`Node`]; also allocated standalone
/// as the end-of-list sentinel. Neither pointer is owning.
#[repr(C)]
pub(crate) struct Links {
    /// Previous node in key order; null for the first node and for a
    /// sentinel of an empty list.
    pub(crate) prev: *mut Links,
    /// Next node in key order; the last real node points at the sentinel,
    /// which itself has a null `next`.
    pub(crate) next: *mut Links,
}

impl Links {
    pub(crate) const fn new(prev: *mut Links, next: *mut Links) -> Self {
        Self { prev, next }
    }

    /// Allocate a detached sentinel.
    pub(crate) fn alloc_sentinel() -> *mut Links {
        Box::into_raw(Box::new(Self::new(ptr::null_mut(), ptr::null_mut())))
    }
}

// ============================================================================
//  Node
// ============================================================================

/// A map element: list links, tree links, balancing priority, key, value.
///
/// `links` must stay the first field (`repr(C)`) so `*mut Links` round-trips
/// to `*mut Node`.
#[repr(C)]
pub(crate) struct Node<K, V> {
    pub(crate) links: Links,
    /// Non-owning back-reference; null at the root.
    pub(crate) parent: *mut Node<K, V>,
    /// Owning edge to the left subtree (keys strictly below `key`).
    pub(crate) left: *mut Node<K, V>,
    /// Owning edge to the right subtree (keys strictly above `key`).
    pub(crate) right: *mut Node<K, V>,
    /// Max-heap priority; bounds expected depth to O(log n).
    pub(crate) priority: Priority,
    /// Immutable after creation.
    pub(crate) key: K,
    pub(crate) value: V,
}

impl<K, V> Node<K, V> {
    /// Allocate a leaf node already wired with its list neighbors and tree
    /// parent. The caller finishes the splice by pointing the neighbors (and
    /// the parent's child edge) back at the returned node.
    pub(crate) fn alloc(
        key: K,
        value: V,
        priority: Priority,
        parent: *mut Self,
        prev: *mut Links,
        next: *mut Links,
    ) -> *mut Self {
        Box::into_raw(Box::new(Self {
            links: Links::new(prev, next),
            parent,
            left: ptr::null_mut(),
            right: ptr::null_mut(),
            priority,
            key,
            value,
        }))
    }

    /// Upcast to the list identity.
    #[inline]
    pub(crate) fn as_links(node: *mut Self) -> *mut Links {
        node.cast()
    }

    /// Downcast from the list identity.
    ///
    /// # Safety
    ///
    /// `links` must address a real node, not the sentinel.
    #[inline]
    pub(crate) unsafe fn from_links(links: *mut Links) -> *mut Self {
        links.cast()
    }
}
