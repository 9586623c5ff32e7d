//! Entry API: single-lookup read-modify-write access to one key's slot.
//!
//! `map.entry(key).or_default()` is the idiomatic rendition of the classic
//! "indexing inserts a default" map operator: one descent decides between
//! the occupied and vacant cases, and the vacant arm inserts lazily.

use std::fmt as StdFmt;

use crate::map::{ListMap, SearchMode};
use crate::node::Node;

/// A view into a single map slot, occupied or vacant.
pub enum Entry<'a, K, V> {
    /// The key is present.
    Occupied(OccupiedEntry<'a, K, V>),
    /// The key is absent; inserting will create it.
    Vacant(VacantEntry<'a, K, V>),
}

/// A view of an existing entry.
pub struct OccupiedEntry<'a, K, V> {
    map: &'a mut ListMap<K, V>,
    node: *mut Node<K, V>,
}

/// A view of a missing entry, holding the key that would be inserted.
pub struct VacantEntry<'a, K, V> {
    map: &'a mut ListMap<K, V>,
    key: K,
}

impl<K: Ord, V> ListMap<K, V> {
    /// Look up `key` once and return a view of its slot.
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        let pos = self.locate(&key, SearchMode::Exact);
        if self.is_end(pos) {
            Entry::Vacant(VacantEntry { map: self, key })
        } else {
            let node = unsafe { Node::from_links(pos) };
            Entry::Occupied(OccupiedEntry { map: self, node })
        }
    }
}

impl<'a, K: Ord, V> Entry<'a, K, V> {
    /// Insert `default` if vacant; return the value either way.
    pub fn or_insert(self, default: V) -> &'a mut V {
        self.or_insert_with(|| default)
    }

    /// Insert the closure's result if vacant; return the value either way.
    pub fn or_insert_with<F: FnOnce() -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Insert `V::default()` if vacant; return the value either way.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(V::default)
    }

    /// Run `f` on the value if occupied, then return the entry unchanged.
    #[must_use]
    pub fn and_modify<F: FnOnce(&mut V)>(mut self, f: F) -> Self {
        if let Entry::Occupied(entry) = &mut self {
            f(entry.get_mut());
        }
        self
    }

    /// The key this entry refers to.
    #[must_use]
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// The stored key.
    #[must_use]
    pub fn key(&self) -> &K {
        unsafe { &(*self.node).key }
    }

    /// Shared reference to the stored value.
    #[must_use]
    pub fn get(&self) -> &V {
        unsafe { &(*self.node).value }
    }

    /// Exclusive reference to the stored value.
    #[must_use]
    pub fn get_mut(&mut self) -> &mut V {
        unsafe { &mut (*self.node).value }
    }

    /// Exclusive reference with the full borrow lifetime.
    #[must_use]
    pub fn into_mut(self) -> &'a mut V {
        unsafe { &mut (*self.node).value }
    }

    /// Replace the stored value, returning the old one.
    pub fn insert(&mut self, value: V) -> V {
        std::mem::replace(self.get_mut(), value)
    }

    /// Remove this entry, returning its value.
    pub fn remove(self) -> V {
        self.remove_entry().1
    }

    /// Remove this entry, returning the stored key and value.
    pub fn remove_entry(self) -> (K, V) {
        let (key, value, _) = unsafe { self.map.erase_node(self.node) };
        (key, value)
    }
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// The key that would be inserted.
    #[must_use]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Take back the key without inserting.
    #[must_use]
    pub fn into_key(self) -> K {
        self.key
    }

    /// Insert the value, returning a reference to it.
    pub fn insert(self, value: V) -> &'a mut V
    where
        K: Ord,
    {
        let (cursor, inserted) = self.map.insert(self.key, value);
        debug_assert!(inserted);
        cursor
            .into_value_mut()
            .unwrap_or_else(|| unreachable!("fresh insert is never the end position"))
    }
}

impl<K: StdFmt::Debug, V: StdFmt::Debug> StdFmt::Debug for Entry<'_, K, V> {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        match self {
            Entry::Occupied(entry) => f
                .debug_struct("Entry")
                .field("key", entry.key())
                .field("value", entry.get())
                .finish(),
            Entry::Vacant(entry) => f.debug_struct("Entry").field("key", entry.key()).finish(),
        }
    }
}
