//! # `listmap`
//!
//! An ordered map backed by a treap threaded through a sorted doubly linked
//! list.
//!
//! Every entry is a single node with two identities: a position in a binary
//! search tree that is also a max-heap on random priorities (a treap), and a
//! position in an intrusive doubly linked list kept in ascending key order.
//! The tree gives expected O(log n) insert/erase/search; the list gives
//! exact O(1) neighbor steps, so iteration never descends the tree and
//! erasing a node with two children finds its replacement without a second
//! descent.
//!
//! | Operation | Cost |
//! |-----------|------|
//! | `insert`, `remove`, `find`, bounds | expected O(log n) |
//! | cursor/iterator step | O(1) |
//! | `first_key_value`, `last_key_value`, `pop_first`, `pop_last` | O(1) / expected O(1) |
//! | `clone` | O(n), exact shape and order preserved |
//!
//! # Insert semantics
//!
//! [`ListMap::insert`] never overwrites: a duplicate key leaves the stored
//! value untouched and reports `false`. Use [`ListMap::entry`] or
//! [`ListMap::get_mut`] to update in place.
//!
//! # Example
//!
//! ```
//! use listmap::ListMap;
//!
//! let mut map = ListMap::new();
//! for (k, v) in [(2, "b"), (0, "a"), (4, "c")] {
//!     map.insert(k, v);
//! }
//!
//! assert_eq!(map.lower_bound(&1).key(), Some(&2));
//! assert_eq!(map.upper_bound(&2).key(), Some(&4));
//!
//! let mut cursor = map.find_mut(&2);
//! assert_eq!(cursor.remove(), Some((2, "b")));
//! assert_eq!(cursor.key(), Some(&4));
//!
//! let keys: Vec<i32> = map.keys().copied().collect();
//! assert_eq!(keys, [0, 4]);
//! ```
//!
//! # Thread safety
//!
//! No internal synchronization. `ListMap<K, V>` is `Send`/`Sync` when `K`
//! and `V` are; shared references permit concurrent reads, and any mutation
//! requires the usual exclusive borrow.

#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod check;
mod cursor;
mod entry;
mod iter;
mod map;
mod node;
mod tracing_helpers;

pub use cursor::{Cursor, CursorMut};
pub use entry::{Entry, OccupiedEntry, VacantEntry};
pub use iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
pub use map::ListMap;
