//! # `ordered-index`
//!
//! An in-memory ordered multimap index: a binary search tree from a single
//! comparable key to a set of 64-bit integer identifiers (record handles),
//! with configurable conflict resolution on insert.
//!
//! The index is the ordering core of a host indexing/query layer: the host
//! extracts `(key, identifier)` pairs from its records by inspecting a
//! configured field, feeds them in through [`OrderedIndex::add`] /
//! [`OrderedIndex::add_range`], and reads them back through keyed lookups
//! and the ascending [`OrderedIndex::keys`] traversal.
//!
//! | Feature | Status |
//! |---------|--------|
//! | Merge / replace / unique insert strategies | Works |
//! | Ordered traversal, O(1) key/value counters | Works |
//! | Custom comparators | Works (trait or closure) |
//! | Rebalancing | Not implemented (`optimize` is a reserved no-op) |
//! | Null keys | Rejected by contract |
//!
//! ## Thread Safety
//!
//! `OrderedIndex` is single-threaded: mutation requires `&mut self` and
//! there is no internal locking. It must not be shared for concurrent
//! mutation, or mutated while another thread reads; that exclusion is the
//! caller's contract.
//!
//! ## Shape Caveat
//!
//! The tree is never rebalanced. Sorted insertion order degrades it to a
//! chain, making every operation linear in the key count. Hosts that ingest
//! sorted batches should shuffle or accept the degraded shape.
//!
//! ```rust
//! use ordered_index::{IndexError, InsertStrategy, OrderedIndex};
//!
//! let mut index: OrderedIndex<i64> = OrderedIndex::new();
//! index.add(Some(3), 30, InsertStrategy::Merge)?;
//! index.add(Some(1), 10, InsertStrategy::Merge)?;
//! index.add(Some(3), 31, InsertStrategy::Merge)?;
//!
//! assert_eq!(index.key_count(), 2);
//! assert_eq!(index.value_count(), 3);
//! assert_eq!(index.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
//! # Ok::<(), IndexError>(())
//! ```

#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Hot accessors are #[inline(always)]; placement mirrors the benchmarks.
#![allow(clippy::inline_always)]

pub mod config;
pub mod error;
pub mod iter;
pub mod node;
pub mod ordering;
pub mod strategy;
pub mod tree;

mod tracing_helpers;

// Re-export main types for convenience
pub use config::IndexConfig;
pub use error::{ConfigError, IndexError};
pub use iter::{Iter, Keys};
pub use node::IdSet;
pub use ordering::{KeyComparator, NaturalOrder};
pub use strategy::InsertStrategy;
pub use tree::OrderedIndex;
