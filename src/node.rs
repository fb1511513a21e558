//! Tree node storage.
//!
//! Nodes own their subtrees directly through `Box` links. The structure is
//! strictly hierarchical: no parent pointers, no sharing, no cycles, so
//! dropping a link releases the whole subtree beneath it.

use rustc_hash::FxHashSet;

/// Unordered set of 64-bit identifiers associated with a single key.
///
/// Duplicates are collapsed; lookups hand out `&IdSet` views into the tree
/// rather than copies.
pub type IdSet = FxHashSet<u64>;

/// Owned child link. `None` is an empty subtree.
pub(crate) type Link<K> = Option<Box<Node<K>>>;

/// A single tree node: one key, its identifier set, and two owned subtrees.
///
/// Partition invariant: every key under `left` compares `Less` than `key`
/// and every key under `right` compares `Greater`, under the comparator
/// the owning index was built with.
#[derive(Debug, Clone)]
pub(crate) struct Node<K> {
    /// The key this node is indexed by.
    pub(crate) key: K,

    /// Identifiers associated with `key`. Never empty while the node is in
    /// the tree; removing the last identifier removes the node itself.
    pub(crate) ids: IdSet,

    /// Subtree of keys comparing `Less` than `key`.
    pub(crate) left: Link<K>,

    /// Subtree of keys comparing `Greater` than `key`.
    pub(crate) right: Link<K>,
}

impl<K> Node<K> {
    /// Leaf node holding a singleton identifier set.
    pub(crate) fn leaf(key: K, id: u64) -> Box<Self> {
        let mut ids = IdSet::default();
        ids.insert(id);

        Box::new(Self {
            key,
            ids,
            left: None,
            right: None,
        })
    }
}
