//! `OrderedIndex` - a binary-search-tree multimap from keys to identifier sets.
//!
//! This module provides the main [`OrderedIndex<K, C>`] type: an unbalanced
//! binary search tree keyed by a [`KeyComparator`], each node carrying the
//! set of 64-bit identifiers filed under that key.

use std::any;
use std::cmp::Ordering;
use std::fmt as StdFmt;
use std::mem;

use crate::config::IndexConfig;
use crate::error::{ConfigError, IndexError};
use crate::iter::{Iter, Keys};
use crate::node::{IdSet, Link, Node};
use crate::ordering::{KeyComparator, NaturalOrder};
use crate::strategy::InsertStrategy;
use crate::tracing_helpers::{debug_log, trace_log};

// ============================================================================
//  AddOutcome
// ============================================================================

/// What an insert did at the matched (or created) node.
///
/// Counter adjustments happen once, at the top of [`OrderedIndex::add`],
/// from this summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AddOutcome {
    /// A new node was created for the key.
    NewKey,

    /// The identifier joined an existing set.
    Merged,

    /// The identifier was already present; nothing changed.
    Unchanged,

    /// The existing set was discarded; holds the discarded set's size.
    Replaced(usize),
}

// ============================================================================
//  OrderedIndex
// ============================================================================

/// An in-memory ordered multimap index.
///
/// Maps keys of type `K` to sets of 64-bit identifiers, ordered by a
/// [`KeyComparator`] supplied at construction ([`NaturalOrder`] by
/// default). Collisions on insert are resolved per call through an
/// [`InsertStrategy`].
///
/// The backing structure is a plain binary search tree with owned child
/// links. It is **not rebalanced**: adversarial insertion order (for
/// example strictly ascending keys) degrades it to a linked chain, and
/// every operation's cost is proportional to tree height. `optimize` is
/// reserved for a future rebalancing pass and currently does nothing.
///
/// Null (absent) keys are not supported: every keyed operation taking
/// `Option` rejects `None` with [`IndexError::NullKey`], and
/// [`OrderedIndex::supports_nullable_keys`] reports `false`.
///
/// # Thread Safety
///
/// The index is single-threaded. Mutation takes `&mut self`, so the
/// borrow checker already rules out concurrent mutation through safe code;
/// callers wrapping the index in interior-mutability or `unsafe` cells
/// must provide their own exclusion. There is no internal locking.
///
/// # Example
///
/// ```rust
/// use ordered_index::{InsertStrategy, OrderedIndex};
///
/// let mut index: OrderedIndex<i64> = OrderedIndex::new();
/// index.add(Some(10), 1, InsertStrategy::Merge)?;
/// index.add(Some(10), 2, InsertStrategy::Merge)?;
///
/// let ids = index.get(Some(&10))?;
/// assert_eq!(ids.len(), 2);
/// # Ok::<(), ordered_index::IndexError>(())
/// ```
pub struct OrderedIndex<K, C = NaturalOrder> {
    /// Root of the owned tree; `None` when empty.
    root: Link<K>,

    /// Number of distinct keys. Always equals the node count of a full
    /// traversal.
    key_count: usize,

    /// Sum of identifier-set sizes across all keys.
    value_count: usize,

    /// Total-order comparator steering descent.
    cmp: C,

    /// Record field the key is derived from, when host-configured.
    key_field: Option<String>,
}

impl<K, C> StdFmt::Debug for OrderedIndex<K, C> {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        f.debug_struct("OrderedIndex")
            .field("key_count", &self.key_count)
            .field("value_count", &self.value_count)
            .field("key_field", &self.key_field)
            .finish_non_exhaustive()
    }
}

// ============================================================================
//  Construction
// ============================================================================

impl<K: Ord> OrderedIndex<K> {
    /// Create a new empty index ordered by the key type's own [`Ord`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }

    /// Create an index from host configuration.
    ///
    /// The config must name the record field the key is derived from; the
    /// name stays readable through [`OrderedIndex::key_field`].
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingKeyField`] if no key-source field is
    /// configured.
    pub fn with_config(config: IndexConfig) -> Result<Self, ConfigError> {
        Self::with_config_and_comparator(config, NaturalOrder)
    }
}

impl<K: Ord> Default for OrderedIndex<K> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C> OrderedIndex<K, C>
where
    C: KeyComparator<K>,
{
    /// Create a new empty index with a custom comparator.
    #[must_use]
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            root: None,
            key_count: 0,
            value_count: 0,
            cmp,
            key_field: None,
        }
    }

    /// Create an index from host configuration with a custom comparator.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingKeyField`] if no key-source field is
    /// configured.
    pub fn with_config_and_comparator(config: IndexConfig, cmp: C) -> Result<Self, ConfigError> {
        let key_field: String = config.into_key_field()?;
        let mut index = Self::with_comparator(cmp);
        index.key_field = Some(key_field);
        Ok(index)
    }

    /// The record field this index derives its keys from, if configured.
    #[must_use]
    pub fn key_field(&self) -> Option<&str> {
        self.key_field.as_deref()
    }

    // ========================================================================
    //  Capabilities
    // ========================================================================

    /// Whether null (absent) keys can be indexed. Always `false`.
    #[must_use]
    #[inline(always)]
    pub const fn supports_nullable_keys(&self) -> bool {
        false
    }

    /// Runtime name of the key type currently held by the tree.
    ///
    /// `None` while the index is empty: an empty tree constrains the key
    /// only to "comparable", so no concrete type is reported.
    #[must_use]
    pub fn key_type(&self) -> Option<&'static str> {
        self.root.as_ref().map(|_| any::type_name::<K>())
    }

    // ========================================================================
    //  Counters
    // ========================================================================

    /// Number of distinct keys in the index. O(1).
    #[must_use]
    #[inline(always)]
    pub const fn key_count(&self) -> usize {
        self.key_count
    }

    /// Total number of identifiers across all keys. O(1).
    #[must_use]
    #[inline(always)]
    pub const fn value_count(&self) -> usize {
        self.value_count
    }

    /// Check if the index holds no keys.
    #[must_use]
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.key_count == 0
    }

    // ========================================================================
    //  Insert
    // ========================================================================

    /// Insert an identifier under `key`, resolving collisions per
    /// `strategy`.
    ///
    /// # Errors
    ///
    /// * [`IndexError::NullKey`] - `key` is `None`.
    /// * [`IndexError::KeyExists`] - the key is already present and
    ///   `strategy` is [`InsertStrategy::Unique`]; the tree is unchanged.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip_all))]
    pub fn add(
        &mut self,
        key: Option<K>,
        id: u64,
        strategy: InsertStrategy,
    ) -> Result<(), IndexError> {
        let key = key.ok_or(IndexError::NullKey)?;

        match Self::add_link(&mut self.root, key, id, strategy, &self.cmp)? {
            AddOutcome::NewKey => {
                self.key_count += 1;
                self.value_count += 1;
            }
            AddOutcome::Merged => self.value_count += 1,
            AddOutcome::Unchanged => {}
            AddOutcome::Replaced(discarded) => {
                self.value_count = self.value_count - discarded + 1;
            }
        }

        trace_log!(
            id,
            key_count = self.key_count,
            value_count = self.value_count,
            "add"
        );
        Ok(())
    }

    /// Insert a batch of `(key, identifier)` pairs in input order.
    ///
    /// Not atomic: the first failing element aborts the batch, leaving
    /// prior insertions applied.
    ///
    /// # Errors
    ///
    /// Whatever [`OrderedIndex::add`] returns for the failing element.
    pub fn add_range<I>(&mut self, pairs: I, strategy: InsertStrategy) -> Result<(), IndexError>
    where
        I: IntoIterator<Item = (Option<K>, u64)>,
    {
        for (key, id) in pairs {
            self.add(key, id, strategy)?;
        }
        Ok(())
    }

    /// Recursive descent for insert. Creates a leaf when the slot for the
    /// key is empty, otherwise applies the strategy at the matched node.
    fn add_link(
        link: &mut Link<K>,
        key: K,
        id: u64,
        strategy: InsertStrategy,
        cmp: &C,
    ) -> Result<AddOutcome, IndexError> {
        let Some(node) = link.as_deref_mut() else {
            *link = Some(Node::leaf(key, id));
            return Ok(AddOutcome::NewKey);
        };

        match cmp.compare(&key, &node.key) {
            Ordering::Less => Self::add_link(&mut node.left, key, id, strategy, cmp),
            Ordering::Greater => Self::add_link(&mut node.right, key, id, strategy, cmp),
            Ordering::Equal => match strategy {
                InsertStrategy::Merge => {
                    if node.ids.insert(id) {
                        Ok(AddOutcome::Merged)
                    } else {
                        Ok(AddOutcome::Unchanged)
                    }
                }
                InsertStrategy::Replace => {
                    let discarded: usize = node.ids.len();
                    node.ids.clear();
                    node.ids.insert(id);
                    Ok(AddOutcome::Replaced(discarded))
                }
                InsertStrategy::Unique => Err(IndexError::KeyExists),
            },
        }
    }

    // ========================================================================
    //  Lookup
    // ========================================================================

    /// Look up the identifier set for `key` without erroring.
    ///
    /// Returns a live read view into the tree, not a copy. `None` for a
    /// missing key and for a null key; this is the non-erroring
    /// counterpart of [`OrderedIndex::get`].
    #[must_use]
    pub fn try_get_values(&self, key: Option<&K>) -> Option<&IdSet> {
        let key = key?;
        Self::find(&self.root, key, &self.cmp).map(|node| &node.ids)
    }

    /// Look up the identifier set for `key`.
    ///
    /// # Errors
    ///
    /// * [`IndexError::NullKey`] - `key` is `None`.
    /// * [`IndexError::KeyNotFound`] - no node holds `key`.
    pub fn get(&self, key: Option<&K>) -> Result<&IdSet, IndexError> {
        let key = key.ok_or(IndexError::NullKey)?;
        Self::find(&self.root, key, &self.cmp)
            .map(|node| &node.ids)
            .ok_or(IndexError::KeyNotFound)
    }

    /// Check whether `key` is present.
    ///
    /// # Errors
    ///
    /// [`IndexError::NullKey`] - `key` is `None`.
    pub fn contains_key(&self, key: Option<&K>) -> Result<bool, IndexError> {
        let key = key.ok_or(IndexError::NullKey)?;
        Ok(Self::find(&self.root, key, &self.cmp).is_some())
    }

    /// Iterative descent to the node holding `key`, if any.
    fn find<'a>(root: &'a Link<K>, key: &K, cmp: &C) -> Option<&'a Node<K>> {
        let mut link = root;
        while let Some(node) = link.as_deref() {
            link = match cmp.compare(key, &node.key) {
                Ordering::Less => &node.left,
                Ordering::Greater => &node.right,
                Ordering::Equal => return Some(node),
            };
        }
        None
    }

    /// Mutable descent to the node holding `key`, if any.
    fn find_mut<'a>(link: &'a mut Link<K>, key: &K, cmp: &C) -> Option<&'a mut Node<K>> {
        let node = link.as_deref_mut()?;
        match cmp.compare(key, &node.key) {
            Ordering::Less => Self::find_mut(&mut node.left, key, cmp),
            Ordering::Greater => Self::find_mut(&mut node.right, key, cmp),
            Ordering::Equal => Some(node),
        }
    }

    // ========================================================================
    //  Removal
    // ========================================================================

    /// Remove `key` and every identifier filed under it.
    ///
    /// Returns whether a node was found and removed.
    ///
    /// # Errors
    ///
    /// [`IndexError::NullKey`] - `key` is `None`.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip_all))]
    pub fn remove(&mut self, key: Option<&K>) -> Result<bool, IndexError> {
        let key = key.ok_or(IndexError::NullKey)?;

        let Some(removed) = Self::remove_link(&mut self.root, key, &self.cmp) else {
            return Ok(false);
        };

        self.key_count -= 1;
        self.value_count -= removed.len();
        trace_log!(
            removed = removed.len(),
            key_count = self.key_count,
            value_count = self.value_count,
            "remove"
        );
        Ok(true)
    }

    /// Remove a batch of keys, ignoring individual not-found results.
    ///
    /// # Errors
    ///
    /// [`IndexError::NullKey`] - a key in the batch is `None`; keys before
    /// it have already been removed.
    pub fn remove_range<'k, I>(&mut self, keys: I) -> Result<(), IndexError>
    where
        K: 'k,
        I: IntoIterator<Item = Option<&'k K>>,
    {
        for key in keys {
            let _found: bool = self.remove(key)?;
        }
        Ok(())
    }

    /// Remove a single identifier from `key`'s set.
    ///
    /// When the last identifier goes, the key itself is removed by
    /// delegating to [`OrderedIndex::remove`]. Returns `false` if the key
    /// is absent or the identifier is not in its set.
    ///
    /// # Errors
    ///
    /// [`IndexError::NullKey`] - `key` is `None`.
    pub fn try_remove_value(&mut self, key: Option<&K>, id: u64) -> Result<bool, IndexError> {
        let key = key.ok_or(IndexError::NullKey)?;

        let Some(node) = Self::find_mut(&mut self.root, key, &self.cmp) else {
            return Ok(false);
        };
        if !node.ids.remove(&id) {
            return Ok(false);
        }
        self.value_count -= 1;

        if node.ids.is_empty() {
            // Last identifier gone: the empty node leaves the tree. The
            // removed set is empty by now, so only key_count moves here.
            let removed: bool = self.remove(Some(key))?;
            debug_assert!(removed, "emptied node must still be linked");
        }
        Ok(true)
    }

    /// Recursive binary-search-tree deletion. Returns the identifier set
    /// that logically left the tree, or `None` if the key was absent.
    fn remove_link(link: &mut Link<K>, key: &K, cmp: &C) -> Option<IdSet> {
        let node = link.as_deref_mut()?;
        match cmp.compare(key, &node.key) {
            Ordering::Less => Self::remove_link(&mut node.left, key, cmp),
            Ordering::Greater => Self::remove_link(&mut node.right, key, cmp),
            Ordering::Equal if node.left.is_some() && node.right.is_some() => {
                // Two children: the in-order successor (minimum of the
                // right subtree) takes over this node's slot, and the
                // successor's old node is spliced out of the right
                // subtree. The set displaced here is the one that leaves
                // the tree.
                let (succ_key, succ_ids) = Self::take_min(&mut node.right)?;
                node.key = succ_key;
                Some(mem::replace(&mut node.ids, succ_ids))
            }
            Ordering::Equal => {
                // Zero or one child: promote the child (or empty) into
                // this node's slot.
                let child: Link<K> = node.left.take().or_else(|| node.right.take());
                mem::replace(link, child).map(|removed| removed.ids)
            }
        }
    }

    /// Detach the minimum-key node of the subtree at `link`, promoting its
    /// right child. Returns its key and identifier set.
    ///
    /// `None` only for an empty subtree; callers pass a non-empty one.
    fn take_min(link: &mut Link<K>) -> Option<(K, IdSet)> {
        let node = link.as_deref_mut()?;
        if node.left.is_some() {
            Self::take_min(&mut node.left)
        } else {
            let right: Link<K> = node.right.take();
            mem::replace(link, right).map(|min| (min.key, min.ids))
        }
    }

    // ========================================================================
    //  Traversal
    // ========================================================================

    /// Iterate keys in ascending comparator order.
    ///
    /// In-order traversal (left subtree, node, right subtree); yields
    /// exactly [`OrderedIndex::key_count`] keys. The iterator borrows the
    /// tree and cannot be resumed across mutations, but a fresh traversal
    /// can always be started.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K> {
        Keys::new(&self.root, self.key_count)
    }

    /// Iterate `(key, identifier set)` pairs in ascending key order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(&self.root, self.key_count)
    }

    // ========================================================================
    //  Maintenance
    // ========================================================================

    /// Drop the entire tree and reset both counters to zero.
    ///
    /// Every node is released; prior key lookups report not-found
    /// afterwards.
    pub fn clear(&mut self) {
        self.root = None;
        self.key_count = 0;
        self.value_count = 0;
        debug_log!("index cleared");
    }

    /// Reserved for a future rebalancing pass.
    ///
    /// Callable at any time; currently has no observable effect.
    pub fn optimize(&mut self) {}
}

impl<'a, K, C> IntoIterator for &'a OrderedIndex<K, C>
where
    C: KeyComparator<K>,
{
    type Item = (&'a K, &'a IdSet);
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
//  Tests
// ============================================================================
