//! Error types for index construction and keyed operations.
//!
//! Errors are local and synchronous: the index performs no I/O and has no
//! transient failure modes, so nothing here is ever retried internally. The
//! host layer is responsible for translating these into its own failure
//! model.

use std::fmt as StdFmt;

// ============================================================================
//  IndexError
// ============================================================================

/// Errors raised by keyed operations on an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexError {
    /// A keyed operation was given a null (absent) key.
    ///
    /// The index advertises `supports_nullable_keys() == false`, so a null
    /// key is a hard caller contract violation, not a recoverable miss.
    NullKey,

    /// An insert under the `Unique` strategy found the key already present.
    ///
    /// Signals a caller-level conflict; the tree is left unmodified.
    KeyExists,

    /// A lookup through `get` found no node for the key.
    ///
    /// Callers that expect misses should prefer the non-erroring
    /// `try_get_values` accessor.
    KeyNotFound,
}

impl StdFmt::Display for IndexError {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        match self {
            Self::NullKey => write!(f, "null keys are not supported by this index"),

            Self::KeyExists => {
                write!(f, "key already present (unique insert strategy)")
            }

            Self::KeyNotFound => write!(f, "key not found in index"),
        }
    }
}

impl std::error::Error for IndexError {}

// ============================================================================
//  ConfigError
// ============================================================================

/// Errors raised while validating host configuration at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No key-source field was configured.
    ///
    /// The host must name the record field the index key is derived from
    /// before the index can be constructed for it.
    MissingKeyField,
}

impl StdFmt::Display for ConfigError {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        match self {
            Self::MissingKeyField => {
                write!(f, "index configuration names no key-source field")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
//  Tests
// ============================================================================
