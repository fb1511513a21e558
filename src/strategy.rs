//! Conflict-resolution strategies for inserts.

/// How `add` resolves a collision on an already-present key.
///
/// The strategy is chosen per call; [`InsertStrategy::Merge`] is the
/// default.
///
/// | Strategy  | Key absent                 | Key present                          |
/// |-----------|----------------------------|--------------------------------------|
/// | `Merge`   | new node, singleton set    | add identifier to the existing set   |
/// | `Replace` | new node, singleton set    | discard set, keep only the new id    |
/// | `Unique`  | new node, singleton set    | fail with `KeyExists`, no mutation   |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum InsertStrategy {
    /// Union the new identifier into the key's existing set.
    ///
    /// Re-adding an identifier that is already present is a no-op and does
    /// not change the value count.
    #[default]
    Merge,

    /// Discard the key's existing identifiers and keep only the new one.
    Replace,

    /// Reject the insert with [`crate::IndexError::KeyExists`] if the key
    /// is already present.
    Unique,
}
