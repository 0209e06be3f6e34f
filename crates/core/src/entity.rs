//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// For principal records the identifier is the login name, which is unique
/// within the record's own namespace.
pub trait Entity {
    /// Entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
