//! Entity trait: identity that survives state changes.

/// Minimal interface for domain entities.
///
/// An entity is distinguished by its identifier, not its attributes: a
/// ledger transaction stays the same entity however it is rendered.
/// Aggregate roots add versioning on top of this.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
