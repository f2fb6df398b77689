//! Entity trait: a persisted object with a store-assigned identity.

/// Two entities with the same id are the same record, even when their fields
/// (a quantity, say) differ between snapshots.
pub trait Entity {
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    fn id(&self) -> &Self::Id;

    /// Whether `other` is a snapshot of the same record.
    fn is_same_entity(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
