//! Keyed inventory record storage.
//!
//! The store is the only shared mutable resource in the system. It is queried
//! by barcode and by record id and supports insert and quantity update. It is
//! **not** assumed to enforce barcode uniqueness; callers guard against duplicates.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryInventoryStore;
pub use r#trait::{InventoryStore, StoreError};
