//! Inventory domain module.
//!
//! This crate contains business rules for vendor inventory records, implemented
//! purely as deterministic domain logic (no IO, no storage, no scanning).

pub mod draft;
pub mod pending;
pub mod record;
pub mod table;

pub use draft::{DraftField, InventoryDraft};
pub use pending::PendingEdit;
pub use record::{ConditionAttributes, InventoryRecord, NewInventoryRecord, Quantity};
pub use table::{InventoryTable, RequiredField};
