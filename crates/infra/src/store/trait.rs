use std::sync::Arc;

use thiserror::Error;

use scanstock_core::{Barcode, RecordId, VendorId};
use scanstock_inventory::{InventoryRecord, InventoryTable, NewInventoryRecord, Quantity};

/// Inventory store operation error.
///
/// These are **infrastructure errors** (transport, auth, storage) as opposed to
/// domain errors. "No matching record" is never an error: `find_by_barcode`
/// returns an empty result and `get` returns `None`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The backend could not be reached (network, timeout).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The backend refused the credentials in use.
    #[error("unauthorized")]
    Unauthorized,

    /// A write targeted a record id the store does not hold.
    #[error("record not found: {0}")]
    RecordNotFound(RecordId),

    /// Any other backend failure.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Asynchronous, table-partitioned inventory record store.
///
/// All calls may suspend. Implementations must make each call atomic: a failed
/// `insert` leaves no record and a failed `update_quantity` leaves the previous
/// quantity intact.
#[async_trait::async_trait]
pub trait InventoryStore: Send + Sync {
    /// All records in `table` owned by `vendor_id` whose barcode equals `barcode`.
    ///
    /// Returns every match so callers can detect duplicates the store let through.
    async fn find_by_barcode(
        &self,
        table: InventoryTable,
        vendor_id: VendorId,
        barcode: &Barcode,
    ) -> Result<Vec<InventoryRecord>, StoreError>;

    /// Point lookup by store-assigned id.
    async fn get(
        &self,
        table: InventoryTable,
        id: RecordId,
    ) -> Result<Option<InventoryRecord>, StoreError>;

    /// Insert a record, assigning its id.
    async fn insert(
        &self,
        table: InventoryTable,
        record: NewInventoryRecord,
    ) -> Result<InventoryRecord, StoreError>;

    /// Overwrite the quantity of an existing record.
    async fn update_quantity(
        &self,
        table: InventoryTable,
        id: RecordId,
        quantity: Quantity,
    ) -> Result<(), StoreError>;
}

#[async_trait::async_trait]
impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    async fn find_by_barcode(
        &self,
        table: InventoryTable,
        vendor_id: VendorId,
        barcode: &Barcode,
    ) -> Result<Vec<InventoryRecord>, StoreError> {
        (**self).find_by_barcode(table, vendor_id, barcode).await
    }

    async fn get(
        &self,
        table: InventoryTable,
        id: RecordId,
    ) -> Result<Option<InventoryRecord>, StoreError> {
        (**self).get(table, id).await
    }

    async fn insert(
        &self,
        table: InventoryTable,
        record: NewInventoryRecord,
    ) -> Result<InventoryRecord, StoreError> {
        (**self).insert(table, record).await
    }

    async fn update_quantity(
        &self,
        table: InventoryTable,
        id: RecordId,
        quantity: Quantity,
    ) -> Result<(), StoreError> {
        (**self).update_quantity(table, id, quantity).await
    }
}
