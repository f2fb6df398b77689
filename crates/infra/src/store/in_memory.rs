use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use scanstock_core::{Barcode, Entity, RecordId, VendorId};
use scanstock_inventory::{InventoryRecord, InventoryTable, NewInventoryRecord, Quantity};

use super::r#trait::{InventoryStore, StoreError};

/// In-memory inventory store.
///
/// Intended for tests/dev. Like a typical hosted table it does not enforce
/// barcode uniqueness. Reads and writes can be made to fail on demand to
/// exercise transport-error paths.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    records: RwLock<HashMap<(InventoryTable, RecordId), InventoryRecord>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent read fail with a transport error (or stop doing so).
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write fail with a transport error (or stop doing so).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes (inserts and quantity updates) so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Insert directly, bypassing failure injection. Seeds fixtures in tests.
    pub fn seed(
        &self,
        table: InventoryTable,
        record: NewInventoryRecord,
    ) -> Result<InventoryRecord, StoreError> {
        let record = record.into_record(RecordId::new());
        let mut records = self.write_lock()?;
        records.insert((table, record.id_typed()), record.clone());
        Ok(record)
    }

    /// Snapshot of every record in `table`.
    pub fn records(&self, table: InventoryTable) -> Vec<InventoryRecord> {
        match self.records.read() {
            Ok(records) => records
                .iter()
                .filter(|((t, _), _)| *t == table)
                .map(|(_, r)| r.clone())
                .collect(),
            Err(_) => vec![],
        }
    }

    fn check_read(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Transport("simulated read failure".to_string()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Transport("simulated write failure".to_string()));
        }
        Ok(())
    }

    fn write_lock(
        &self,
    ) -> Result<
        std::sync::RwLockWriteGuard<'_, HashMap<(InventoryTable, RecordId), InventoryRecord>>,
        StoreError,
    > {
        self.records
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))
    }
}

#[async_trait::async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn find_by_barcode(
        &self,
        table: InventoryTable,
        vendor_id: VendorId,
        barcode: &Barcode,
    ) -> Result<Vec<InventoryRecord>, StoreError> {
        tokio::task::yield_now().await;
        self.check_read()?;

        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;

        let mut matches: Vec<InventoryRecord> = records
            .iter()
            .filter(|((t, _), r)| {
                *t == table && r.vendor_id() == vendor_id && r.barcode() == barcode
            })
            .map(|(_, r)| r.clone())
            .collect();
        // UUIDv7 ids sort by creation time.
        matches.sort_by_key(|r| *r.id().as_uuid());
        Ok(matches)
    }

    async fn get(
        &self,
        table: InventoryTable,
        id: RecordId,
    ) -> Result<Option<InventoryRecord>, StoreError> {
        tokio::task::yield_now().await;
        self.check_read()?;

        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;
        Ok(records.get(&(table, id)).cloned())
    }

    async fn insert(
        &self,
        table: InventoryTable,
        record: NewInventoryRecord,
    ) -> Result<InventoryRecord, StoreError> {
        tokio::task::yield_now().await;
        self.check_write()?;

        let record = record.into_record(RecordId::new());
        let mut records = self.write_lock()?;
        records.insert((table, record.id_typed()), record.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(record)
    }

    async fn update_quantity(
        &self,
        table: InventoryTable,
        id: RecordId,
        quantity: Quantity,
    ) -> Result<(), StoreError> {
        tokio::task::yield_now().await;
        self.check_write()?;

        let mut records = self.write_lock()?;
        let record = records
            .remove(&(table, id))
            .ok_or(StoreError::RecordNotFound(id))?;
        records.insert((table, id), record.with_quantity(quantity));
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanstock_core::Price;

    fn new_record(vendor_id: VendorId, barcode: &str) -> NewInventoryRecord {
        NewInventoryRecord {
            vendor_id,
            barcode: Barcode::parse(barcode).unwrap(),
            product_name: "Air X".to_string(),
            description: String::new(),
            price: Price::from_cents(12_000),
            quantity: 5,
            size: "9M/10.5W".to_string(),
            color: String::new(),
            condition: None,
        }
    }

    #[tokio::test]
    async fn find_is_scoped_by_table_and_vendor() {
        let store = InMemoryInventoryStore::new();
        let vendor = VendorId::new();
        let other_vendor = VendorId::new();
        let barcode = Barcode::parse("SKU-001").unwrap();

        store.seed(InventoryTable::New, new_record(vendor, "SKU-001")).unwrap();
        store.seed(InventoryTable::Used, new_record(vendor, "SKU-001")).unwrap();
        store.seed(InventoryTable::New, new_record(other_vendor, "SKU-001")).unwrap();

        let found = store
            .find_by_barcode(InventoryTable::New, vendor, &barcode)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].vendor_id(), vendor);

        let none = store
            .find_by_barcode(InventoryTable::Generic, vendor, &barcode)
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn insert_does_not_enforce_uniqueness() {
        let store = InMemoryInventoryStore::new();
        let vendor = VendorId::new();

        store.insert(InventoryTable::Generic, new_record(vendor, "DUP")).await.unwrap();
        store.insert(InventoryTable::Generic, new_record(vendor, "DUP")).await.unwrap();

        let found = store
            .find_by_barcode(InventoryTable::Generic, vendor, &Barcode::parse("DUP").unwrap())
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn failed_update_keeps_previous_quantity() {
        let store = InMemoryInventoryStore::new();
        let record = store
            .seed(InventoryTable::New, new_record(VendorId::new(), "SKU-001"))
            .unwrap();

        store.set_fail_writes(true);
        let err = store
            .update_quantity(InventoryTable::New, record.id_typed(), 9)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Transport(_)));

        let stored = store
            .get(InventoryTable::New, record.id_typed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.quantity(), 5);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn update_of_unknown_record_is_an_error() {
        let store = InMemoryInventoryStore::new();
        let id = RecordId::new();
        let err = store
            .update_quantity(InventoryTable::Generic, id, 1)
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::RecordNotFound(id));
    }

    #[tokio::test]
    async fn read_failures_are_transport_errors() {
        let store = InMemoryInventoryStore::new();
        store.set_fail_reads(true);
        let err = store
            .get(InventoryTable::Generic, RecordId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Transport(_)));

        store.set_fail_reads(false);
        assert!(store.get(InventoryTable::Generic, RecordId::new()).await.unwrap().is_none());
    }
}
