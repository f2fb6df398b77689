//! Store-facing reconciliation operations.
//!
//! The engine owns a long-lived store handle (injected, never constructed per
//! call) and the vendor scope. It holds no session state; every method is a
//! single read or a guarded write against the store.

use tracing::{debug, info, warn};

use scanstock_core::{Barcode, RecordId, VendorId};
use scanstock_infra::InventoryStore;
use scanstock_inventory::{InventoryDraft, InventoryRecord, InventoryTable, Quantity};

use crate::decision::ReconciliationDecision;
use crate::error::{ReconcileError, ReconcileResult};

#[derive(Debug)]
pub struct ReconciliationEngine<S> {
    store: S,
    vendor_id: VendorId,
}

impl<S> ReconciliationEngine<S> {
    pub fn new(store: S, vendor_id: VendorId) -> Self {
        Self { store, vendor_id }
    }

    pub fn vendor_id(&self) -> VendorId {
        self.vendor_id
    }
}

impl<S> ReconciliationEngine<S>
where
    S: InventoryStore,
{
    /// Decide whether `barcode` exists in `table` for this vendor. Read-only.
    ///
    /// A store failure is reported as `LookupError`, never as `NotFound`. More
    /// than one match means the table already violates barcode uniqueness; that
    /// is also a `LookupError` so nothing gets created on top of it.
    pub async fn lookup_by_barcode(
        &self,
        table: InventoryTable,
        barcode: &Barcode,
    ) -> ReconciliationDecision {
        match self
            .store
            .find_by_barcode(table, self.vendor_id, barcode)
            .await
        {
            Ok(mut matches) => match matches.len() {
                0 => {
                    debug!(%barcode, %table, "barcode not found");
                    ReconciliationDecision::NotFound
                }
                1 => {
                    let record = matches.remove(0);
                    debug!(%barcode, %table, record_id = %record.id_typed(), "barcode found");
                    ReconciliationDecision::Found(record)
                }
                n => {
                    warn!(%barcode, %table, matches = n, "barcode is ambiguous");
                    ReconciliationDecision::LookupError(format!(
                        "ambiguous: {n} records share barcode '{barcode}'"
                    ))
                }
            },
            Err(e) => {
                warn!(%barcode, %table, error = %e, "barcode lookup failed");
                ReconciliationDecision::LookupError(e.to_string())
            }
        }
    }

    /// Point lookup by record id.
    pub async fn get_record(
        &self,
        table: InventoryTable,
        id: RecordId,
    ) -> ReconcileResult<Option<InventoryRecord>> {
        self.store
            .get(table, id)
            .await
            .map_err(|e| ReconcileError::Lookup(e.to_string()))
    }

    /// Validate `draft`, check the barcode is unused, then insert.
    ///
    /// The uniqueness check and the insert are two separate store calls: two
    /// stations creating the same barcode at the same moment can both pass the
    /// check. Within one session, calls are serialized and the guard holds.
    pub async fn create_record(
        &self,
        table: InventoryTable,
        draft: &InventoryDraft,
    ) -> ReconcileResult<InventoryRecord> {
        let new_record = draft.validate(self.vendor_id, table)?;
        let barcode = new_record.barcode.clone();

        match self.lookup_by_barcode(table, &barcode).await {
            ReconciliationDecision::NotFound => {}
            ReconciliationDecision::Found(_) => {
                return Err(ReconcileError::DuplicateBarcode { barcode });
            }
            ReconciliationDecision::LookupError(reason) => {
                return Err(ReconcileError::Lookup(reason));
            }
        }

        let record = self
            .store
            .insert(table, new_record)
            .await
            .map_err(|e| {
                warn!(%barcode, %table, error = %e, "insert failed");
                ReconcileError::from(e)
            })?;

        info!(
            %barcode,
            %table,
            record_id = %record.id_typed(),
            quantity = record.quantity(),
            "inventory record created"
        );
        Ok(record)
    }

    /// Write `quantity` as the record's committed quantity.
    pub async fn commit_quantity(
        &self,
        table: InventoryTable,
        id: RecordId,
        quantity: Quantity,
    ) -> ReconcileResult<()> {
        self.store
            .update_quantity(table, id, quantity)
            .await
            .map_err(|e| {
                warn!(record_id = %id, %table, error = %e, "quantity update failed");
                ReconcileError::from(e)
            })?;

        info!(record_id = %id, %table, quantity, "quantity committed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use scanstock_infra::InMemoryInventoryStore;

    fn engine() -> (ReconciliationEngine<Arc<InMemoryInventoryStore>>, Arc<InMemoryInventoryStore>) {
        let store = Arc::new(InMemoryInventoryStore::new());
        (ReconciliationEngine::new(store.clone(), VendorId::new()), store)
    }

    fn draft(barcode: &str) -> InventoryDraft {
        InventoryDraft {
            barcode: barcode.to_string(),
            product_name: "Air X".to_string(),
            price: "120".to_string(),
            quantity: "2".to_string(),
            size: "9M/10.5W".to_string(),
            ..InventoryDraft::default()
        }
    }

    fn barcode(raw: &str) -> Barcode {
        Barcode::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn lookup_of_unknown_barcode_is_not_found() {
        let (engine, _) = engine();
        let decision = engine
            .lookup_by_barcode(InventoryTable::Generic, &barcode("SKU-001"))
            .await;
        assert_eq!(decision, ReconciliationDecision::NotFound);
    }

    #[tokio::test]
    async fn lookup_failure_is_not_not_found() {
        let (engine, store) = engine();
        store.set_fail_reads(true);

        let decision = engine
            .lookup_by_barcode(InventoryTable::Generic, &barcode("SKU-001"))
            .await;
        assert!(decision.is_lookup_error());
    }

    #[tokio::test]
    async fn ambiguous_barcode_is_a_lookup_error() {
        let (engine, store) = engine();
        let table = InventoryTable::Generic;
        for _ in 0..2 {
            store
                .seed(table, draft("DUP").validate(engine.vendor_id(), table).unwrap())
                .unwrap();
        }

        match engine.lookup_by_barcode(table, &barcode("DUP")).await {
            ReconciliationDecision::LookupError(reason) => assert!(reason.contains("ambiguous")),
            other => panic!("Expected LookupError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_then_duplicate_is_rejected() {
        let (engine, store) = engine();
        let table = InventoryTable::New;

        let created = engine.create_record(table, &draft("SKU-001")).await.unwrap();
        assert_eq!(created.quantity(), 2);

        let err = engine.create_record(table, &draft("SKU-001")).await.unwrap_err();
        assert_eq!(
            err,
            ReconcileError::DuplicateBarcode {
                barcode: barcode("SKU-001")
            }
        );
        assert_eq!(store.records(table).len(), 1);
    }

    #[tokio::test]
    async fn same_barcode_may_exist_in_another_table() {
        let (engine, _) = engine();
        engine.create_record(InventoryTable::New, &draft("SKU-001")).await.unwrap();

        let mut used = draft("SKU-001");
        used.condition_grade = "B".to_string();
        assert!(engine.create_record(InventoryTable::Used, &used).await.is_ok());
    }

    #[tokio::test]
    async fn create_with_unreadable_store_inserts_nothing() {
        let (engine, store) = engine();
        store.set_fail_reads(true);

        let err = engine
            .create_record(InventoryTable::Generic, &draft("SKU-001"))
            .await
            .unwrap_err();
        assert!(matches!(err, ReconcileError::Lookup(_)));

        store.set_fail_reads(false);
        assert!(store.records(InventoryTable::Generic).is_empty());
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn create_with_failing_writes_reports_store_error() {
        let (engine, store) = engine();
        store.set_fail_writes(true);

        let err = engine
            .create_record(InventoryTable::Generic, &draft("SKU-001"))
            .await
            .unwrap_err();
        assert!(matches!(err, ReconcileError::Store(_)));
        assert!(err.is_transient());
        assert!(store.records(InventoryTable::Generic).is_empty());
    }

    #[tokio::test]
    async fn create_validates_before_touching_the_store() {
        let (engine, store) = engine();
        store.set_fail_reads(true);

        let mut incomplete = draft("SKU-001");
        incomplete.product_name.clear();
        let err = engine
            .create_record(InventoryTable::Generic, &incomplete)
            .await
            .unwrap_err();
        assert!(matches!(err, ReconcileError::Validation(_)));
    }

    #[tokio::test]
    async fn created_record_is_found_with_identical_fields() {
        let (engine, _) = engine();
        let table = InventoryTable::New;
        let created = engine.create_record(table, &draft("SKU-001")).await.unwrap();

        let decision = engine.lookup_by_barcode(table, &barcode("SKU-001")).await;
        assert_eq!(decision, ReconciliationDecision::Found(created.clone()));

        let by_id = engine.get_record(table, created.id_typed()).await.unwrap();
        assert_eq!(by_id, Some(created));
    }

    #[tokio::test]
    async fn commit_quantity_overwrites_stored_value() {
        let (engine, _) = engine();
        let table = InventoryTable::Generic;
        let created = engine.create_record(table, &draft("SKU-001")).await.unwrap();

        engine.commit_quantity(table, created.id_typed(), 11).await.unwrap();
        let stored = engine.get_record(table, created.id_typed()).await.unwrap().unwrap();
        assert_eq!(stored.quantity(), 11);
    }
}
