use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use scanstock_core::RecordId;
use scanstock_infra::{InventoryStore, ScanEvent};
use scanstock_inventory::{InventoryDraft, InventoryRecord, PendingEdit, Quantity};

use crate::decision::ReconciliationDecision;
use crate::error::ReconcileResult;
use crate::form::{DraftForm, FormSession};
use crate::session::{ReconcileSession, SaveOutcome, SessionState};

/// Cloneable handle that serializes every call on one session.
///
/// Calls queue on a fair (FIFO) async mutex, so a write that is in flight
/// finishes before a later scan's lookup begins, whichever task issued them.
pub struct SessionHandle<S, F = DraftForm> {
    inner: Arc<Mutex<ReconcileSession<S, F>>>,
}

impl<S, F> Clone for SessionHandle<S, F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, F> SessionHandle<S, F> {
    pub fn new(session: ReconcileSession<S, F>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Exclusive access for multi-step interactions (e.g. editing draft fields).
    pub async fn lock(&self) -> MutexGuard<'_, ReconcileSession<S, F>> {
        self.inner.lock().await
    }

    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state()
    }
}

impl<S, F> SessionHandle<S, F>
where
    S: InventoryStore,
    F: FormSession,
{
    pub async fn handle_scan(&self, event: ScanEvent) -> ReconcileResult<ReconciliationDecision> {
        self.inner.lock().await.handle_scan(event).await
    }

    pub async fn choose_existing(&self) -> ReconcileResult<PendingEdit> {
        self.inner.lock().await.choose_existing()
    }

    pub async fn choose_new(&self) -> ReconcileResult<()> {
        self.inner.lock().await.choose_new()
    }

    pub async fn adjust_quantity(&self, record_id: RecordId, delta: i64) -> ReconcileResult<Quantity> {
        self.inner.lock().await.adjust_quantity(record_id, delta).await
    }

    pub async fn save(&self) -> ReconcileResult<SaveOutcome> {
        self.inner.lock().await.save().await
    }

    pub async fn create_record(&self, draft: InventoryDraft) -> ReconcileResult<InventoryRecord> {
        self.inner.lock().await.create_record(draft).await
    }

    pub async fn cancel(&self) {
        self.inner.lock().await.cancel()
    }
}
