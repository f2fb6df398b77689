//! Reconciliation session: the decision state machine for one station.
//!
//! A session drives one scan/edit flow at a time. Every operation takes
//! `&mut self`, so a write that is in flight always completes (and its result is
//! applied or discarded as a whole) before the next scan can be handled. Use
//! [`crate::SessionHandle`] when several tasks need to share one session.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use scanstock_core::{Barcode, RecordId};
use scanstock_infra::{InventoryStore, ScanEvent, StationConfig, WriteMode};
use scanstock_inventory::{InventoryDraft, InventoryRecord, InventoryTable, PendingEdit, Quantity};

use crate::decision::ReconciliationDecision;
use crate::engine::ReconciliationEngine;
use crate::error::{ReconcileError, ReconcileResult};
use crate::form::{DraftForm, FormSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Ready for the next scan.
    Idle,
    /// Scan source running, waiting for a barcode.
    Scanning,
    /// A record was found; waiting for "use existing" or "add new".
    Resolved,
    /// Adjusting the quantity of the found record.
    EditingExisting,
    /// Filling in a draft for a new record.
    CreatingNew,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Scanning => "scanning",
            SessionState::Resolved => "resolved",
            SessionState::EditingExisting => "editing_existing",
            SessionState::CreatingNew => "creating_new",
        }
    }
}

impl core::fmt::Display for SessionState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a successful `save`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(InventoryRecord),
    Updated(InventoryRecord),
}

impl SaveOutcome {
    pub fn record(&self) -> &InventoryRecord {
        match self {
            SaveOutcome::Created(record) | SaveOutcome::Updated(record) => record,
        }
    }
}

/// Most barcodes a session keeps blocked after failed lookups.
///
/// Past this many, the oldest block is dropped. A dropped barcode still cannot be
/// created during an outage: `create_record` looks the barcode up again before
/// inserting, and that lookup fails the same way.
pub const MAX_BLOCKED: usize = 256;

/// Barcodes whose last lookup failed, per table, oldest first.
#[derive(Debug, Default)]
struct BlockList {
    order: VecDeque<(InventoryTable, Barcode)>,
    members: HashSet<(InventoryTable, Barcode)>,
}

impl BlockList {
    fn insert(&mut self, key: (InventoryTable, Barcode)) {
        if !self.members.insert(key.clone()) {
            return;
        }
        self.order.push_back(key);
        while self.order.len() > MAX_BLOCKED {
            if let Some(oldest) = self.order.pop_front() {
                self.members.remove(&oldest);
            }
        }
    }

    fn remove(&mut self, key: &(InventoryTable, Barcode)) {
        if self.members.remove(key) {
            self.order.retain(|k| k != key);
        }
    }

    fn contains(&self, key: &(InventoryTable, Barcode)) -> bool {
        self.members.contains(key)
    }

    fn len(&self) -> usize {
        self.members.len()
    }
}

pub struct ReconcileSession<S, F = DraftForm> {
    engine: ReconciliationEngine<S>,
    form: F,
    table: InventoryTable,
    write_mode: WriteMode,
    state: SessionState,
    decision: Option<ReconciliationDecision>,
    current_record: Option<InventoryRecord>,
    pending: Option<PendingEdit>,
    blocked: BlockList,
    last_error: Option<ReconcileError>,
}

impl<S> ReconcileSession<S, DraftForm> {
    pub fn new(engine: ReconciliationEngine<S>, table: InventoryTable, write_mode: WriteMode) -> Self {
        Self::with_form(engine, table, write_mode, DraftForm::new())
    }

    /// Session for the vendor, table and write mode in `config`.
    pub fn from_config(store: S, config: &StationConfig) -> Self {
        Self::new(
            ReconciliationEngine::new(store, config.vendor_id),
            config.table,
            config.write_mode,
        )
    }
}

impl<S, F> ReconcileSession<S, F> {
    pub fn with_form(
        engine: ReconciliationEngine<S>,
        table: InventoryTable,
        write_mode: WriteMode,
        form: F,
    ) -> Self {
        Self {
            engine,
            form,
            table,
            write_mode,
            state: SessionState::Idle,
            decision: None,
            current_record: None,
            pending: None,
            blocked: BlockList::default(),
            last_error: None,
        }
    }

    pub fn engine(&self) -> &ReconciliationEngine<S> {
        &self.engine
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn table(&self) -> InventoryTable {
        self.table
    }

    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    pub fn decision(&self) -> Option<&ReconciliationDecision> {
        self.decision.as_ref()
    }

    /// The found record, with its quantity as last committed by this session.
    pub fn current_record(&self) -> Option<&InventoryRecord> {
        self.current_record.as_ref()
    }

    pub fn pending_edit(&self) -> Option<&PendingEdit> {
        self.pending.as_ref()
    }

    pub fn last_error(&self) -> Option<&ReconcileError> {
        self.last_error.as_ref()
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    /// Whether `barcode` is blocked by a failed lookup in the active table.
    pub fn is_blocked(&self, barcode: &Barcode) -> bool {
        self.blocked.contains(&(self.table, barcode.clone()))
    }

    /// Number of blocked barcodes across all tables, at most [`MAX_BLOCKED`].
    pub fn blocked_count(&self) -> usize {
        self.blocked.len()
    }

    fn invalid(&self, action: &'static str) -> ReconcileError {
        ReconcileError::InvalidTransition {
            state: self.state.as_str(),
            action,
        }
    }

    fn fail(&mut self, err: ReconcileError) -> ReconcileError {
        self.last_error = Some(err.clone());
        err
    }
}

impl<S, F> ReconcileSession<S, F>
where
    S: InventoryStore,
    F: FormSession,
{
    pub fn start_scanning(&mut self) {
        if self.state == SessionState::Idle {
            self.state = SessionState::Scanning;
        }
    }

    /// Stopping the scanner never touches an edit in progress.
    pub fn stop_scanning(&mut self) {
        if self.state == SessionState::Scanning {
            self.state = SessionState::Idle;
        }
    }

    /// Switch the active table. Discards any unsaved work.
    pub fn set_table(&mut self, table: InventoryTable) {
        self.discard_work();
        self.last_error = None;
        self.state = SessionState::Idle;
        self.table = table;
    }

    /// Reconcile one scanned barcode.
    ///
    /// Legal in every state: a scan while resolving or editing forcibly restarts
    /// the flow and discards the unsaved pending edit or draft.
    pub async fn handle_scan(&mut self, event: ScanEvent) -> ReconcileResult<ReconciliationDecision> {
        let barcode = Barcode::parse(&event.raw_text)?;

        self.discard_work();
        self.last_error = None;
        self.state = SessionState::Scanning;

        let decision = self.engine.lookup_by_barcode(self.table, &barcode).await;
        let key = (self.table, barcode.clone());

        match &decision {
            ReconciliationDecision::Found(record) => {
                self.blocked.remove(&key);
                self.form.replace(InventoryDraft::from_record(record));
                self.current_record = Some(record.clone());
                self.state = SessionState::Resolved;
            }
            ReconciliationDecision::NotFound => {
                self.blocked.remove(&key);
                self.form.replace(InventoryDraft::for_barcode(&barcode));
                self.state = SessionState::CreatingNew;
            }
            ReconciliationDecision::LookupError(reason) => {
                self.blocked.insert(key);
                self.last_error = Some(ReconcileError::Lookup(reason.clone()));
                self.state = SessionState::Idle;
            }
        }

        debug!(%barcode, decision = decision.label(), state = %self.state, "scan reconciled");
        self.decision = Some(decision.clone());
        Ok(decision)
    }

    /// "Use existing": start a pending edit on the found record.
    pub fn choose_existing(&mut self) -> ReconcileResult<PendingEdit> {
        match (self.state, &self.current_record) {
            (SessionState::Resolved, Some(record)) => {
                let edit = PendingEdit::new(record.id_typed(), record.quantity());
                self.pending = Some(edit);
                self.state = SessionState::EditingExisting;
                Ok(edit)
            }
            _ => Err(self.invalid("use existing record")),
        }
    }

    /// "Add new" despite a match: keep the pre-filled draft for editing.
    pub fn choose_new(&mut self) -> ReconcileResult<()> {
        if self.state != SessionState::Resolved {
            return Err(self.invalid("add new record"));
        }
        self.current_record = None;
        self.state = SessionState::CreatingNew;
        Ok(())
    }

    /// Apply a signed quantity change to the record under edit.
    ///
    /// Returns the quantity the record will hold (deferred mode) or now holds
    /// (immediate mode). A rejected change leaves the pending edit untouched.
    pub async fn adjust_quantity(&mut self, record_id: RecordId, delta: i64) -> ReconcileResult<Quantity> {
        if self.state != SessionState::EditingExisting {
            return Err(self.invalid("adjust quantity"));
        }
        let Some(mut edit) = self.pending else {
            return Err(self.invalid("adjust quantity"));
        };
        if edit.record_id() != record_id {
            return Err(ReconcileError::RecordMismatch { requested: record_id });
        }

        let current = edit.projected();
        let rejected = || ReconcileError::InvalidQuantity { current, delta };

        match self.write_mode {
            WriteMode::Deferred => {
                let target = match edit.stage(delta) {
                    Ok(target) => target,
                    Err(_) => return Err(self.fail(rejected())),
                };
                self.pending = Some(edit);
                self.last_error = None;
                debug!(%record_id, delta, projected = target, "quantity change staged");
                Ok(target)
            }
            WriteMode::Immediate => {
                let target = match edit.preview(delta) {
                    Ok(target) => target,
                    Err(_) => return Err(self.fail(rejected())),
                };
                let committed = self.engine.commit_quantity(self.table, record_id, target).await;
                if let Err(e) = committed {
                    return Err(self.fail(e));
                }
                edit.commit(target);
                self.pending = Some(edit);
                self.current_record = self.current_record.take().map(|r| r.with_quantity(target));
                self.last_error = None;
                Ok(target)
            }
        }
    }

    /// Persist the current branch: commit the pending quantity or create the draft.
    ///
    /// On success the session returns to `Idle`. On failure it stays where it is
    /// with the pending edit or draft unchanged, ready for a retry.
    pub async fn save(&mut self) -> ReconcileResult<SaveOutcome> {
        match self.state {
            SessionState::EditingExisting => self.save_existing().await,
            SessionState::CreatingNew => self.create_from_form().await.map(SaveOutcome::Created),
            _ => Err(self.invalid("save")),
        }
    }

    /// Create a record from `draft` directly (manual entry, no scan).
    ///
    /// Rejected while a found record awaits a choice or is being edited, and for
    /// any barcode whose last lookup failed.
    pub async fn create_record(&mut self, draft: InventoryDraft) -> ReconcileResult<InventoryRecord> {
        match self.state {
            SessionState::Idle | SessionState::Scanning | SessionState::CreatingNew => {}
            _ => return Err(self.invalid("create record")),
        }
        if let Some(barcode) = self.blocked_barcode(&draft) {
            return Err(self.fail(ReconcileError::LookupBlocked { barcode }));
        }

        self.form.replace(draft);
        self.state = SessionState::CreatingNew;
        self.create_from_form().await
    }

    /// Abandon the current branch and return to `Idle`.
    pub fn cancel(&mut self) {
        if self.state == SessionState::Idle {
            return;
        }
        self.discard_work();
        self.last_error = None;
        self.state = SessionState::Idle;
    }

    async fn save_existing(&mut self) -> ReconcileResult<SaveOutcome> {
        let (Some(mut edit), Some(record)) = (self.pending, self.current_record.clone()) else {
            return Err(self.invalid("save"));
        };

        let quantity = edit.projected();
        if edit.is_dirty() {
            let committed = self
                .engine
                .commit_quantity(self.table, edit.record_id(), quantity)
                .await;
            if let Err(e) = committed {
                return Err(self.fail(e));
            }
            edit.commit(quantity);
        }

        let record = record.with_quantity(quantity);
        info!(record_id = %record.id_typed(), quantity, "existing record saved");
        self.finish();
        Ok(SaveOutcome::Updated(record))
    }

    async fn create_from_form(&mut self) -> ReconcileResult<InventoryRecord> {
        if let Some(barcode) = self.blocked_barcode(self.form.draft()) {
            return Err(self.fail(ReconcileError::LookupBlocked { barcode }));
        }

        let table = self.table;
        let created = self.engine.create_record(table, self.form.draft()).await;
        match created {
            Ok(record) => {
                self.finish();
                Ok(record)
            }
            Err(err) => {
                if matches!(err, ReconcileError::Lookup(_)) {
                    if let Ok(barcode) = Barcode::parse(&self.form.draft().barcode) {
                        self.blocked.insert((table, barcode));
                    }
                }
                Err(self.fail(err))
            }
        }
    }

    fn blocked_barcode(&self, draft: &InventoryDraft) -> Option<Barcode> {
        Barcode::parse(&draft.barcode)
            .ok()
            .filter(|barcode| self.is_blocked(barcode))
    }

    fn discard_work(&mut self) {
        if let Some(edit) = &self.pending {
            if edit.is_dirty() {
                warn!(
                    record_id = %edit.record_id(),
                    delta = edit.delta_applied(),
                    "discarding unsaved quantity change"
                );
            }
        }
        if self.state == SessionState::CreatingNew {
            debug!("discarding draft");
        }
        self.pending = None;
        self.current_record = None;
        self.decision = None;
        self.form.reset();
    }

    fn finish(&mut self) {
        self.pending = None;
        self.current_record = None;
        self.decision = None;
        self.last_error = None;
        self.form.reset();
        self.state = SessionState::Idle;
    }
}
