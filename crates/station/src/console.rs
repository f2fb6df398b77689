//! Executes console commands against one reconciliation session.

use serde::Serialize;
use tracing::debug;

use scanstock_infra::{InventoryStore, ScanEvent, WriteMode};
use scanstock_inventory::{InventoryDraft, InventoryRecord, InventoryTable, PendingEdit};
use scanstock_reconcile::{
    FormSession, ReconcileError, ReconcileSession, ReconciliationDecision, SaveOutcome, SessionState,
};

use crate::commands::{Command, HELP};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

#[derive(Serialize)]
struct SessionView<'a> {
    state: SessionState,
    table: InventoryTable,
    write_mode: WriteMode,
    decision: Option<&'static str>,
    record: Option<&'a InventoryRecord>,
    pending: Option<&'a PendingEdit>,
    draft: &'a InventoryDraft,
    missing: Vec<&'static str>,
    last_error: Option<String>,
}

pub struct Console<S> {
    session: ReconcileSession<S>,
}

impl<S> Console<S>
where
    S: InventoryStore,
{
    pub fn new(session: ReconcileSession<S>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &ReconcileSession<S> {
        &self.session
    }

    pub async fn execute(&mut self, command: Command) -> Reply {
        debug!(?command, state = %self.session.state(), "console command");
        let text = match command {
            Command::Quit => return Reply::Quit,
            Command::Help => HELP.to_string(),
            Command::Show => self.show(),
            Command::Scan(text) => match self.session.handle_scan(ScanEvent::now(text)).await {
                Ok(decision) => describe(&decision),
                Err(e) => error(&e),
            },
            Command::UseExisting => match self.session.choose_existing() {
                Ok(edit) => format!("editing quantity {}", edit.projected()),
                Err(e) => error(&e),
            },
            Command::AddNew => match self.session.choose_new() {
                Ok(()) => "adding a new record; fill in the draft and save".to_string(),
                Err(e) => error(&e),
            },
            Command::Set(field, value) => {
                self.session.form_mut().set(field, value);
                let missing = self.missing();
                if missing.is_empty() {
                    "ok".to_string()
                } else {
                    format!("ok (missing: {})", missing.join(", "))
                }
            }
            Command::Adjust(delta) => self.adjust(delta).await,
            Command::Save => match self.session.save().await {
                Ok(SaveOutcome::Created(record)) => {
                    format!("created {} with quantity {}", record.barcode(), record.quantity())
                }
                Ok(SaveOutcome::Updated(record)) => {
                    format!("saved {} with quantity {}", record.barcode(), record.quantity())
                }
                Err(e) => error(&e),
            },
            Command::Create => {
                let draft = self.session.form().draft().clone();
                match self.session.create_record(draft).await {
                    Ok(record) => {
                        format!("created {} with quantity {}", record.barcode(), record.quantity())
                    }
                    Err(e) => error(&e),
                }
            }
            Command::Cancel => {
                self.session.cancel();
                "cancelled".to_string()
            }
            Command::Table(table) => {
                self.session.set_table(table);
                format!("table is now {table}")
            }
        };
        Reply::Text(text)
    }

    async fn adjust(&mut self, delta: i64) -> String {
        let Some(record_id) = self.session.pending_edit().map(|edit| edit.record_id()) else {
            return "error: no record is being edited (scan, then 'existing')".to_string();
        };
        match self.session.adjust_quantity(record_id, delta).await {
            Ok(quantity) => match self.session.write_mode() {
                WriteMode::Deferred => format!("quantity {quantity} (unsaved)"),
                WriteMode::Immediate => format!("quantity {quantity}"),
            },
            Err(e) => error(&e),
        }
    }

    fn missing(&self) -> Vec<&'static str> {
        self.session
            .form()
            .draft()
            .missing_fields(self.session.table())
            .into_iter()
            .map(|field| field.as_str())
            .collect()
    }

    fn show(&self) -> String {
        let view = SessionView {
            state: self.session.state(),
            table: self.session.table(),
            write_mode: self.session.write_mode(),
            decision: self.session.decision().map(ReconciliationDecision::label),
            record: self.session.current_record(),
            pending: self.session.pending_edit(),
            draft: self.session.form().draft(),
            missing: self.missing(),
            last_error: self.session.last_error().map(ToString::to_string),
        };
        serde_json::to_string_pretty(&view).unwrap_or_else(|e| format!("error: {e}"))
    }
}

fn describe(decision: &ReconciliationDecision) -> String {
    match decision {
        ReconciliationDecision::Found(record) => format!(
            "found {} '{}' quantity {} ('existing' to adjust, 'new' to add anyway)",
            record.barcode(),
            record.product_name(),
            record.quantity()
        ),
        ReconciliationDecision::NotFound => "not found; fill in the draft and save".to_string(),
        ReconciliationDecision::LookupError(reason) => {
            format!("lookup failed: {reason}; scan again to retry")
        }
    }
}

fn error(err: &ReconcileError) -> String {
    format!("error: {err}")
}
