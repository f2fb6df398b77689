//! Form session boundary: where the in-progress draft lives.

use scanstock_inventory::{DraftField, InventoryDraft};

/// Holder of the vendor's in-progress draft.
///
/// The session replaces the draft wholesale when a decision arrives and resets
/// it after a successful save or cancel. Anything in between (typing into
/// fields) belongs to the caller.
pub trait FormSession: Send {
    fn draft(&self) -> &InventoryDraft;

    fn draft_mut(&mut self) -> &mut InventoryDraft;

    fn replace(&mut self, draft: InventoryDraft);

    fn reset(&mut self) {
        self.replace(InventoryDraft::default());
    }
}

/// Plain in-memory form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftForm {
    draft: InventoryDraft,
}

impl DraftForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        self.draft.set(field, value);
    }
}

impl FormSession for DraftForm {
    fn draft(&self) -> &InventoryDraft {
        &self.draft
    }

    fn draft_mut(&mut self) -> &mut InventoryDraft {
        &mut self.draft
    }

    fn replace(&mut self, draft: InventoryDraft) {
        self.draft = draft;
    }
}
