use scanstock_inventory::InventoryRecord;

/// Outcome of reconciling one barcode against the store.
///
/// Not persisted; recomputed on every scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationDecision {
    /// No record carries this barcode; creating one is safe.
    NotFound,
    /// Exactly one record carries this barcode.
    Found(InventoryRecord),
    /// Existence is unknown (store unreachable, unauthorized, or ambiguous).
    LookupError(String),
}

impl ReconciliationDecision {
    pub fn record(&self) -> Option<&InventoryRecord> {
        match self {
            ReconciliationDecision::Found(record) => Some(record),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ReconciliationDecision::Found(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ReconciliationDecision::NotFound)
    }

    pub fn is_lookup_error(&self) -> bool {
        matches!(self, ReconciliationDecision::LookupError(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReconciliationDecision::NotFound => "not_found",
            ReconciliationDecision::Found(_) => "found",
            ReconciliationDecision::LookupError(_) => "lookup_error",
        }
    }
}
