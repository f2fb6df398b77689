//! Reconciliation error model.

use thiserror::Error;

use scanstock_core::{Barcode, DomainError, RecordId};
use scanstock_infra::StoreError;
use scanstock_inventory::Quantity;

pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Every failure the reconciliation core reports.
///
/// All variants are recoverable: the session keeps its draft or pending edit
/// so the caller can retry, and none of them leave a partial write behind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReconcileError {
    /// The store could not be read, so whether the item exists is unknown.
    #[error("lookup failed: {0}")]
    Lookup(String),

    /// A write to the store failed; the previous committed state is intact.
    #[error("store write failed: {0}")]
    Store(String),

    /// A record with this barcode already exists in the active table.
    #[error("barcode '{barcode}' already exists")]
    DuplicateBarcode { barcode: Barcode },

    /// The adjustment would take the quantity below zero (or out of range).
    #[error("quantity {current} cannot be adjusted by {delta}")]
    InvalidQuantity { current: Quantity, delta: i64 },

    /// A required field is missing or malformed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The last lookup for this barcode failed; nothing may be created or
    /// edited for it until a fresh lookup succeeds.
    #[error("barcode '{barcode}' is blocked until a lookup succeeds")]
    LookupBlocked { barcode: Barcode },

    /// The requested action is not legal in the session's current state.
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    /// The adjustment targets a record other than the one under edit.
    #[error("record {requested} is not under edit")]
    RecordMismatch { requested: RecordId },
}

impl ReconcileError {
    /// Whether retrying the same action later may succeed without user changes.
    pub fn is_transient(&self) -> bool {
        matches!(self, ReconcileError::Lookup(_) | ReconcileError::Store(_))
    }
}

impl From<DomainError> for ReconcileError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::QuantityOutOfRange { current, delta } => {
                ReconcileError::InvalidQuantity { current, delta }
            }
            other => ReconcileError::Validation(other.to_string()),
        }
    }
}

impl From<StoreError> for ReconcileError {
    fn from(value: StoreError) -> Self {
        ReconcileError::Store(value.to_string())
    }
}
