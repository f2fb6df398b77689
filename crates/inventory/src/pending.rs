//! Locally accumulated quantity change for a found record.

use serde::{Deserialize, Serialize};

use scanstock_core::{DomainError, DomainResult, RecordId};

use crate::record::Quantity;

/// Uncommitted quantity change for the record under edit.
///
/// `base_quantity` is the last value known to be committed in the store;
/// `delta_applied` is the running sum of accepted taps since then. The projected
/// quantity (`base_quantity + delta_applied`) is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEdit {
    record_id: RecordId,
    base_quantity: Quantity,
    delta_applied: i64,
}

impl PendingEdit {
    pub fn new(record_id: RecordId, base_quantity: Quantity) -> Self {
        Self {
            record_id,
            base_quantity,
            delta_applied: 0,
        }
    }

    pub fn record_id(&self) -> RecordId {
        self.record_id
    }

    pub fn base_quantity(&self) -> Quantity {
        self.base_quantity
    }

    pub fn delta_applied(&self) -> i64 {
        self.delta_applied
    }

    /// Quantity the store will hold once the pending delta is committed.
    pub fn projected(&self) -> Quantity {
        // Invariant upheld by `stage`: base + delta is within Quantity's range.
        (i64::from(self.base_quantity) + self.delta_applied) as Quantity
    }

    pub fn is_dirty(&self) -> bool {
        self.delta_applied != 0
    }

    /// Quantity that would result from applying `delta` on top of the pending one.
    ///
    /// Does not mutate; fails if the result would be negative or overflow.
    pub fn preview(&self, delta: i64) -> DomainResult<Quantity> {
        let current = self.projected();
        let out_of_range = || DomainError::QuantityOutOfRange { current, delta };
        let target = i64::from(current).checked_add(delta).ok_or_else(out_of_range)?;
        Quantity::try_from(target).map_err(|_| out_of_range())
    }

    /// Accept `delta` locally. Leaves the edit unchanged on rejection.
    pub fn stage(&mut self, delta: i64) -> DomainResult<Quantity> {
        let target = self.preview(delta)?;
        self.delta_applied += delta;
        Ok(target)
    }

    /// Record that `quantity` is now the committed store value.
    pub fn commit(&mut self, quantity: Quantity) {
        self.base_quantity = quantity;
        self.delta_applied = 0;
    }
}
