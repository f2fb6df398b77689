//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Failures of pure domain rules. Store and transport failures live in infra.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A single field holds an unusable value (blank barcode, malformed price).
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// Required fields were left blank.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// A quantity change would take the record below zero or out of range.
    #[error("quantity {current} cannot change by {delta:+}")]
    QuantityOutOfRange { current: u32, delta: i64 },

    #[error("malformed {kind}: {reason}")]
    MalformedId { kind: &'static str, reason: String },
}

impl DomainError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending field, when the error concerns exactly one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Invalid { field, .. } => Some(field),
            Self::QuantityOutOfRange { .. } => Some("quantity"),
            Self::MissingFields(_) | Self::MalformedId { .. } => None,
        }
    }
}
