//! Reconciliation errors.
//!
//! Every error is scoped to one reconciliation call and is surfaced to the
//! caller as-is; the core never retries or recovers locally.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// A field value violates its declared constraint.
    #[error("invalid value for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// The live snapshot is missing or carries an unusable value for a
    /// required field.
    #[error("cannot map live state field {field}: {reason}")]
    Mapping { field: String, reason: String },

    /// A cross-field invariant does not hold.
    #[error("inconsistent configuration: {0}")]
    Consistency(String),
}

impl ReconcileError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ReconcileError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn mapping(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ReconcileError::Mapping {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ReconcileError::Validation { .. } => "validation",
            ReconcileError::Mapping { .. } => "mapping",
            ReconcileError::Consistency(_) => "consistency",
        }
    }
}

/// Result type for reconciliation operations.
pub type ReconcileResult<T> = Result<T, ReconcileError>;
