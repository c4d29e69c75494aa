//! Reconciliation error types.

use thiserror::Error;

use hawala_shared::types::{EntryId, RecordId};
use hawala_shared::EngineError;

use crate::ledger::LedgerError;

use super::types::RecordStatus;

/// Errors that can occur while planning a reconciliation step.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The record already carries a client or transfer entry.
    ///
    /// This is the idempotency guard: at most one transfer per record, even
    /// under concurrent retries.
    #[error("Record {0} is already matched")]
    AlreadyMatched(RecordId),

    /// Unassignment requested for a record that has no transfer entry.
    #[error("Record {0} has no transfer entry")]
    NoTransferEntry(RecordId),

    /// The record's status does not permit the requested action.
    #[error("Record {record} is {from:?} and cannot be {action}")]
    InvalidTransition {
        /// The record.
        record: RecordId,
        /// Its current status.
        from: RecordStatus,
        /// The rejected action.
        action: &'static str,
    },

    /// The loaded journal entry is not the record's transfer entry.
    #[error("Record {record} references entry {expected}, got {actual}")]
    EntryMismatch {
        /// The record.
        record: RecordId,
        /// The entry the record references.
        expected: EntryId,
        /// The entry that was supplied.
        actual: EntryId,
    },

    /// The planned transfer entry failed posting validation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl From<ReconcileError> for EngineError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::AlreadyMatched(_) => Self::Conflict(err.to_string()),
            ReconcileError::NoTransferEntry(_) => Self::NotFound(err.to_string()),
            ReconcileError::InvalidTransition { .. }
            | ReconcileError::EntryMismatch { .. }
            | ReconcileError::Ledger(_) => Self::Validation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_mapping() {
        let conflict: EngineError = ReconcileError::AlreadyMatched(RecordId::new()).into();
        assert_eq!(conflict.error_code(), "CONFLICT");

        let not_found: EngineError = ReconcileError::NoTransferEntry(RecordId::new()).into();
        assert_eq!(not_found.error_code(), "NOT_FOUND");

        let validation: EngineError = ReconcileError::InvalidTransition {
            record: RecordId::new(),
            from: RecordStatus::Cancelled,
            action: "assigned",
        }
        .into();
        assert_eq!(validation.error_code(), "VALIDATION_ERROR");
    }
}
