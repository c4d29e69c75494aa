//! Ledger error types.

use thiserror::Error;

use hawala_shared::types::AccountId;
use hawala_shared::EngineError;

/// Errors that can occur while validating a journal posting.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Debit and credit legs must reference different accounts.
    #[error("Debit and credit legs must reference different accounts")]
    SameAccountLegs,

    /// Entry amounts must be positive.
    #[error("Entry amount must be positive")]
    NonPositiveAmount,

    /// The canonical USD amount must be positive.
    #[error("USD amount must be positive")]
    NonPositiveUsdAmount,

    /// Posting targets a group account.
    #[error("Account {0} is a group account and cannot receive postings")]
    GroupAccountTarget(AccountId),

    /// Leg currency disagrees with the target account's native currency.
    #[error("Account {account_id} is denominated in {expected}, got {actual}")]
    CurrencyMismatch {
        /// The account being posted to.
        account_id: AccountId,
        /// The account's native currency.
        expected: String,
        /// The currency supplied on the leg.
        actual: String,
    },
}

impl From<LedgerError> for EngineError {
    fn from(err: LedgerError) -> Self {
        Self::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_to_validation() {
        let err: EngineError = LedgerError::NonPositiveAmount.into();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert!(!err.is_retryable());
    }
}
