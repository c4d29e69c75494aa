//! Posting validation.

use rust_decimal::Decimal;

use crate::accounts::Account;

use super::error::LedgerError;
use super::types::PostEntryInput;

/// Validates a posting against the two target accounts.
///
/// The caller loads both accounts from the registry; this function checks
/// every precondition the ledger enforces:
///
/// - debit and credit legs reference distinct accounts
/// - both accounts are postable leaves, not group headers
/// - leg amounts and the canonical USD amount are positive
/// - a leg denominated account only accepts its native currency
///
/// # Errors
///
/// Returns a `LedgerError` describing the first violated precondition.
/// Nothing is written on failure.
pub fn validate_posting(
    input: &PostEntryInput,
    debit_account: &Account,
    credit_account: &Account,
) -> Result<(), LedgerError> {
    if input.debit_account_id == input.credit_account_id {
        return Err(LedgerError::SameAccountLegs);
    }

    for account in [debit_account, credit_account] {
        if !account.is_postable() {
            return Err(LedgerError::GroupAccountTarget(account.id));
        }
    }

    if input.debit_amount.amount <= Decimal::ZERO || input.credit_amount.amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount);
    }
    if input.amount_usd <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveUsdAmount);
    }

    for (account, leg) in [
        (debit_account, input.debit_amount),
        (credit_account, input.credit_amount),
    ] {
        if let Some(expected) = account.currency {
            if leg.currency != expected {
                return Err(LedgerError::CurrencyMismatch {
                    account_id: account.id,
                    expected: expected.to_string(),
                    actual: leg.currency.to_string(),
                });
            }
        }
    }

    Ok(())
}
