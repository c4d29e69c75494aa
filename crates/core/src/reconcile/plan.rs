//! Reconciliation planning.
//!
//! The planners turn a loaded record plus resolved accounts into the exact
//! entry and record mutation to commit. They hold every state-machine guard;
//! the store layer contributes only atomicity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::accounts::Account;
use crate::clients::Client;
use crate::ledger::{validate_posting, JournalEntry, PostEntryInput};

use super::error::ReconcileError;
use super::types::{MoneyRecord, RecordDirection, RecordStatus};

/// The atomic outcome of planning an assignment: one transfer entry plus the
/// matched record carrying audit snapshots.
#[derive(Debug, Clone)]
pub struct AssignmentPlan {
    /// The transfer entry to append.
    pub entry: JournalEntry,
    /// The record with client, status, entry reference, and snapshots set.
    pub record: MoneyRecord,
}

/// The atomic outcome of planning an unassignment: one reversing entry plus
/// the record reset to unmatched.
#[derive(Debug, Clone)]
pub struct UnassignmentPlan {
    /// The reversing entry to append. The original entry is never deleted.
    pub entry: JournalEntry,
    /// The record reset to `Unmatched` with attribution cleared.
    pub record: MoneyRecord,
}

/// Plans the transfer that attributes a suspense record to a client.
///
/// For an inflow the suspense account is debited and the client's liability
/// account credited; an outflow is the reverse. `client_balance_before` is
/// the client account's derived balance at planning time and lands on the
/// record as the audit snapshot pair.
///
/// # Errors
///
/// - `AlreadyMatched` when the record carries a client or transfer entry
/// - `InvalidTransition` when the record is not `Unmatched`
/// - `Ledger` when the planned entry fails posting validation
pub fn plan_assignment(
    record: &MoneyRecord,
    client: &Client,
    suspense: &Account,
    liability: &Account,
    client_balance_before: Decimal,
    now: DateTime<Utc>,
) -> Result<AssignmentPlan, ReconcileError> {
    if record.client_id.is_some() || record.transfer_entry_id.is_some() {
        return Err(ReconcileError::AlreadyMatched(record.id));
    }
    if !record.status.can_assign() {
        return Err(ReconcileError::InvalidTransition {
            record: record.id,
            from: record.status,
            action: "assigned",
        });
    }

    let (debit_account, credit_account) = match record.direction {
        RecordDirection::Inflow => (suspense, liability),
        RecordDirection::Outflow => (liability, suspense),
    };

    let input = PostEntryInput {
        date: now,
        description: format!("Assign record {} to {}", record.id, client.name),
        debit_account_id: debit_account.id,
        credit_account_id: credit_account.id,
        debit_amount: record.amount,
        credit_amount: record.amount,
        amount_usd: record.amount_usd,
    };
    validate_posting(&input, debit_account, credit_account)?;
    let entry = input.into_entry(now);

    // The liability account is credit-normal: an inflow credits it.
    let (debit_usd, credit_usd) = match record.direction {
        RecordDirection::Inflow => (Decimal::ZERO, record.amount_usd),
        RecordDirection::Outflow => (record.amount_usd, Decimal::ZERO),
    };
    let change = liability.normal_balance().balance_change(debit_usd, credit_usd);

    let mut updated = record.clone();
    updated.client_id = Some(client.id);
    updated.transfer_entry_id = Some(entry.id);
    updated.status = RecordStatus::Matched;
    updated.balance_before = Some(client_balance_before);
    updated.balance_after = Some(client_balance_before + change);

    Ok(AssignmentPlan {
        entry,
        record: updated,
    })
}

/// Plans the reversal that detaches a matched record from its client.
///
/// Posts the counter-entry of the original transfer (legs swapped) and
/// resets the record to `Unmatched`, clearing attribution and snapshots.
///
/// # Errors
///
/// - `NoTransferEntry` when the record was never matched
/// - `InvalidTransition` when the record is not `Matched`
/// - `EntryMismatch` when `original` is not the record's transfer entry
pub fn plan_unassignment(
    record: &MoneyRecord,
    original: &JournalEntry,
    now: DateTime<Utc>,
) -> Result<UnassignmentPlan, ReconcileError> {
    let Some(expected) = record.transfer_entry_id else {
        return Err(ReconcileError::NoTransferEntry(record.id));
    };
    if expected != original.id {
        return Err(ReconcileError::EntryMismatch {
            record: record.id,
            expected,
            actual: original.id,
        });
    }
    if !record.status.can_unassign() {
        return Err(ReconcileError::InvalidTransition {
            record: record.id,
            from: record.status,
            action: "unassigned",
        });
    }

    let entry = original.reversing_input(now).into_entry(now);

    let mut updated = record.clone();
    updated.client_id = None;
    updated.transfer_entry_id = None;
    updated.status = RecordStatus::Unmatched;
    updated.balance_before = None;
    updated.balance_after = None;

    Ok(UnassignmentPlan {
        entry,
        record: updated,
    })
}

/// Marks a matched record's funds as consumed (terminal).
///
/// # Errors
///
/// Returns `InvalidTransition` unless the record is `Matched`.
pub fn plan_mark_used(record: &MoneyRecord) -> Result<MoneyRecord, ReconcileError> {
    if !record.status.can_mark_used() {
        return Err(ReconcileError::InvalidTransition {
            record: record.id,
            from: record.status,
            action: "marked used",
        });
    }
    let mut updated = record.clone();
    updated.status = RecordStatus::Used;
    Ok(updated)
}

/// Withdraws an unmatched record from reconciliation (terminal).
///
/// # Errors
///
/// Returns `InvalidTransition` unless the record is `Unmatched`.
pub fn plan_cancel(record: &MoneyRecord) -> Result<MoneyRecord, ReconcileError> {
    if !record.status.can_cancel() {
        return Err(ReconcileError::InvalidTransition {
            record: record.id,
            from: record.status,
            action: "cancelled",
        });
    }
    let mut updated = record.clone();
    updated.status = RecordStatus::Cancelled;
    Ok(updated)
}
