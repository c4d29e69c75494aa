//! Period-aware account balance computation.
//!
//! Balances are never stored; they are always derived by re-scanning the
//! journal. The scan applies the account type's normal balance side to each
//! entry's canonical USD amount, optionally restricted to entries dated
//! on/after the financial period boundary.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use hawala_shared::types::{AccountId, EntryId};

use crate::accounts::Account;

use super::types::{EntrySide, JournalEntry};

/// Derived balance of one account, with debit/credit totals for audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceBreakdown {
    /// The account.
    pub account_id: AccountId,
    /// Sum of USD amounts on entries debiting the account.
    pub debit_total: Decimal,
    /// Sum of USD amounts on entries crediting the account.
    pub credit_total: Decimal,
    /// Net balance per the account type's normal side.
    pub balance: Decimal,
    /// Number of entries scanned.
    pub entry_count: usize,
}

/// One line of the ordered audit breakdown for an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRow {
    /// The journal entry.
    pub entry_id: EntryId,
    /// Entry date.
    pub date: DateTime<Utc>,
    /// Entry description.
    pub description: String,
    /// USD amount when the account is on the debit leg, else zero.
    pub debit_usd: Decimal,
    /// USD amount when the account is on the credit leg, else zero.
    pub credit_usd: Decimal,
    /// Signed balance change contributed by this entry.
    pub change: Decimal,
    /// Balance after this entry, in scan order.
    pub running_balance: Decimal,
}

/// Computes the derived balance of `account` over `entries`.
///
/// Entries not referencing the account on either leg are ignored. When
/// `boundary` is supplied, only entries dated on/after it count - this is how
/// the financial period boundary scopes balances without deleting history.
/// The scan order is deterministic: (date, entry id) ascending.
#[must_use]
pub fn compute_balance(
    account: &Account,
    entries: &[JournalEntry],
    boundary: Option<DateTime<Utc>>,
) -> BalanceBreakdown {
    let mut breakdown = BalanceBreakdown {
        account_id: account.id,
        debit_total: Decimal::ZERO,
        credit_total: Decimal::ZERO,
        balance: Decimal::ZERO,
        entry_count: 0,
    };

    for entry in scoped(account, entries, boundary) {
        match entry.side_of(account.id) {
            Some(EntrySide::Debit) => breakdown.debit_total += entry.amount_usd,
            Some(EntrySide::Credit) => breakdown.credit_total += entry.amount_usd,
            None => continue,
        }
        breakdown.entry_count += 1;
    }

    breakdown.balance = account
        .normal_balance()
        .balance_change(breakdown.debit_total, breakdown.credit_total);
    breakdown
}

/// Produces the ordered per-entry audit breakdown with running balances.
///
/// Rows appear in the same deterministic (date, entry id) order the balance
/// scan uses, so the last row's running balance equals `compute_balance`.
#[must_use]
pub fn ledger_rows(
    account: &Account,
    entries: &[JournalEntry],
    boundary: Option<DateTime<Utc>>,
) -> Vec<LedgerRow> {
    let side = account.normal_balance();
    let mut running = Decimal::ZERO;

    scoped(account, entries, boundary)
        .into_iter()
        .filter_map(|entry| {
            let (debit_usd, credit_usd) = match entry.side_of(account.id)? {
                EntrySide::Debit => (entry.amount_usd, Decimal::ZERO),
                EntrySide::Credit => (Decimal::ZERO, entry.amount_usd),
            };
            let change = side.balance_change(debit_usd, credit_usd);
            running += change;
            Some(LedgerRow {
                entry_id: entry.id,
                date: entry.date,
                description: entry.description.clone(),
                debit_usd,
                credit_usd,
                change,
                running_balance: running,
            })
        })
        .collect()
}

/// Selects the account's entries within the boundary, in scan order.
fn scoped<'a>(
    account: &Account,
    entries: &'a [JournalEntry],
    boundary: Option<DateTime<Utc>>,
) -> Vec<&'a JournalEntry> {
    let mut scoped: Vec<&JournalEntry> = entries
        .iter()
        .filter(|entry| entry.side_of(account.id).is_some())
        .filter(|entry| boundary.is_none_or(|b| entry.date >= b))
        .collect();
    scoped.sort_by_key(|entry| (entry.date, entry.id));
    scoped
}
