//! Journal entry types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use hawala_shared::types::{AccountId, EntryId, Money};

/// The side an account occupies on a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySide {
    /// The debit leg.
    Debit,
    /// The credit leg.
    Credit,
}

/// An immutable double-entry journal record of one economic event.
///
/// Both legs always exist together; corrections are new counter-entries,
/// never edits. The legs carry native amounts (possibly in different
/// currencies), and `amount_usd` is the canonical cross-currency unit used
/// for balances and the global double-entry invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier (time-ordered).
    pub id: EntryId,
    /// Entry date. Balance queries compare this against the period boundary.
    pub date: DateTime<Utc>,
    /// What economic event this entry records.
    pub description: String,
    /// The account debited.
    pub debit_account_id: AccountId,
    /// The account credited.
    pub credit_account_id: AccountId,
    /// Native amount of the debit leg.
    pub debit_amount: Money,
    /// Native amount of the credit leg.
    pub credit_amount: Money,
    /// Canonical USD amount of the event, identical for both legs.
    pub amount_usd: Decimal,
    /// Persistence timestamp.
    pub created_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Returns which side the given account occupies on this entry, if any.
    #[must_use]
    pub fn side_of(&self, account_id: AccountId) -> Option<EntrySide> {
        if self.debit_account_id == account_id {
            Some(EntrySide::Debit)
        } else if self.credit_account_id == account_id {
            Some(EntrySide::Credit)
        } else {
            None
        }
    }

    /// Builds the counter-entry that reverses this one.
    ///
    /// Legs are swapped, amounts preserved; the journal stays append-only.
    #[must_use]
    pub fn reversing_input(&self, date: DateTime<Utc>) -> PostEntryInput {
        PostEntryInput {
            date,
            description: format!("Reversal of entry {}", self.id),
            debit_account_id: self.credit_account_id,
            credit_account_id: self.debit_account_id,
            debit_amount: self.credit_amount,
            credit_amount: self.debit_amount,
            amount_usd: self.amount_usd,
        }
    }
}

/// Input for posting a new journal entry.
#[derive(Debug, Clone)]
pub struct PostEntryInput {
    /// Entry date.
    pub date: DateTime<Utc>,
    /// Description of the economic event.
    pub description: String,
    /// The account to debit.
    pub debit_account_id: AccountId,
    /// The account to credit.
    pub credit_account_id: AccountId,
    /// Native amount of the debit leg.
    pub debit_amount: Money,
    /// Native amount of the credit leg.
    pub credit_amount: Money,
    /// Canonical USD amount.
    pub amount_usd: Decimal,
}

impl PostEntryInput {
    /// Materializes the validated input into an immutable entry.
    #[must_use]
    pub fn into_entry(self, now: DateTime<Utc>) -> JournalEntry {
        JournalEntry {
            id: EntryId::new(),
            date: self.date,
            description: self.description,
            debit_account_id: self.debit_account_id,
            credit_account_id: self.credit_account_id,
            debit_amount: self.debit_amount,
            credit_amount: self.credit_amount,
            amount_usd: self.amount_usd,
            created_at: now,
        }
    }
}
