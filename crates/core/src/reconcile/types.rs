//! Money record types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use hawala_shared::types::{ClientId, Currency, EntryId, Money, RecordId};

/// Lifecycle of a money record.
///
/// `Unmatched -> Matched -> Used`, with `Cancelled` as the alternate
/// terminal state for records that never belonged in the books.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    /// Funds sit in suspense, not yet attributed to a client.
    Unmatched,
    /// Attributed to a client; the transfer entry exists.
    Matched,
    /// The matched funds were consumed downstream (terminal).
    Used,
    /// Withdrawn from reconciliation entirely (terminal).
    Cancelled,
}

impl RecordStatus {
    /// Returns true if the record reached a terminal state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Used | Self::Cancelled)
    }

    /// Returns true if the record can be assigned to a client.
    #[must_use]
    pub fn can_assign(self) -> bool {
        matches!(self, Self::Unmatched)
    }

    /// Returns true if the record's assignment can be undone.
    #[must_use]
    pub fn can_unassign(self) -> bool {
        matches!(self, Self::Matched)
    }

    /// Returns true if the record can be marked used.
    #[must_use]
    pub fn can_mark_used(self) -> bool {
        matches!(self, Self::Matched)
    }

    /// Returns true if the record can be cancelled.
    #[must_use]
    pub fn can_cancel(self) -> bool {
        matches!(self, Self::Unmatched)
    }
}

/// Which suspense book a record belongs to.
///
/// The discriminant of the record union: fiat cash movements settle against
/// the cash suspense account, stablecoin movements against the USDT suspense
/// account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordCategory {
    /// Fiat cash movement.
    Cash,
    /// Stablecoin movement.
    Usdt,
}

impl RecordCategory {
    /// Derives the category from the record's currency.
    #[must_use]
    pub const fn of(currency: Currency) -> Self {
        if currency.is_stablecoin() {
            Self::Usdt
        } else {
            Self::Cash
        }
    }
}

/// Direction of the movement relative to the desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordDirection {
    /// Money came in (an SMS "credit").
    Inflow,
    /// Money went out (an SMS "debit").
    Outflow,
}

/// Where a record came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RecordSource {
    /// Parsed from an incoming SMS.
    Sms {
        /// The raw message text, kept for audit.
        raw: String,
    },
    /// Entered manually by an operator.
    Manual,
}

/// A cash or stablecoin movement awaiting (or carrying) client attribution.
///
/// Created by ingestion, mutated only by assignment, unassignment, and the
/// terminal transitions; never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoneyRecord {
    /// Unique identifier.
    pub id: RecordId,
    /// Business date of the movement.
    pub date: DateTime<Utc>,
    /// Native amount and currency.
    pub amount: Money,
    /// Which suspense book the record settles against.
    pub category: RecordCategory,
    /// Inflow or outflow.
    pub direction: RecordDirection,
    /// Canonical USD amount.
    pub amount_usd: Decimal,
    /// Lifecycle status.
    pub status: RecordStatus,
    /// The attributed client, set exactly once on match.
    pub client_id: Option<ClientId>,
    /// The transfer entry posted on match, set exactly once.
    pub transfer_entry_id: Option<EntryId>,
    /// Client account balance immediately before the transfer (audit).
    pub balance_before: Option<Decimal>,
    /// Client account balance immediately after the transfer (audit).
    pub balance_after: Option<Decimal>,
    /// Set when matching was short-circuited (blacklisted counterparty).
    /// Flagged records stay unmatched until an operator clears them.
    pub flagged_reason: Option<String>,
    /// Provenance.
    pub source: RecordSource,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl MoneyRecord {
    /// Creates a fresh unmatched record.
    #[must_use]
    pub fn new(
        date: DateTime<Utc>,
        amount: Money,
        direction: RecordDirection,
        amount_usd: Decimal,
        source: RecordSource,
    ) -> Self {
        Self {
            id: RecordId::new(),
            date,
            amount,
            category: RecordCategory::of(amount.currency),
            direction,
            amount_usd,
            status: RecordStatus::Unmatched,
            client_id: None,
            transfer_entry_id: None,
            balance_before: None,
            balance_after: None,
            flagged_reason: None,
            source,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(RecordStatus::Unmatched, false, true, false, true)]
    #[case(RecordStatus::Matched, false, false, true, false)]
    #[case(RecordStatus::Used, true, false, false, false)]
    #[case(RecordStatus::Cancelled, true, false, false, false)]
    fn test_status_machine(
        #[case] status: RecordStatus,
        #[case] terminal: bool,
        #[case] assignable: bool,
        #[case] unassignable: bool,
        #[case] cancellable: bool,
    ) {
        assert_eq!(status.is_terminal(), terminal);
        assert_eq!(status.can_assign(), assignable);
        assert_eq!(status.can_unassign(), unassignable);
        assert_eq!(status.can_cancel(), cancellable);
    }

    #[test]
    fn test_category_from_currency() {
        assert_eq!(RecordCategory::of(Currency::Yer), RecordCategory::Cash);
        assert_eq!(RecordCategory::of(Currency::Usd), RecordCategory::Cash);
        assert_eq!(RecordCategory::of(Currency::Usdt), RecordCategory::Usdt);
    }

    #[test]
    fn test_new_record_is_unmatched() {
        let record = MoneyRecord::new(
            Utc::now(),
            Money::new(dec!(5000), Currency::Yer),
            RecordDirection::Inflow,
            dec!(10),
            RecordSource::Manual,
        );

        assert_eq!(record.status, RecordStatus::Unmatched);
        assert_eq!(record.category, RecordCategory::Cash);
        assert!(record.client_id.is_none());
        assert!(record.transfer_entry_id.is_none());
        assert!(record.balance_before.is_none());
    }
}
