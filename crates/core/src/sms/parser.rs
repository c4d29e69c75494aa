//! Parsed message shapes and text normalization helpers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use hawala_shared::types::{Currency, FailureId};

use crate::reconcile::RecordDirection;

use super::error::SmsError;

/// Structured movement extracted from one SMS.
///
/// Untrusted input: produced by the pattern rules (or an upstream extraction
/// collaborator) and validated before anything is posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSms {
    /// Credit (inflow) or debit (outflow) relative to the desk.
    pub direction: RecordDirection,
    /// The extracted amount.
    pub amount: Decimal,
    /// The extracted or rule-defaulted currency.
    pub currency: Currency,
    /// The counterparty name or phone as written in the message.
    pub person: String,
}

impl ParsedSms {
    /// Validates the extracted fields before they reach the ledger.
    ///
    /// # Errors
    ///
    /// Returns `SmsError` when the amount is not positive or the person
    /// field is empty.
    pub fn validate(&self) -> Result<(), SmsError> {
        if self.amount <= Decimal::ZERO {
            return Err(SmsError::NonPositiveAmount);
        }
        if self.person.trim().is_empty() {
            return Err(SmsError::EmptyPerson);
        }
        Ok(())
    }
}

/// Outcome of running a message through the rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// A rule matched and extraction succeeded.
    Parsed {
        /// Name of the first rule that matched.
        rule: String,
        /// The extracted movement.
        sms: ParsedSms,
    },
    /// No rule matched, or the matched text failed extraction.
    NoMatch,
}

/// A message that could not be parsed, persisted for manual resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseFailure {
    /// Unique identifier.
    pub id: FailureId,
    /// The raw message text.
    pub raw_message: String,
    /// When the message arrived.
    pub received_at: DateTime<Utc>,
    /// Set once an operator has dealt with the message.
    pub resolved: bool,
}

impl ParseFailure {
    /// Records a failed message.
    #[must_use]
    pub fn new(raw_message: impl Into<String>, received_at: DateTime<Utc>) -> Self {
        Self {
            id: FailureId::new(),
            raw_message: raw_message.into(),
            received_at,
            resolved: false,
        }
    }
}

/// Normalizes a captured amount string to a `Decimal`.
///
/// Tolerates Arabic-Indic digits and the usual thousands separators.
/// Returns `None` when the cleaned text is not a number.
#[must_use]
pub(super) fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter_map(|c| match c {
            // Arabic-Indic digits.
            '\u{0660}'..='\u{0669}' => {
                char::from_u32(u32::from(c) - 0x0660 + u32::from('0'))
            }
            // Thousands separators.
            ',' | '\u{060C}' | '\u{066C}' | '\u{00A0}' | ' ' => None,
            // Arabic decimal separator.
            '\u{066B}' => Some('.'),
            other => Some(other),
        })
        .collect();

    cleaned.parse().ok()
}

/// Maps a captured currency word to a currency.
#[must_use]
pub(super) fn currency_from_word(word: &str) -> Option<Currency> {
    let word = word.trim();
    match word {
        "دولار" => Some(Currency::Usd),
        "ريال يمني" | "ريال" => Some(Currency::Yer),
        "ريال سعودي" | "سعودي" => Some(Currency::Sar),
        _ if word.eq_ignore_ascii_case("usdt") => Some(Currency::Usdt),
        _ => None,
    }
}
