//! Financial period boundary.
//!
//! A period close does not delete or roll up history: it records a balance
//! snapshot per leaf account and advances the global boundary that balance
//! queries default to. The boundary is always passed explicitly into balance
//! computation, never read as a hidden global.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use hawala_shared::types::AccountId;

/// Engine-wide settings document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Start of the current financial period. `None` until the first close;
    /// balance queries then cover full history by default.
    pub financial_period_start_date: Option<DateTime<Utc>>,
}

/// The balance snapshot persisted for one leaf account at close time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosingSnapshot {
    /// The account.
    pub account_id: AccountId,
    /// Full-history balance at the moment of the close.
    pub closed_balance: Decimal,
}
