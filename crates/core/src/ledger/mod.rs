//! Double-entry journal logic.
//!
//! Entry validation, the append-only journal entry type, and period-aware
//! balance computation. Persistence and atomicity live in `hawala-store`;
//! everything here is pure.

mod balance;
mod error;
mod types;
mod validation;

pub use balance::{compute_balance, ledger_rows, BalanceBreakdown, LedgerRow};
pub use error::LedgerError;
pub use types::{EntrySide, JournalEntry, PostEntryInput};
pub use validation::validate_posting;
