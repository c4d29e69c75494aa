//! Persisted logical layout.
//!
//! `accounts/{id}`, `journal_entries/{id}`, `records/{id}`, `clients/{id}`,
//! `parse_failures/{id}`, and the singleton `settings/engine`.

use hawala_shared::types::{AccountId, ClientId, EntryId, FailureId, RecordId};

use crate::document::DocPath;

/// Accounts collection.
pub const ACCOUNTS: &str = "accounts";
/// Journal entries collection.
pub const JOURNAL_ENTRIES: &str = "journal_entries";
/// Money records collection.
pub const RECORDS: &str = "records";
/// Clients collection.
pub const CLIENTS: &str = "clients";
/// Parse failures collection.
pub const PARSE_FAILURES: &str = "parse_failures";
/// Settings collection (holds the singleton engine document).
pub const SETTINGS: &str = "settings";

/// Path of an account document.
#[must_use]
pub fn account(id: AccountId) -> DocPath {
    DocPath::new(ACCOUNTS, id.to_string())
}

/// Path of a journal entry document.
#[must_use]
pub fn journal_entry(id: EntryId) -> DocPath {
    DocPath::new(JOURNAL_ENTRIES, id.to_string())
}

/// Path of a money record document.
#[must_use]
pub fn record(id: RecordId) -> DocPath {
    DocPath::new(RECORDS, id.to_string())
}

/// Path of a client document.
#[must_use]
pub fn client(id: ClientId) -> DocPath {
    DocPath::new(CLIENTS, id.to_string())
}

/// Path of a parse failure document.
#[must_use]
pub fn parse_failure(id: FailureId) -> DocPath {
    DocPath::new(PARSE_FAILURES, id.to_string())
}

/// Path of the singleton settings document.
#[must_use]
pub fn settings() -> DocPath {
    DocPath::new(SETTINGS, "engine")
}
