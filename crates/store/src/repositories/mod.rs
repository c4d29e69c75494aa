//! Repositories and services over the document store.
//!
//! Each mutating operation loads what it needs, lets `hawala-core` plan the
//! mutation, and commits the plan as one atomic conditional batch.

pub mod account;
pub mod client;
pub mod ingest;
pub mod journal;
pub mod period;
pub mod reconciliation;
pub mod record;

pub use account::{AccountRegistry, CreateAccountInput};
pub use client::{ClientRepository, CreateClientInput};
pub use ingest::{IngestOutcome, IngestService};
pub use journal::JournalLedger;
pub use period::PeriodService;
pub use reconciliation::ReconciliationService;
pub use record::RecordRepository;
