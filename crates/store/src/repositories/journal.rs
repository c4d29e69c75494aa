//! Journal ledger: atomic posting and derived balances.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use hawala_core::ledger::{
    compute_balance, ledger_rows, validate_posting, BalanceBreakdown, JournalEntry, LedgerRow,
    PostEntryInput,
};
use hawala_core::period::Settings;
use hawala_shared::types::{AccountId, EntryId};
use hawala_shared::{EngineError, EngineResult};

use crate::document::{DocumentStore, WriteBatch};
use crate::paths;
use crate::repositories::account::AccountRegistry;

/// Append-only double-entry journal.
///
/// Entries are immutable once posted; corrections are counter-entries.
/// Balances are derived on every query by re-scanning the account's entries,
/// so read paths are pure and tolerate eventual consistency.
#[derive(Clone)]
pub struct JournalLedger {
    store: Arc<dyn DocumentStore>,
    registry: AccountRegistry,
}

impl JournalLedger {
    /// Creates a ledger over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, registry: AccountRegistry) -> Self {
        Self { store, registry }
    }

    /// Validates a posting and materializes the entry without committing.
    ///
    /// Used by the reconciliation protocol and the ingestion pipeline, which
    /// commit the entry inside their own conditional batches.
    pub(crate) async fn validated_entry(
        &self,
        input: PostEntryInput,
    ) -> EngineResult<JournalEntry> {
        let debit_account = self.registry.get_account(input.debit_account_id).await?;
        let credit_account = self.registry.get_account(input.credit_account_id).await?;
        validate_posting(&input, &debit_account, &credit_account)?;
        Ok(input.into_entry(Utc::now()))
    }

    /// Posts a journal entry.
    ///
    /// Both legs are one document, so there is no state where only one leg
    /// exists.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown debit or credit account
    /// - `Validation` for group-account targets or non-positive amounts
    ///
    /// No partial write occurs on failure.
    pub async fn post_entry(&self, input: PostEntryInput) -> EngineResult<EntryId> {
        let entry = self.validated_entry(input).await?;

        let mut batch = WriteBatch::new();
        batch.create(paths::journal_entry(entry.id), &entry)?;
        self.store.commit(batch).await?;

        info!(entry_id = %entry.id, amount_usd = %entry.amount_usd, "posted journal entry");
        Ok(entry.id)
    }

    /// Loads one entry.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the entry does not exist.
    pub async fn get_entry(&self, id: EntryId) -> EngineResult<JournalEntry> {
        let doc = self
            .store
            .get(&paths::journal_entry(id))
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("journal entry {id}")))?;
        doc.decode().map_err(Into::into)
    }

    /// Loads every entry referencing the account on either leg.
    pub async fn entries_for_account(
        &self,
        account_id: AccountId,
    ) -> EngineResult<Vec<JournalEntry>> {
        let id_value = serde_json::to_value(account_id)
            .map_err(crate::document::StoreError::Codec)?;

        let mut entries = Vec::new();
        for field in ["debit_account_id", "credit_account_id"] {
            let docs = self
                .store
                .query(paths::JOURNAL_ENTRIES, field, &id_value)
                .await?;
            for doc in docs {
                entries.push(doc.decode::<JournalEntry>()?);
            }
        }
        Ok(entries)
    }

    /// Computes the account's derived balance.
    ///
    /// When `boundary` is supplied, only entries dated on/after it count.
    /// The scan is deterministic: (date, entry id) ascending.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown account.
    pub async fn compute_balance(
        &self,
        account_id: AccountId,
        boundary: Option<DateTime<Utc>>,
    ) -> EngineResult<BalanceBreakdown> {
        let account = self.registry.get_account(account_id).await?;
        let entries = self.entries_for_account(account_id).await?;
        Ok(compute_balance(&account, &entries, boundary))
    }

    /// Computes the balance bounded by the current financial period.
    ///
    /// Reads the settings document for the boundary; before the first period
    /// close this is the full historical balance.
    pub async fn compute_balance_current(
        &self,
        account_id: AccountId,
    ) -> EngineResult<BalanceBreakdown> {
        self.compute_balance(account_id, self.current_boundary().await?)
            .await
    }

    /// The ordered per-entry audit breakdown with running balances.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown account.
    pub async fn ledger_rows(
        &self,
        account_id: AccountId,
        boundary: Option<DateTime<Utc>>,
    ) -> EngineResult<Vec<LedgerRow>> {
        let account = self.registry.get_account(account_id).await?;
        let entries = self.entries_for_account(account_id).await?;
        Ok(ledger_rows(&account, &entries, boundary))
    }

    /// Total number of entries in the journal.
    pub async fn entry_count(&self) -> EngineResult<usize> {
        Ok(self.store.list(paths::JOURNAL_ENTRIES).await?.len())
    }

    /// Reads the current financial period boundary from settings.
    pub(crate) async fn current_boundary(&self) -> EngineResult<Option<DateTime<Utc>>> {
        let Some(doc) = self.store.get(&paths::settings()).await? else {
            return Ok(None);
        };
        let settings: Settings = doc.decode()?;
        Ok(settings.financial_period_start_date)
    }
}
