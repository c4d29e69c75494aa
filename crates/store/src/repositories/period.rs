//! Period closing service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use hawala_core::accounts::AccountFilter;
use hawala_core::period::{ClosingSnapshot, Settings};
use hawala_shared::EngineResult;

use crate::document::{DocumentStore, WriteBatch};
use crate::paths;
use crate::repositories::account::AccountRegistry;
use crate::repositories::journal::JournalLedger;

/// Advances the balance-computation boundary without deleting history.
#[derive(Clone)]
pub struct PeriodService {
    store: Arc<dyn DocumentStore>,
    registry: AccountRegistry,
    journal: JournalLedger,
}

impl PeriodService {
    /// Creates the service.
    #[must_use]
    pub fn new(
        store: Arc<dyn DocumentStore>,
        registry: AccountRegistry,
        journal: JournalLedger,
    ) -> Self {
        Self {
            store,
            registry,
            journal,
        }
    }

    /// Closes the current financial period at `now`.
    ///
    /// For every leaf account the full-history balance is persisted as its
    /// `closed_balance` snapshot, and the global boundary moves to `now` -
    /// all in one atomic batch. Not reversible by itself; a later close
    /// simply advances the boundary again, and all history stays queryable.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` when accounts or settings changed underneath the
    /// close; nothing is written in that case and the caller may re-read
    /// and retry.
    pub async fn close_period(&self, now: DateTime<Utc>) -> EngineResult<Vec<ClosingSnapshot>> {
        let accounts = self.registry.list_with_revisions().await?;
        let leaf_filter = AccountFilter {
            is_group: Some(false),
            ..AccountFilter::default()
        };

        let mut batch = WriteBatch::new();
        let mut snapshots = Vec::new();

        for (mut account, revision) in accounts {
            if !leaf_filter.matches(&account) {
                continue;
            }
            let breakdown = self.journal.compute_balance(account.id, None).await?;
            account.closed_balance = Some(breakdown.balance);
            snapshots.push(ClosingSnapshot {
                account_id: account.id,
                closed_balance: breakdown.balance,
            });
            batch.update(paths::account(account.id), revision, &account)?;
        }

        let settings_doc = self.store.get(&paths::settings()).await?;
        let mut settings = match &settings_doc {
            Some(doc) => doc.decode::<Settings>()?,
            None => Settings::default(),
        };
        settings.financial_period_start_date = Some(now);
        match settings_doc {
            Some(doc) => batch.update(paths::settings(), doc.revision, &settings)?,
            None => batch.create(paths::settings(), &settings)?,
        }

        self.store.commit(batch).await?;

        info!(
            boundary = %now,
            accounts = snapshots.len(),
            "closed financial period"
        );
        Ok(snapshots)
    }

    /// Reads the current financial period boundary.
    ///
    /// `None` until the first close: balance queries then cover full
    /// history by default.
    pub async fn current_boundary(&self) -> EngineResult<Option<DateTime<Utc>>> {
        self.journal.current_boundary().await
    }
}
