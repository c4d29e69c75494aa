//! The suspense reconciliation protocol.
//!
//! Assignment and unassignment commit as single conditional batches keyed on
//! the record's revision: the idempotency check and the write that consumes
//! it are one indivisible unit, so two racing assignments cannot both post.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use hawala_core::reconcile::{plan_assignment, plan_unassignment, MoneyRecord};
use hawala_shared::types::{ClientId, RecordId};
use hawala_shared::{EngineError, EngineResult};

use crate::catalog::AccountCatalog;
use crate::document::{DocumentStore, WriteBatch};
use crate::paths;
use crate::repositories::client::ClientRepository;
use crate::repositories::journal::JournalLedger;
use crate::repositories::record::RecordRepository;

/// Moves unattributed suspense funds to client accounts via ledger postings.
#[derive(Clone)]
pub struct ReconciliationService {
    store: Arc<dyn DocumentStore>,
    journal: JournalLedger,
    clients: ClientRepository,
    records: RecordRepository,
    catalog: AccountCatalog,
}

impl ReconciliationService {
    /// Creates the service.
    #[must_use]
    pub fn new(
        store: Arc<dyn DocumentStore>,
        journal: JournalLedger,
        clients: ClientRepository,
        records: RecordRepository,
        catalog: AccountCatalog,
    ) -> Self {
        Self {
            store,
            journal,
            clients,
            records,
            catalog,
        }
    }

    /// Attributes an unmatched record to a client.
    ///
    /// Posts one transfer entry (inflow: debit suspense, credit client
    /// liability) and marks the record matched with audit balance
    /// snapshots - all in one atomic batch conditioned on the record
    /// revision read here. A concurrent assignment of the same record makes
    /// exactly one of the two batches commit; the loser surfaces
    /// `Conflict` and posts nothing.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown record or client
    /// - `Conflict` when the record is already matched, or the batch loses
    ///   a race
    /// - `Validation` when the record's status forbids assignment
    pub async fn assign_record_to_client(
        &self,
        record_id: RecordId,
        client_id: ClientId,
    ) -> EngineResult<MoneyRecord> {
        let (record, record_revision) = self.records.get_with_revision(record_id).await?;
        let (client, client_revision) = self.clients.get_with_revision(client_id).await?;

        let suspense = self.catalog.suspense_account(record.category).await?;
        let liability = self
            .catalog
            .resolve_client_liability(&client, client_revision)
            .await?;

        let balance_before = if liability.new_account {
            rust_decimal::Decimal::ZERO
        } else {
            self.journal
                .compute_balance(liability.account.id, None)
                .await?
                .balance
        };

        let plan = plan_assignment(
            &record,
            &client,
            &suspense,
            &liability.account,
            balance_before,
            Utc::now(),
        )?;

        let mut batch = WriteBatch::new();
        batch.update(paths::record(record.id), record_revision, &plan.record)?;
        batch.create(paths::journal_entry(plan.entry.id), &plan.entry)?;
        if liability.new_account {
            batch.create(paths::account(liability.account.id), &liability.account)?;
        }
        if let Some((updated_client, revision)) = liability.updated_client {
            batch.update(paths::client(updated_client.id), revision, &updated_client)?;
        }
        self.store.commit(batch).await?;

        info!(
            record_id = %record.id,
            client_id = %client.id,
            entry_id = %plan.entry.id,
            amount_usd = %plan.entry.amount_usd,
            "assigned record to client"
        );
        Ok(plan.record)
    }

    /// Undoes a record's assignment.
    ///
    /// The ledger is append-only: the original transfer entry stays, a
    /// reversing entry (legs swapped) is posted, and the record returns to
    /// `Unmatched` - one atomic batch, conditioned on the record revision.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown record, or one with no transfer entry
    /// - `Conflict` when the batch loses a race
    /// - `Validation` when the record's status forbids unassignment
    pub async fn unassign_record(&self, record_id: RecordId) -> EngineResult<MoneyRecord> {
        let (record, record_revision) = self.records.get_with_revision(record_id).await?;

        let entry_id = record.transfer_entry_id.ok_or_else(|| {
            EngineError::NotFound(format!("record {record_id} has no transfer entry"))
        })?;
        let original = self.journal.get_entry(entry_id).await?;

        let plan = plan_unassignment(&record, &original, Utc::now())?;

        let mut batch = WriteBatch::new();
        batch.update(paths::record(record.id), record_revision, &plan.record)?;
        batch.create(paths::journal_entry(plan.entry.id), &plan.entry)?;
        self.store.commit(batch).await?;

        info!(
            record_id = %record.id,
            reversed_entry = %original.id,
            reversing_entry = %plan.entry.id,
            "unassigned record"
        );
        Ok(plan.record)
    }
}
