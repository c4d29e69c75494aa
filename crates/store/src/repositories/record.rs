//! Money record repository.

use std::sync::Arc;

use tracing::info;

use hawala_core::reconcile::{plan_cancel, plan_mark_used, MoneyRecord, RecordStatus};
use hawala_shared::types::RecordId;
use hawala_shared::{EngineError, EngineResult};

use crate::document::{DocumentStore, Revision, WriteBatch};
use crate::paths;

/// Repository for money record documents.
///
/// Records are created by the ingestion pipeline (together with their
/// suspense entry, atomically) and mutated only through the reconciliation
/// protocol and the terminal transitions here.
#[derive(Clone)]
pub struct RecordRepository {
    store: Arc<dyn DocumentStore>,
}

impl RecordRepository {
    /// Creates a repository over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Loads one record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the record does not exist.
    pub async fn get_record(&self, id: RecordId) -> EngineResult<MoneyRecord> {
        Ok(self.get_with_revision(id).await?.0)
    }

    /// Loads one record together with its revision.
    pub(crate) async fn get_with_revision(
        &self,
        id: RecordId,
    ) -> EngineResult<(MoneyRecord, Revision)> {
        let doc = self
            .store
            .get(&paths::record(id))
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("record {id}")))?;
        Ok((doc.decode()?, doc.revision))
    }

    /// Lists records, optionally filtered by status.
    pub async fn list_records(
        &self,
        status: Option<RecordStatus>,
    ) -> EngineResult<Vec<MoneyRecord>> {
        let docs = self.store.list(paths::RECORDS).await?;
        let mut records = Vec::with_capacity(docs.len());
        for doc in docs {
            let record: MoneyRecord = doc.decode()?;
            if status.is_none_or(|wanted| record.status == wanted) {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Marks a matched record's funds as consumed (terminal).
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown record
    /// - `Validation` unless the record is `Matched`
    /// - `Conflict` when a concurrent write got there first
    pub async fn mark_record_used(&self, id: RecordId) -> EngineResult<MoneyRecord> {
        let (record, revision) = self.get_with_revision(id).await?;
        let updated = plan_mark_used(&record)?;

        let mut batch = WriteBatch::new();
        batch.update(paths::record(id), revision, &updated)?;
        self.store.commit(batch).await?;

        info!(record_id = %id, "marked record used");
        Ok(updated)
    }

    /// Withdraws an unmatched record from reconciliation (terminal).
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown record
    /// - `Validation` unless the record is `Unmatched`
    /// - `Conflict` when a concurrent write got there first
    pub async fn cancel_record(&self, id: RecordId) -> EngineResult<MoneyRecord> {
        let (record, revision) = self.get_with_revision(id).await?;
        let updated = plan_cancel(&record)?;

        let mut batch = WriteBatch::new();
        batch.update(paths::record(id), revision, &updated)?;
        self.store.commit(batch).await?;

        info!(record_id = %id, "cancelled record");
        Ok(updated)
    }
}
