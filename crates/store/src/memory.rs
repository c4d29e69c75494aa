//! In-memory document store adapter.
//!
//! Implements the full port semantics, including conditional batch commits,
//! over a process-local map. Used by the test suites and by embedders that
//! do not need durability.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::document::{
    DocPath, Document, DocumentStore, Precondition, Revision, StoreError, Write, WriteBatch,
};

#[derive(Debug, Clone)]
struct Stored {
    revision: Revision,
    data: Value,
}

/// Process-local document store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: RwLock<BTreeMap<(String, String), Stored>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn key(path: &DocPath) -> (String, String) {
        (path.collection.clone(), path.id.clone())
    }

    fn check(
        docs: &BTreeMap<(String, String), Stored>,
        precondition: &Precondition,
    ) -> Result<(), StoreError> {
        match precondition {
            Precondition::Missing(path) => {
                if docs.contains_key(&Self::key(path)) {
                    return Err(StoreError::PreconditionFailed(path.clone()));
                }
            }
            Precondition::RevisionIs(path, revision) => {
                let current = docs.get(&Self::key(path)).map(|stored| stored.revision);
                if current != Some(*revision) {
                    return Err(StoreError::PreconditionFailed(path.clone()));
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, path: &DocPath) -> Result<Option<Document>, StoreError> {
        let docs = self.docs.read().map_err(|_| poisoned())?;
        Ok(docs.get(&Self::key(path)).map(|stored| Document {
            path: path.clone(),
            revision: stored.revision,
            data: stored.data.clone(),
        }))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let docs = self.docs.read().map_err(|_| poisoned())?;
        Ok(docs
            .range((collection.to_string(), String::new())..)
            .take_while(|((col, _), _)| col == collection)
            .map(|((col, id), stored)| Document {
                path: DocPath::new(col.clone(), id.clone()),
                revision: stored.revision,
                data: stored.data.clone(),
            })
            .collect())
    }

    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        Ok(self
            .list(collection)
            .await?
            .into_iter()
            .filter(|doc| doc.data.get(field) == Some(value))
            .collect())
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut docs = self.docs.write().map_err(|_| poisoned())?;

        // All preconditions are verified before any write lands, so the
        // batch is all-or-nothing under the single write lock.
        for precondition in &batch.preconditions {
            Self::check(&docs, precondition)?;
        }

        for write in batch.writes {
            match write {
                Write::Put { path, data } => {
                    let key = Self::key(&path);
                    let revision = docs
                        .get(&key)
                        .map_or(Revision(1), |stored| Revision(stored.revision.0 + 1));
                    docs.insert(key, Stored { revision, data });
                }
                Write::Delete { path } => {
                    docs.remove(&Self::key(&path));
                }
            }
        }

        Ok(())
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("store lock poisoned".to_string())
}
