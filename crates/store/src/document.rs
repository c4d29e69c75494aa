//! The document-store port.
//!
//! The engine's persistence needs are small and precise: point reads,
//! queries by indexed top-level field, and an atomic conditional multi-path
//! commit. The commit is the sole correctness mechanism for concurrent
//! mutation - in-process locks cannot help when request handlers run in
//! different processes. A batch's preconditions and writes apply as one
//! indivisible unit or not at all.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use hawala_shared::EngineError;

/// Address of one document: `collection/id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocPath {
    /// The collection name.
    pub collection: String,
    /// The document id within the collection.
    pub id: String,
}

impl DocPath {
    /// Creates a document path.
    #[must_use]
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }
}

impl std::fmt::Display for DocPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// Monotonic per-document revision, bumped on every write.
///
/// Revisions make the read-check-write of the reconciliation protocol an
/// indivisible unit: a batch conditioned on the revision a handler read
/// fails if any other handler wrote the document in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Revision(pub u64);

/// A stored document with its revision.
#[derive(Debug, Clone)]
pub struct Document {
    /// Where the document lives.
    pub path: DocPath,
    /// Revision at read time.
    pub revision: Revision,
    /// The document body.
    pub data: Value,
}

impl Document {
    /// Decodes the document body into a typed value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Codec` when the body does not match the type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(self.data.clone()).map_err(StoreError::Codec)
    }
}

/// A condition the whole batch stands or falls on.
#[derive(Debug, Clone)]
pub enum Precondition {
    /// The document must not exist.
    Missing(DocPath),
    /// The document must exist at exactly this revision.
    RevisionIs(DocPath, Revision),
}

/// One write within a batch.
#[derive(Debug, Clone)]
pub enum Write {
    /// Create or replace the document body.
    Put {
        /// Target path.
        path: DocPath,
        /// New body.
        data: Value,
    },
    /// Remove the document.
    Delete {
        /// Target path.
        path: DocPath,
    },
}

/// An atomic conditional multi-path write.
///
/// All preconditions are checked and all writes applied as one unit.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    /// Conditions checked before anything is written.
    pub preconditions: Vec<Precondition>,
    /// Writes applied when every condition holds.
    pub writes: Vec<Write>,
}

impl WriteBatch {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a create: the document must not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Codec` when the value does not serialize.
    pub fn create<T: Serialize>(&mut self, path: DocPath, value: &T) -> Result<(), StoreError> {
        let data = serde_json::to_value(value).map_err(StoreError::Codec)?;
        self.preconditions.push(Precondition::Missing(path.clone()));
        self.writes.push(Write::Put { path, data });
        Ok(())
    }

    /// Adds an update conditioned on the revision the caller read.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Codec` when the value does not serialize.
    pub fn update<T: Serialize>(
        &mut self,
        path: DocPath,
        revision: Revision,
        value: &T,
    ) -> Result<(), StoreError> {
        let data = serde_json::to_value(value).map_err(StoreError::Codec)?;
        self.preconditions
            .push(Precondition::RevisionIs(path.clone(), revision));
        self.writes.push(Write::Put { path, data });
        Ok(())
    }

    /// Adds an unconditional put.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Codec` when the value does not serialize.
    pub fn put<T: Serialize>(&mut self, path: DocPath, value: &T) -> Result<(), StoreError> {
        let data = serde_json::to_value(value).map_err(StoreError::Codec)?;
        self.writes.push(Write::Put { path, data });
        Ok(())
    }

    /// Returns true if the batch writes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Errors surfaced by a document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A batch precondition did not hold; nothing was written.
    #[error("Precondition failed on {0}")]
    PreconditionFailed(DocPath),

    /// A document body failed to encode or decode.
    #[error("Codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The backend failed transiently; the batch either fully applied or
    /// not at all, so retrying is safe.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::PreconditionFailed(path) => {
                Self::Conflict(format!("concurrent write on {path}"))
            }
            StoreError::Codec(_) | StoreError::Backend(_) => Self::Store(err.to_string()),
        }
    }
}

/// The document-store port.
///
/// Adapters implement point reads, collection listing, equality queries on
/// indexed top-level fields, and the atomic conditional commit. The
/// production client library is an external collaborator; tests run against
/// [`crate::MemoryStore`].
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads one document, if present.
    async fn get(&self, path: &DocPath) -> Result<Option<Document>, StoreError>;

    /// Lists a collection in id order.
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Returns the documents whose indexed top-level `field` equals `value`.
    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError>;

    /// Atomically checks every precondition and applies every write.
    ///
    /// # Errors
    ///
    /// `PreconditionFailed` when any condition does not hold; in that case
    /// nothing was written.
    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;
}
