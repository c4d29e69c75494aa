//! Client repository.

use std::sync::Arc;

use tracing::info;

use hawala_core::clients::Client;
use hawala_shared::types::ClientId;
use hawala_shared::{EngineError, EngineResult};

use crate::document::{DocumentStore, Revision, WriteBatch};
use crate::paths;

/// Input for registering a client.
#[derive(Debug, Clone)]
pub struct CreateClientInput {
    /// Short code used in the liability account naming convention.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Phone number, when known.
    pub phone: Option<String>,
}

/// Repository for client documents.
#[derive(Clone)]
pub struct ClientRepository {
    store: Arc<dyn DocumentStore>,
}

impl ClientRepository {
    /// Creates a repository over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Registers a new client.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty name or code.
    pub async fn create_client(&self, input: CreateClientInput) -> EngineResult<Client> {
        if input.name.trim().is_empty() {
            return Err(EngineError::Validation("client name is empty".to_string()));
        }
        if input.code.trim().is_empty() {
            return Err(EngineError::Validation("client code is empty".to_string()));
        }

        let client = Client::new(input.code, input.name, input.phone);

        let mut batch = WriteBatch::new();
        batch.create(paths::client(client.id), &client)?;
        self.store.commit(batch).await?;

        info!(client_id = %client.id, "registered client");
        Ok(client)
    }

    /// Loads one client.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the client does not exist.
    pub async fn get_client(&self, id: ClientId) -> EngineResult<Client> {
        Ok(self.get_with_revision(id).await?.0)
    }

    /// Loads one client together with its revision.
    pub(crate) async fn get_with_revision(&self, id: ClientId) -> EngineResult<(Client, Revision)> {
        let doc = self
            .store
            .get(&paths::client(id))
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("client {id}")))?;
        Ok((doc.decode()?, doc.revision))
    }

    /// Lists every client.
    pub async fn list_clients(&self) -> EngineResult<Vec<Client>> {
        let docs = self.store.list(paths::CLIENTS).await?;
        docs.into_iter()
            .map(|doc| doc.decode().map_err(Into::into))
            .collect()
    }
}
