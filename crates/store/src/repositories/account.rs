//! Chart-of-accounts registry.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use hawala_core::accounts::{Account, AccountFilter, AccountType};
use hawala_shared::types::{AccountId, Currency};
use hawala_shared::{EngineError, EngineResult};

use crate::document::{DocumentStore, Revision, WriteBatch};
use crate::paths;

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Account code, unique within the chart.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Whether this is a group header.
    pub is_group: bool,
    /// Native currency, when single-currency.
    pub currency: Option<Currency>,
    /// Parent group account.
    pub parent_id: Option<AccountId>,
}

/// The single source of truth for the chart of accounts.
///
/// Accounts are created rarely and are effectively immutable afterwards;
/// the ledger consults this registry to reject postings to group accounts.
#[derive(Clone)]
pub struct AccountRegistry {
    store: Arc<dyn DocumentStore>,
}

impl AccountRegistry {
    /// Creates a registry over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Creates a new account.
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty or duplicate code, or a parent that is
    ///   not a group account
    /// - `NotFound` for a missing parent
    pub async fn create_account(&self, input: CreateAccountInput) -> EngineResult<Account> {
        if input.code.trim().is_empty() {
            return Err(EngineError::Validation("account code is empty".to_string()));
        }

        if self.find_by_code(&input.code).await?.is_some() {
            return Err(EngineError::Validation(format!(
                "account code '{}' already exists",
                input.code
            )));
        }

        if let Some(parent_id) = input.parent_id {
            let parent = self.get_account(parent_id).await?;
            if !parent.is_group {
                return Err(EngineError::Validation(format!(
                    "parent account {} is not a group account",
                    parent.code
                )));
            }
        }

        let account = Account {
            id: AccountId::new(),
            code: input.code,
            name: input.name,
            account_type: input.account_type,
            is_group: input.is_group,
            currency: input.currency,
            parent_id: input.parent_id,
            closed_balance: None,
            created_at: Utc::now(),
        };

        let mut batch = WriteBatch::new();
        batch.create(paths::account(account.id), &account)?;
        self.store.commit(batch).await?;

        info!(account_id = %account.id, code = %account.code, "created account");
        Ok(account)
    }

    /// Loads one account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the account does not exist.
    pub async fn get_account(&self, id: AccountId) -> EngineResult<Account> {
        Ok(self.get_with_revision(id).await?.0)
    }

    /// Loads one account together with its revision.
    pub(crate) async fn get_with_revision(
        &self,
        id: AccountId,
    ) -> EngineResult<(Account, Revision)> {
        let doc = self
            .store
            .get(&paths::account(id))
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("account {id}")))?;
        Ok((doc.decode()?, doc.revision))
    }

    /// Finds an account by its code.
    pub async fn find_by_code(&self, code: &str) -> EngineResult<Option<Account>> {
        let docs = self
            .store
            .query(paths::ACCOUNTS, "code", &serde_json::Value::from(code))
            .await?;
        docs.first()
            .map(|doc| doc.decode())
            .transpose()
            .map_err(Into::into)
    }

    /// Lists accounts matching the filter.
    pub async fn list_accounts(&self, filter: &AccountFilter) -> EngineResult<Vec<Account>> {
        Ok(self
            .list_with_revisions()
            .await?
            .into_iter()
            .map(|(account, _)| account)
            .filter(|account| filter.matches(account))
            .collect())
    }

    /// Lists every account with its revision, for conditional rewrites.
    pub(crate) async fn list_with_revisions(&self) -> EngineResult<Vec<(Account, Revision)>> {
        let docs = self.store.list(paths::ACCOUNTS).await?;
        docs.into_iter()
            .map(|doc| Ok((doc.decode()?, doc.revision)))
            .collect()
    }
}
