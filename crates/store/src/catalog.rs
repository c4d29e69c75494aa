//! Account catalog: role-based account resolution.
//!
//! Everything that needs "the suspense account for cash" or "this client's
//! liability account" goes through the catalog. The account-code naming
//! convention (including the `6000<client code>` liability convention) is an
//! implementation detail isolated here.

use chrono::Utc;
use tracing::info;

use hawala_core::accounts::{Account, AccountType};
use hawala_core::clients::Client;
use hawala_core::reconcile::RecordCategory;
use hawala_shared::config::ChartConfig;
use hawala_shared::types::{AccountId, Currency};
use hawala_shared::{EngineError, EngineResult};

use crate::document::Revision;
use crate::repositories::account::{AccountRegistry, CreateAccountInput};

/// The outcome of resolving a client's liability account.
///
/// When the account or the client link does not exist yet, the pending
/// pieces are returned so the caller can fold them into its own atomic
/// batch instead of committing them separately.
#[derive(Debug, Clone)]
pub struct LiabilityResolution {
    /// The liability account (possibly not persisted yet).
    pub account: Account,
    /// True when the account itself must be created in the caller's batch.
    pub new_account: bool,
    /// The client rewrite linking the account, when the link is missing.
    pub updated_client: Option<(Client, Revision)>,
}

/// Role-based account lookup over the registry.
#[derive(Clone)]
pub struct AccountCatalog {
    registry: AccountRegistry,
    chart: ChartConfig,
}

impl AccountCatalog {
    /// Creates a catalog with the configured chart conventions.
    #[must_use]
    pub fn new(registry: AccountRegistry, chart: ChartConfig) -> Self {
        Self { registry, chart }
    }

    /// Resolves the suspense account for a record category.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the chart was never bootstrapped.
    pub async fn suspense_account(&self, category: RecordCategory) -> EngineResult<Account> {
        let code = match category {
            RecordCategory::Cash => &self.chart.cash_suspense_code,
            RecordCategory::Usdt => &self.chart.usdt_suspense_code,
        };
        self.registry.find_by_code(code).await?.ok_or_else(|| {
            EngineError::NotFound(format!("suspense account {code} (chart not bootstrapped)"))
        })
    }

    /// Resolves the cash/wallet asset account for a currency.
    ///
    /// # Errors
    ///
    /// - `Validation` when no account code is configured for the currency
    /// - `NotFound` when the chart was never bootstrapped
    pub async fn cash_account(&self, currency: Currency) -> EngineResult<Account> {
        let code = self.chart.cash_account_codes.get(&currency).ok_or_else(|| {
            EngineError::Validation(format!("no cash account configured for {currency}"))
        })?;
        self.registry.find_by_code(code).await?.ok_or_else(|| {
            EngineError::NotFound(format!("cash account {code} (chart not bootstrapped)"))
        })
    }

    /// Resolves (or prepares) the client's liability account.
    ///
    /// Prefers the account the client document links; otherwise falls back
    /// to the code convention, and finally prepares a brand-new account.
    /// Nothing is committed here - pending writes ride the caller's batch.
    pub async fn resolve_client_liability(
        &self,
        client: &Client,
        client_revision: Revision,
    ) -> EngineResult<LiabilityResolution> {
        if let Some(account_id) = client.liability_account_id {
            let account = self.registry.get_account(account_id).await?;
            return Ok(LiabilityResolution {
                account,
                new_account: false,
                updated_client: None,
            });
        }

        let code = format!("{}{}", self.chart.client_parent_code, client.code);
        let mut updated = client.clone();

        // The account may exist from before the client document linked it.
        if let Some(account) = self.registry.find_by_code(&code).await? {
            updated.liability_account_id = Some(account.id);
            return Ok(LiabilityResolution {
                account,
                new_account: false,
                updated_client: Some((updated, client_revision)),
            });
        }

        let parent_id = self
            .registry
            .find_by_code(&self.chart.client_parent_code)
            .await?
            .map(|parent| parent.id);

        let account = Account {
            id: AccountId::new(),
            code,
            name: client.name.clone(),
            account_type: AccountType::Liabilities,
            is_group: false,
            currency: None,
            parent_id,
            closed_balance: None,
            created_at: Utc::now(),
        };
        updated.liability_account_id = Some(account.id);

        Ok(LiabilityResolution {
            account,
            new_account: true,
            updated_client: Some((updated, client_revision)),
        })
    }

    /// Seeds the default remittance chart, idempotently.
    ///
    /// Creates the asset and liability group headers, one cash/wallet
    /// account per configured currency, both suspense accounts, and the
    /// client parent group. Accounts that already exist are left alone.
    pub async fn bootstrap_chart(&self) -> EngineResult<Vec<Account>> {
        let mut created = Vec::new();

        let assets_group = self
            .ensure_account("1000", "Assets", AccountType::Assets, true, None, None, &mut created)
            .await?;
        let liabilities_group = self
            .ensure_account(
                "2000",
                "Liabilities",
                AccountType::Liabilities,
                true,
                None,
                None,
                &mut created,
            )
            .await?;

        let mut cash_codes: Vec<(&Currency, &String)> =
            self.chart.cash_account_codes.iter().collect();
        cash_codes.sort_by(|a, b| a.1.cmp(b.1));
        for (currency, code) in cash_codes {
            self.ensure_account(
                code,
                &format!("Cash {currency}"),
                AccountType::Assets,
                false,
                Some(*currency),
                Some(assets_group),
                &mut created,
            )
            .await?;
        }

        let cash_suspense_code = self.chart.cash_suspense_code.clone();
        self.ensure_account(
            &cash_suspense_code,
            "Cash suspense",
            AccountType::Liabilities,
            false,
            None,
            Some(liabilities_group),
            &mut created,
        )
        .await?;
        let usdt_suspense_code = self.chart.usdt_suspense_code.clone();
        self.ensure_account(
            &usdt_suspense_code,
            "USDT suspense",
            AccountType::Liabilities,
            false,
            None,
            Some(liabilities_group),
            &mut created,
        )
        .await?;

        let client_parent_code = self.chart.client_parent_code.clone();
        self.ensure_account(
            &client_parent_code,
            "Clients",
            AccountType::Liabilities,
            true,
            None,
            Some(liabilities_group),
            &mut created,
        )
        .await?;

        if !created.is_empty() {
            info!(count = created.len(), "bootstrapped chart accounts");
        }
        Ok(created)
    }

    #[allow(clippy::too_many_arguments)]
    async fn ensure_account(
        &self,
        code: &str,
        name: &str,
        account_type: AccountType,
        is_group: bool,
        currency: Option<Currency>,
        parent_id: Option<AccountId>,
        created: &mut Vec<Account>,
    ) -> EngineResult<AccountId> {
        if let Some(existing) = self.registry.find_by_code(code).await? {
            return Ok(existing.id);
        }
        let account = self
            .registry
            .create_account(CreateAccountInput {
                code: code.to_string(),
                name: name.to_string(),
                account_type,
                is_group,
                currency,
                parent_id,
            })
            .await?;
        let id = account.id;
        created.push(account);
        Ok(id)
    }
}
