//! Engine facade wiring the services over one store.

use std::sync::Arc;

use hawala_core::matching::Matcher;
use hawala_core::sms::SmsRuleSet;
use hawala_shared::{EngineConfig, EngineResult};

use crate::catalog::AccountCatalog;
use crate::document::DocumentStore;
use crate::repositories::{
    AccountRegistry, ClientRepository, IngestService, JournalLedger, PeriodService,
    ReconciliationService, RecordRepository,
};

/// All engine services over a shared document store.
#[derive(Clone)]
pub struct Engine {
    /// Chart-of-accounts registry.
    pub accounts: AccountRegistry,
    /// Client repository.
    pub clients: ClientRepository,
    /// Journal ledger.
    pub journal: JournalLedger,
    /// Money record repository.
    pub records: RecordRepository,
    /// Suspense reconciliation protocol.
    pub reconciliation: ReconciliationService,
    /// Period closing service.
    pub periods: PeriodService,
    /// SMS ingestion pipeline.
    pub ingest: IngestService,
    catalog: AccountCatalog,
}

impl Engine {
    /// Wires the engine over a store with the given configuration and rule
    /// set.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, config: EngineConfig, rules: SmsRuleSet) -> Self {
        let accounts = AccountRegistry::new(Arc::clone(&store));
        let clients = ClientRepository::new(Arc::clone(&store));
        let journal = JournalLedger::new(Arc::clone(&store), accounts.clone());
        let records = RecordRepository::new(Arc::clone(&store));
        let catalog = AccountCatalog::new(accounts.clone(), config.chart.clone());
        let reconciliation = ReconciliationService::new(
            Arc::clone(&store),
            journal.clone(),
            clients.clone(),
            records.clone(),
            catalog.clone(),
        );
        let periods = PeriodService::new(Arc::clone(&store), accounts.clone(), journal.clone());
        let matcher = Matcher::new(&config.matching);
        let ingest = IngestService::new(
            Arc::clone(&store),
            rules,
            matcher,
            catalog.clone(),
            journal.clone(),
            clients.clone(),
            reconciliation.clone(),
        );

        Self {
            accounts,
            clients,
            journal,
            records,
            reconciliation,
            periods,
            ingest,
            catalog,
        }
    }

    /// Seeds the default chart of accounts, idempotently.
    pub async fn bootstrap(&self) -> EngineResult<()> {
        self.catalog.bootstrap_chart().await?;
        Ok(())
    }
}
