//! SMS ingestion pipeline.
//!
//! raw message -> ordered pattern rules -> money record posted to suspense
//! -> client matching -> (auto-)assignment. Messages no rule understands
//! become persisted parse failures; they are never silently dropped.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use hawala_core::ledger::PostEntryInput;
use hawala_core::matching::{MatchOutcome, MatchQuery, Matcher};
use hawala_core::reconcile::{MoneyRecord, RecordDirection, RecordSource};
use hawala_core::sms::{ParseFailure, ParseOutcome, ParsedSms, SmsRuleSet};
use hawala_shared::types::{Currency, EntryId, Money};
use hawala_shared::{EngineError, EngineResult};

use crate::catalog::AccountCatalog;
use crate::document::{DocumentStore, WriteBatch};
use crate::paths;
use crate::repositories::client::ClientRepository;
use crate::repositories::journal::JournalLedger;
use crate::repositories::reconciliation::ReconciliationService;

/// What ingestion did with one message.
#[derive(Debug, Clone)]
pub enum IngestOutcome {
    /// No rule matched; the failure document awaits manual resolution.
    ParseFailed {
        /// The persisted failure.
        failure: ParseFailure,
    },
    /// A record was created and posted to suspense.
    Recorded {
        /// The record, matched when auto-assignment fired.
        record: MoneyRecord,
        /// The suspense entry posted with the record.
        suspense_entry_id: EntryId,
        /// How matching went.
        matching: MatchOutcome,
    },
}

/// Turns raw messages into suspense-posted records.
#[derive(Clone)]
pub struct IngestService {
    store: Arc<dyn DocumentStore>,
    rules: SmsRuleSet,
    matcher: Matcher,
    catalog: AccountCatalog,
    journal: JournalLedger,
    clients: ClientRepository,
    reconciliation: ReconciliationService,
}

impl IngestService {
    /// Creates the pipeline.
    #[must_use]
    pub fn new(
        store: Arc<dyn DocumentStore>,
        rules: SmsRuleSet,
        matcher: Matcher,
        catalog: AccountCatalog,
        journal: JournalLedger,
        clients: ClientRepository,
        reconciliation: ReconciliationService,
    ) -> Self {
        Self {
            store,
            rules,
            matcher,
            catalog,
            journal,
            clients,
            reconciliation,
        }
    }

    /// Ingests one raw SMS.
    ///
    /// `rate_lookup` supplies the USD conversion factor per currency; the
    /// engine manages no FX rates of its own. USD itself never consults it.
    ///
    /// # Errors
    ///
    /// - `Validation` when a matched message has no USD rate
    /// - `Store` on persistence failure (safe to retry; the record and its
    ///   suspense entry land together or not at all)
    pub async fn ingest_sms<F>(
        &self,
        raw: &str,
        received_at: DateTime<Utc>,
        rate_lookup: F,
    ) -> EngineResult<IngestOutcome>
    where
        F: Fn(Currency) -> Option<Decimal>,
    {
        match self.rules.parse(raw) {
            ParseOutcome::NoMatch => {
                let failure = ParseFailure::new(raw, received_at);
                let mut batch = WriteBatch::new();
                batch.create(paths::parse_failure(failure.id), &failure)?;
                self.store.commit(batch).await?;

                warn!(failure_id = %failure.id, "message matched no rule");
                Ok(IngestOutcome::ParseFailed { failure })
            }
            ParseOutcome::Parsed { rule, sms } => {
                info!(rule = %rule, "parsed message");
                self.record_movement(sms, RecordSource::Sms { raw: raw.to_string() }, received_at, rate_lookup)
                    .await
            }
        }
    }

    /// Ingests an already-extracted movement (e.g. from the OCR/NLP
    /// collaborators). The input is untrusted and validated here.
    ///
    /// # Errors
    ///
    /// - `Validation` for a non-positive amount, empty person, or missing
    ///   USD rate
    pub async fn ingest_parsed<F>(
        &self,
        sms: ParsedSms,
        source: RecordSource,
        received_at: DateTime<Utc>,
        rate_lookup: F,
    ) -> EngineResult<IngestOutcome>
    where
        F: Fn(Currency) -> Option<Decimal>,
    {
        self.record_movement(sms, source, received_at, rate_lookup)
            .await
    }

    async fn record_movement<F>(
        &self,
        sms: ParsedSms,
        source: RecordSource,
        received_at: DateTime<Utc>,
        rate_lookup: F,
    ) -> EngineResult<IngestOutcome>
    where
        F: Fn(Currency) -> Option<Decimal>,
    {
        sms.validate()?;

        let rate = if sms.currency == Currency::Usd {
            Decimal::ONE
        } else {
            rate_lookup(sms.currency).ok_or_else(|| {
                EngineError::Validation(format!("no USD rate for {}", sms.currency))
            })?
        };
        let amount_usd = (sms.amount * rate).round_dp(4);

        let mut record = MoneyRecord::new(
            received_at,
            Money::new(sms.amount, sms.currency),
            sms.direction,
            amount_usd,
            source,
        );

        let cash = self.catalog.cash_account(sms.currency).await?;
        let suspense = self.catalog.suspense_account(record.category).await?;
        let (debit, credit, description) = match sms.direction {
            RecordDirection::Inflow => (
                &cash,
                &suspense,
                format!("Received {} {} from {}", sms.amount, sms.currency, sms.person),
            ),
            RecordDirection::Outflow => (
                &suspense,
                &cash,
                format!("Sent {} {} to {}", sms.amount, sms.currency, sms.person),
            ),
        };

        let entry = self
            .journal
            .validated_entry(PostEntryInput {
                date: received_at,
                description,
                debit_account_id: debit.id,
                credit_account_id: credit.id,
                debit_amount: record.amount,
                credit_amount: record.amount,
                amount_usd,
            })
            .await?;

        // Matching runs before the commit so a blacklist hit lands on the
        // record in the same atomic batch as its suspense entry.
        let known_clients = self.clients.list_clients().await?;
        let matching = self.matcher.match_client(
            &MatchQuery {
                person: &sms.person,
                amount: sms.amount,
                currency: sms.currency,
                direction: sms.direction,
            },
            &known_clients,
        );
        if let MatchOutcome::Blacklisted { reason } = &matching {
            warn!(record_id = %record.id, %reason, "counterparty blacklisted");
            record.flagged_reason = Some(reason.clone());
        }

        let mut batch = WriteBatch::new();
        batch.create(paths::record(record.id), &record)?;
        batch.create(paths::journal_entry(entry.id), &entry)?;
        self.store.commit(batch).await?;

        info!(
            record_id = %record.id,
            entry_id = %entry.id,
            amount_usd = %amount_usd,
            "recorded movement in suspense"
        );

        // Exactly one high-confidence candidate: assign through the
        // protocol. Its own conditional batch guards the race where an
        // operator assigns the record first.
        let record = if let MatchOutcome::Auto(client_id) = &matching {
            self.reconciliation
                .assign_record_to_client(record.id, *client_id)
                .await?
        } else {
            record
        };

        Ok(IngestOutcome::Recorded {
            record,
            suspense_entry_id: entry.id,
            matching,
        })
    }
}
