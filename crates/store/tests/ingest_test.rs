//! Integration tests for the SMS ingestion pipeline.

mod common;

use chrono::Utc;
use rust_decimal_macros::dec;

use hawala_core::matching::MatchOutcome;
use hawala_core::reconcile::{RecordCategory, RecordDirection, RecordStatus};
use hawala_shared::types::Currency;
use hawala_shared::{EngineConfig, EngineError};
use hawala_store::repositories::{CreateClientInput, IngestOutcome};

#[tokio::test]
async fn test_scenario_b_unmatched_credit_sms() {
    let engine = common::engine().await;
    let suspense = engine.accounts.find_by_code("2100").await.unwrap().unwrap();

    let entries_before = engine.journal.entry_count().await.unwrap();

    // No clients are registered, so the record must stay unmatched.
    let outcome = engine
        .ingest
        .ingest_sms("استلمت 5000 من محمد", Utc::now(), common::test_rates)
        .await
        .expect("ingestion succeeds");

    let IngestOutcome::Recorded {
        record,
        suspense_entry_id,
        matching,
    } = outcome
    else {
        panic!("message should parse");
    };

    assert_eq!(record.direction, RecordDirection::Inflow);
    assert_eq!(record.amount.amount, dec!(5000));
    assert_eq!(record.amount.currency, Currency::Yer);
    assert_eq!(record.amount_usd, dec!(10));
    assert_eq!(record.status, RecordStatus::Unmatched);
    assert_eq!(record.category, RecordCategory::Cash);
    assert_eq!(matching, MatchOutcome::NoMatch);

    // Exactly one suspense entry was posted.
    assert_eq!(engine.journal.entry_count().await.unwrap(), entries_before + 1);
    let entry = engine.journal.get_entry(suspense_entry_id).await.unwrap();
    assert_eq!(entry.credit_account_id, suspense.id);
    assert_eq!(
        engine.journal.compute_balance(suspense.id, None).await.unwrap().balance,
        dec!(10)
    );
}

#[tokio::test]
async fn test_exact_match_auto_assigns() {
    let engine = common::engine().await;
    let suspense = engine.accounts.find_by_code("2100").await.unwrap().unwrap();

    let client = engine
        .clients
        .create_client(CreateClientInput {
            code: "17".to_string(),
            name: "محمد".to_string(),
            phone: None,
        })
        .await
        .unwrap();

    let outcome = engine
        .ingest
        .ingest_sms("استلمت 5000 من محمد", Utc::now(), common::test_rates)
        .await
        .unwrap();

    let IngestOutcome::Recorded { record, matching, .. } = outcome else {
        panic!("message should parse");
    };

    assert_eq!(matching, MatchOutcome::Auto(client.id));
    assert_eq!(record.status, RecordStatus::Matched);
    assert_eq!(record.client_id, Some(client.id));
    assert!(record.transfer_entry_id.is_some());

    // Suspense netted to zero: in from cash, out to the client.
    assert_eq!(
        engine.journal.compute_balance(suspense.id, None).await.unwrap().balance,
        dec!(0)
    );
    let liability = engine
        .clients
        .get_client(client.id)
        .await
        .unwrap()
        .liability_account_id
        .unwrap();
    assert_eq!(
        engine.journal.compute_balance(liability, None).await.unwrap().balance,
        dec!(10)
    );
}

#[tokio::test]
async fn test_ambiguous_match_stays_unmatched() {
    let engine = common::engine().await;

    for (code, name) in [("61", "محمد احمد"), ("62", "محمد احمد")] {
        engine
            .clients
            .create_client(CreateClientInput {
                code: code.to_string(),
                name: name.to_string(),
                phone: None,
            })
            .await
            .unwrap();
    }

    let outcome = engine
        .ingest
        .ingest_sms("استلمت 5000 من محمد احمد", Utc::now(), common::test_rates)
        .await
        .unwrap();

    let IngestOutcome::Recorded { record, matching, .. } = outcome else {
        panic!("message should parse");
    };
    assert!(matches!(matching, MatchOutcome::Suggestions(hits) if hits.len() == 2));
    assert_eq!(record.status, RecordStatus::Unmatched);
}

#[tokio::test]
async fn test_parse_failure_is_persisted_not_dropped() {
    let engine = common::engine().await;

    let outcome = engine
        .ingest
        .ingest_sms("رصيدك الحالي 20000", Utc::now(), common::test_rates)
        .await
        .expect("a non-match is not an error");

    let IngestOutcome::ParseFailed { failure } = outcome else {
        panic!("expected a parse failure");
    };
    assert_eq!(failure.raw_message, "رصيدك الحالي 20000");
    assert!(!failure.resolved);

    // Nothing reached the ledger.
    assert_eq!(engine.journal.entry_count().await.unwrap(), 0);
    assert!(engine.records.list_records(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_outflow_sms_reverses_suspense_legs() {
    let engine = common::engine().await;
    let suspense = engine.accounts.find_by_code("2100").await.unwrap().unwrap();
    let cash_yer = engine.accounts.find_by_code("1110").await.unwrap().unwrap();

    let outcome = engine
        .ingest
        .ingest_sms("حولت 1500 إلى فاطمة", Utc::now(), common::test_rates)
        .await
        .unwrap();

    let IngestOutcome::Recorded {
        record,
        suspense_entry_id,
        ..
    } = outcome
    else {
        panic!("message should parse");
    };

    assert_eq!(record.direction, RecordDirection::Outflow);
    let entry = engine.journal.get_entry(suspense_entry_id).await.unwrap();
    assert_eq!(entry.debit_account_id, suspense.id);
    assert_eq!(entry.credit_account_id, cash_yer.id);

    // Outflow debits the credit-normal suspense: its balance goes negative
    // until the matching inflow or assignment arrives.
    assert_eq!(
        engine.journal.compute_balance(suspense.id, None).await.unwrap().balance,
        dec!(-3)
    );
}

#[tokio::test]
async fn test_usdt_sms_uses_stablecoin_suspense() {
    let engine = common::engine().await;
    let usdt_suspense = engine.accounts.find_by_code("2200").await.unwrap().unwrap();

    let outcome = engine
        .ingest
        .ingest_sms("Received 250.5 USDT from TXa9k2", Utc::now(), common::test_rates)
        .await
        .unwrap();

    let IngestOutcome::Recorded { record, .. } = outcome else {
        panic!("message should parse");
    };
    assert_eq!(record.category, RecordCategory::Usdt);
    assert_eq!(
        engine
            .journal
            .compute_balance(usdt_suspense.id, None)
            .await
            .unwrap()
            .balance,
        dec!(250.5)
    );
}

#[tokio::test]
async fn test_missing_rate_is_validation_error() {
    let engine = common::engine().await;

    let result = engine
        .ingest
        .ingest_sms("استلمت 5000 من محمد", Utc::now(), |_| None)
        .await;

    assert!(matches!(result, Err(EngineError::Validation(_))));
    // The atomic batch never ran: no record, no entry.
    assert_eq!(engine.journal.entry_count().await.unwrap(), 0);
    assert!(engine.records.list_records(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_blacklisted_sender_flags_record() {
    use std::sync::Arc;

    use hawala_core::sms::SmsRuleSet;
    use hawala_shared::config::MatchingConfig;
    use hawala_store::{Engine, MemoryStore};

    let config = EngineConfig {
        matching: MatchingConfig {
            blacklist_names: vec!["محمد".to_string()],
            blacklist_phones: vec![],
        },
        ..EngineConfig::default()
    };
    let store = Arc::new(MemoryStore::new());
    let engine = Engine::new(store, config, SmsRuleSet::default_rules());
    engine.bootstrap().await.unwrap();

    // A client with the exact name exists, but the blacklist short-circuits.
    engine
        .clients
        .create_client(CreateClientInput {
            code: "17".to_string(),
            name: "محمد".to_string(),
            phone: None,
        })
        .await
        .unwrap();

    let outcome = engine
        .ingest
        .ingest_sms("استلمت 5000 من محمد", Utc::now(), common::test_rates)
        .await
        .unwrap();

    let IngestOutcome::Recorded { record, matching, .. } = outcome else {
        panic!("message should parse");
    };
    assert!(matches!(matching, MatchOutcome::Blacklisted { .. }));
    assert_eq!(record.status, RecordStatus::Unmatched);
    assert!(record.flagged_reason.is_some());

    // Flagged, but still posted to suspense for the books to balance.
    assert_eq!(engine.journal.entry_count().await.unwrap(), 1);
}
