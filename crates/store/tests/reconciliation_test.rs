//! Integration tests for the suspense reconciliation protocol.

mod common;

use chrono::Utc;
use rust_decimal_macros::dec;

use hawala_core::ledger::PostEntryInput;
use hawala_core::reconcile::RecordStatus;
use hawala_shared::types::{ClientId, Currency, Money, RecordId};
use hawala_shared::EngineError;
use hawala_store::repositories::{CreateClientInput, IngestOutcome};
use hawala_store::Engine;

fn usd(amount: rust_decimal::Decimal) -> Money {
    Money::new(amount, Currency::Usd)
}

/// Creates an unmatched $10 USDT record through ingestion (no clients are
/// registered at that point, so nothing auto-assigns).
async fn seed_unmatched_record(engine: &Engine) -> RecordId {
    let outcome = engine
        .ingest
        .ingest_sms("Received 10 USDT from tx-feed", Utc::now(), common::test_rates)
        .await
        .expect("ingestion succeeds");

    match outcome {
        IngestOutcome::Recorded { record, .. } => record.id,
        IngestOutcome::ParseFailed { .. } => panic!("message should parse"),
    }
}

#[tokio::test]
async fn test_scenario_a_assignment_moves_suspense_to_client() {
    let engine = common::engine().await;
    let bank = engine.accounts.find_by_code("1210").await.unwrap().unwrap();
    let suspense = engine.accounts.find_by_code("2100").await.unwrap().unwrap();

    // Post entry debit=Bank, credit=Suspense, $10.
    engine
        .journal
        .post_entry(PostEntryInput {
            date: Utc::now(),
            description: "Cash deposit".to_string(),
            debit_account_id: bank.id,
            credit_account_id: suspense.id,
            debit_amount: usd(dec!(10)),
            credit_amount: usd(dec!(10)),
            amount_usd: dec!(10),
        })
        .await
        .unwrap();
    assert_eq!(
        engine.journal.compute_balance(suspense.id, None).await.unwrap().balance,
        dec!(10)
    );

    // An unmatched cash record for the same $10.
    let client = engine
        .clients
        .create_client(CreateClientInput {
            code: "17".to_string(),
            name: "Mohammed Saleh".to_string(),
            phone: None,
        })
        .await
        .unwrap();

    let outcome = engine
        .ingest
        .ingest_parsed(
            hawala_core::sms::ParsedSms {
                direction: hawala_core::reconcile::RecordDirection::Inflow,
                amount: dec!(10),
                currency: Currency::Usd,
                person: "unknown sender".to_string(),
            },
            hawala_core::reconcile::RecordSource::Manual,
            Utc::now(),
            common::test_rates,
        )
        .await
        .unwrap();
    let IngestOutcome::Recorded { record, .. } = outcome else {
        panic!("expected a recorded movement");
    };
    // Ingestion itself posted cash -> suspense, so suspense now holds $20.
    assert_eq!(
        engine.journal.compute_balance(suspense.id, None).await.unwrap().balance,
        dec!(20)
    );

    let matched = engine
        .reconciliation
        .assign_record_to_client(record.id, client.id)
        .await
        .expect("assignment succeeds");

    assert_eq!(matched.status, RecordStatus::Matched);
    assert_eq!(matched.client_id, Some(client.id));
    assert!(matched.transfer_entry_id.is_some());
    assert_eq!(matched.balance_before, Some(dec!(0)));
    assert_eq!(matched.balance_after, Some(dec!(10)));

    // The transfer moved $10 suspense -> client.
    assert_eq!(
        engine.journal.compute_balance(suspense.id, None).await.unwrap().balance,
        dec!(10)
    );
    let liability = engine
        .clients
        .get_client(client.id)
        .await
        .unwrap()
        .liability_account_id
        .expect("liability account linked");
    assert_eq!(
        engine.journal.compute_balance(liability, None).await.unwrap().balance,
        dec!(10)
    );
}

#[tokio::test]
async fn test_second_assignment_conflicts_without_double_posting() {
    let engine = common::engine().await;
    let record_id = seed_unmatched_record(&engine).await;

    let client = engine
        .clients
        .create_client(CreateClientInput {
            code: "21".to_string(),
            name: "Fatima Nasser".to_string(),
            phone: None,
        })
        .await
        .unwrap();

    engine
        .reconciliation
        .assign_record_to_client(record_id, client.id)
        .await
        .expect("first assignment succeeds");
    let entries_after_first = engine.journal.entry_count().await.unwrap();

    let result = engine
        .reconciliation
        .assign_record_to_client(record_id, client.id)
        .await;

    assert!(matches!(result, Err(EngineError::Conflict(_))));
    // At most one transfer per record: the journal did not grow.
    assert_eq!(engine.journal.entry_count().await.unwrap(), entries_after_first);
}

#[tokio::test]
async fn test_concurrent_assignments_post_exactly_one_transfer() {
    let engine = common::engine().await;
    let record_id = seed_unmatched_record(&engine).await;

    let client_a = engine
        .clients
        .create_client(CreateClientInput {
            code: "31".to_string(),
            name: "Ali Hassan".to_string(),
            phone: None,
        })
        .await
        .unwrap();
    let client_b = engine
        .clients
        .create_client(CreateClientInput {
            code: "32".to_string(),
            name: "Salim Omar".to_string(),
            phone: None,
        })
        .await
        .unwrap();

    let entries_before = engine.journal.entry_count().await.unwrap();

    let (left, right) = tokio::join!(
        engine.reconciliation.assign_record_to_client(record_id, client_a.id),
        engine.reconciliation.assign_record_to_client(record_id, client_b.id),
    );

    // Exactly one of the two racing assignments commits.
    let successes = [&left, &right].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    for result in [left, right] {
        if let Err(err) = result {
            assert_eq!(err.error_code(), "CONFLICT");
        }
    }
    assert_eq!(engine.journal.entry_count().await.unwrap(), entries_before + 1);
}

#[tokio::test]
async fn test_round_trip_restores_balances() {
    let engine = common::engine().await;
    let suspense = engine.accounts.find_by_code("2200").await.unwrap().unwrap();
    let record_id = seed_unmatched_record(&engine).await;

    let client = engine
        .clients
        .create_client(CreateClientInput {
            code: "41".to_string(),
            name: "Huda Saeed".to_string(),
            phone: None,
        })
        .await
        .unwrap();

    let suspense_before = engine
        .journal
        .compute_balance(suspense.id, None)
        .await
        .unwrap()
        .balance;

    engine
        .reconciliation
        .assign_record_to_client(record_id, client.id)
        .await
        .unwrap();

    let liability = engine
        .clients
        .get_client(client.id)
        .await
        .unwrap()
        .liability_account_id
        .unwrap();

    let restored = engine
        .reconciliation
        .unassign_record(record_id)
        .await
        .expect("unassignment succeeds");

    assert_eq!(restored.status, RecordStatus::Unmatched);
    assert!(restored.client_id.is_none());
    assert!(restored.transfer_entry_id.is_none());

    // Both balances are back where they started; the journal kept both
    // the transfer and its reversal.
    assert_eq!(
        engine.journal.compute_balance(suspense.id, None).await.unwrap().balance,
        suspense_before
    );
    assert_eq!(
        engine.journal.compute_balance(liability, None).await.unwrap().balance,
        dec!(0)
    );

    // The record can be matched again afterwards.
    engine
        .reconciliation
        .assign_record_to_client(record_id, client.id)
        .await
        .expect("re-assignment succeeds");
}

#[tokio::test]
async fn test_unassign_unmatched_record_is_not_found() {
    let engine = common::engine().await;
    let record_id = seed_unmatched_record(&engine).await;

    let result = engine.reconciliation.unassign_record(record_id).await;
    assert!(matches!(result, Err(EngineError::NotFound(_))));
}

#[tokio::test]
async fn test_assign_missing_record_or_client_is_not_found() {
    let engine = common::engine().await;
    let record_id = seed_unmatched_record(&engine).await;

    let result = engine
        .reconciliation
        .assign_record_to_client(RecordId::new(), ClientId::new())
        .await;
    assert!(matches!(result, Err(EngineError::NotFound(_))));

    let result = engine
        .reconciliation
        .assign_record_to_client(record_id, ClientId::new())
        .await;
    assert!(matches!(result, Err(EngineError::NotFound(_))));
}

#[tokio::test]
async fn test_terminal_transitions() {
    let engine = common::engine().await;
    let record_id = seed_unmatched_record(&engine).await;

    // Unmatched records cannot be marked used.
    let result = engine.records.mark_record_used(record_id).await;
    assert!(matches!(result, Err(EngineError::Validation(_))));

    let client = engine
        .clients
        .create_client(CreateClientInput {
            code: "51".to_string(),
            name: "Nadia Qasim".to_string(),
            phone: None,
        })
        .await
        .unwrap();
    engine
        .reconciliation
        .assign_record_to_client(record_id, client.id)
        .await
        .unwrap();

    let used = engine.records.mark_record_used(record_id).await.unwrap();
    assert_eq!(used.status, RecordStatus::Used);
    assert!(used.status.is_terminal());

    // Terminal records cannot be unassigned.
    let result = engine.reconciliation.unassign_record(record_id).await;
    assert!(matches!(result, Err(EngineError::Validation(_))));
}

#[tokio::test]
async fn test_cancel_unmatched_record() {
    let engine = common::engine().await;
    let record_id = seed_unmatched_record(&engine).await;

    let cancelled = engine.records.cancel_record(record_id).await.unwrap();
    assert_eq!(cancelled.status, RecordStatus::Cancelled);

    // Cancelled is terminal: no assignment afterwards.
    let client = engine
        .clients
        .create_client(CreateClientInput {
            code: "61".to_string(),
            name: "Omar Zaid".to_string(),
            phone: None,
        })
        .await
        .unwrap();
    let result = engine
        .reconciliation
        .assign_record_to_client(record_id, client.id)
        .await;
    assert!(matches!(result, Err(EngineError::Validation(_))));
}
