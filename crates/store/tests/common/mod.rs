//! Shared test fixtures: an engine over a fresh in-memory store.
#![allow(dead_code)]

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use hawala_core::sms::SmsRuleSet;
use hawala_shared::types::Currency;
use hawala_shared::EngineConfig;
use hawala_store::{Engine, MemoryStore};

/// Builds a bootstrapped engine over an empty in-memory store.
pub async fn engine() -> Engine {
    let store = Arc::new(MemoryStore::new());
    let engine = Engine::new(store, EngineConfig::default(), SmsRuleSet::default_rules());
    engine.bootstrap().await.expect("bootstrap succeeds");
    engine
}

/// Fixed conversion factors for tests: 5000 YER = 10 USD.
pub fn test_rates(currency: Currency) -> Option<Decimal> {
    match currency {
        Currency::Usd => Some(Decimal::ONE),
        Currency::Yer => Some(dec!(0.002)),
        Currency::Sar => Some(dec!(0.2666)),
        Currency::Usdt => Some(Decimal::ONE),
    }
}
