//! Engine configuration management.

use std::collections::HashMap;

use serde::Deserialize;

use crate::types::Currency;

/// Engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Chart-of-accounts conventions.
    #[serde(default)]
    pub chart: ChartConfig,
    /// Client matching configuration.
    #[serde(default)]
    pub matching: MatchingConfig,
}

/// Account-code conventions for the default remittance chart.
///
/// The codes here are the single place where the naming convention lives;
/// everything else resolves accounts through the catalog, never by
/// concatenating strings.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    /// Code of the suspense account holding unattributed fiat funds.
    #[serde(default = "default_cash_suspense_code")]
    pub cash_suspense_code: String,
    /// Code of the suspense account holding unattributed stablecoin funds.
    #[serde(default = "default_usdt_suspense_code")]
    pub usdt_suspense_code: String,
    /// Code prefix under which per-client liability accounts are created.
    #[serde(default = "default_client_parent_code")]
    pub client_parent_code: String,
    /// Cash/wallet asset account code per currency.
    #[serde(default = "default_cash_account_codes")]
    pub cash_account_codes: HashMap<Currency, String>,
}

fn default_cash_suspense_code() -> String {
    "2100".to_string()
}

fn default_usdt_suspense_code() -> String {
    "2200".to_string()
}

fn default_client_parent_code() -> String {
    "6000".to_string()
}

fn default_cash_account_codes() -> HashMap<Currency, String> {
    HashMap::from([
        (Currency::Yer, "1110".to_string()),
        (Currency::Sar, "1120".to_string()),
        (Currency::Usd, "1210".to_string()),
        (Currency::Usdt, "1510".to_string()),
    ])
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            cash_suspense_code: default_cash_suspense_code(),
            usdt_suspense_code: default_usdt_suspense_code(),
            client_parent_code: default_client_parent_code(),
            cash_account_codes: default_cash_account_codes(),
        }
    }
}

/// Client matching configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingConfig {
    /// Sender names that must never auto-match.
    #[serde(default)]
    pub blacklist_names: Vec<String>,
    /// Sender phone numbers that must never auto-match.
    #[serde(default)]
    pub blacklist_phones: Vec<String>,
}

impl EngineConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("HAWALA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chart: ChartConfig::default(),
            matching: MatchingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chart_codes() {
        let chart = ChartConfig::default();
        assert_eq!(chart.cash_suspense_code, "2100");
        assert_eq!(chart.usdt_suspense_code, "2200");
        assert_eq!(chart.client_parent_code, "6000");
        assert_eq!(chart.cash_account_codes[&Currency::Yer], "1110");
        assert_eq!(chart.cash_account_codes[&Currency::Usdt], "1510");
    }

    #[test]
    fn test_load_with_defaults() {
        temp_env::with_vars_unset(["RUN_MODE"], || {
            let config = EngineConfig::load().expect("defaults should load");
            assert_eq!(config.chart.cash_suspense_code, "2100");
            assert!(config.matching.blacklist_names.is_empty());
        });
    }

    #[test]
    fn test_env_override() {
        temp_env::with_var("HAWALA__CHART__CASH_SUSPENSE_CODE", Some("2900"), || {
            let config = EngineConfig::load().expect("config should load");
            assert_eq!(config.chart.cash_suspense_code, "2900");
        });
    }
}
