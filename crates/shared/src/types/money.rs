//! Money type with decimal precision and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents a monetary amount with currency.
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount in native currency units.
    pub amount: Decimal,
    /// The currency of the amount.
    pub currency: Currency,
}

/// Currencies handled by the remittance desk.
///
/// `Usdt` is the stablecoin leg; everything else is fiat. Amounts in any of
/// these are carried natively on journal entry legs, with `amount_usd` as the
/// canonical cross-currency unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar
    Usd,
    /// Yemeni Rial
    Yer,
    /// Saudi Riyal
    Sar,
    /// Tether stablecoin
    Usdt,
}

impl Currency {
    /// Returns true for the stablecoin leg.
    #[must_use]
    pub const fn is_stablecoin(&self) -> bool {
        matches!(self, Self::Usdt)
    }
}

impl Money {
    /// Creates a new Money instance.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usd => write!(f, "USD"),
            Self::Yer => write!(f, "YER"),
            Self::Sar => write!(f, "SAR"),
            Self::Usdt => write!(f, "USDT"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "YER" => Ok(Self::Yer),
            "SAR" => Ok(Self::Sar),
            "USDT" => Ok(Self::Usdt),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_money_new() {
        let money = Money::new(dec!(5000), Currency::Yer);
        assert_eq!(money.amount, dec!(5000));
        assert_eq!(money.currency, Currency::Yer);
    }

    #[test]
    fn test_money_zero() {
        let money = Money::zero(Currency::Usd);
        assert!(money.is_zero());
        assert!(!money.is_positive());
    }

    #[test]
    fn test_money_is_positive() {
        assert!(Money::new(dec!(10), Currency::Usd).is_positive());
        assert!(!Money::new(dec!(-10), Currency::Usd).is_positive());
    }

    #[test]
    fn test_currency_display() {
        assert_eq!(Currency::Usd.to_string(), "USD");
        assert_eq!(Currency::Yer.to_string(), "YER");
        assert_eq!(Currency::Sar.to_string(), "SAR");
        assert_eq!(Currency::Usdt.to_string(), "USDT");
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!(Currency::from_str("USD").unwrap(), Currency::Usd);
        assert_eq!(Currency::from_str("yer").unwrap(), Currency::Yer);
        assert_eq!(Currency::from_str("usdt").unwrap(), Currency::Usdt);
        assert!(Currency::from_str("XXX").is_err());
        assert!(Currency::from_str("").is_err());
    }

    #[test]
    fn test_stablecoin_flag() {
        assert!(Currency::Usdt.is_stablecoin());
        assert!(!Currency::Yer.is_stablecoin());
    }
}
