//! Account types and balance sign conventions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use hawala_shared::types::{AccountId, Currency};

/// Account classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Cash, bank, and wallet accounts.
    Assets,
    /// Funds owed to others, including suspense and client accounts.
    Liabilities,
    /// Owner equity.
    Equity,
    /// Revenue accounts.
    Income,
    /// Expense accounts.
    Expenses,
}

impl AccountType {
    /// Returns the normal balance side for this account type.
    ///
    /// The sign convention is a per-type property, never a global rule:
    /// asset and expense accounts grow on the debit side, liability, equity,
    /// and income accounts grow on the credit side. Suspense and client
    /// accounts are liabilities, so a credit increases them.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Assets | Self::Expenses => NormalBalance::Debit,
            Self::Liabilities | Self::Equity | Self::Income => NormalBalance::Credit,
        }
    }
}

/// The side on which an account's balance grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Debit-normal (Assets, Expenses): balance += debit - credit.
    Debit,
    /// Credit-normal (Liabilities, Equity, Income): balance += credit - debit.
    Credit,
}

impl NormalBalance {
    /// Calculates the balance change contributed by one entry.
    #[must_use]
    pub fn balance_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// A chart-of-accounts entry.
///
/// Group accounts structure the chart and never receive postings directly;
/// the registry is the single source of truth for the `is_group` flag and the
/// ledger enforces it at posting time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Account code, unique within the chart (e.g. "2100").
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Whether this is a group header rather than a postable leaf.
    pub is_group: bool,
    /// Native currency, when the account is single-currency.
    pub currency: Option<Currency>,
    /// Parent group account, when nested.
    pub parent_id: Option<AccountId>,
    /// Balance snapshot persisted by the last period close. Audit data only;
    /// live balances are always derived from entries.
    pub closed_balance: Option<Decimal>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Returns true if journal entries may post to this account.
    #[must_use]
    pub fn is_postable(&self) -> bool {
        !self.is_group
    }

    /// Returns the normal balance side of this account.
    #[must_use]
    pub fn normal_balance(&self) -> NormalBalance {
        self.account_type.normal_balance()
    }
}

/// Filter options for listing accounts.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Filter by group flag.
    pub is_group: Option<bool>,
    /// Filter by account type.
    pub account_type: Option<AccountType>,
    /// Filter by currency.
    pub currency: Option<Currency>,
}

impl AccountFilter {
    /// Returns true if the account passes this filter.
    #[must_use]
    pub fn matches(&self, account: &Account) -> bool {
        if let Some(is_group) = self.is_group {
            if account.is_group != is_group {
                return false;
            }
        }
        if let Some(account_type) = self.account_type {
            if account.account_type != account_type {
                return false;
            }
        }
        if let Some(currency) = self.currency {
            if account.currency != Some(currency) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make_account(account_type: AccountType, is_group: bool) -> Account {
        Account {
            id: AccountId::new(),
            code: "9999".to_string(),
            name: "Test".to_string(),
            account_type,
            is_group,
            currency: None,
            parent_id: None,
            closed_balance: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_normal_balance_per_type() {
        assert_eq!(AccountType::Assets.normal_balance(), NormalBalance::Debit);
        assert_eq!(AccountType::Expenses.normal_balance(), NormalBalance::Debit);
        assert_eq!(
            AccountType::Liabilities.normal_balance(),
            NormalBalance::Credit
        );
        assert_eq!(AccountType::Equity.normal_balance(), NormalBalance::Credit);
        assert_eq!(AccountType::Income.normal_balance(), NormalBalance::Credit);
    }

    #[test]
    fn test_debit_normal_balance_change() {
        let side = NormalBalance::Debit;
        assert_eq!(side.balance_change(dec!(100), dec!(0)), dec!(100));
        assert_eq!(side.balance_change(dec!(0), dec!(50)), dec!(-50));
        assert_eq!(side.balance_change(dec!(100), dec!(30)), dec!(70));
    }

    #[test]
    fn test_credit_normal_balance_change() {
        let side = NormalBalance::Credit;
        assert_eq!(side.balance_change(dec!(0), dec!(100)), dec!(100));
        assert_eq!(side.balance_change(dec!(50), dec!(0)), dec!(-50));
        assert_eq!(side.balance_change(dec!(30), dec!(100)), dec!(70));
    }

    #[test]
    fn test_group_accounts_not_postable() {
        assert!(!make_account(AccountType::Liabilities, true).is_postable());
        assert!(make_account(AccountType::Liabilities, false).is_postable());
    }

    #[test]
    fn test_filter_matches() {
        let account = make_account(AccountType::Assets, false);

        assert!(AccountFilter::default().matches(&account));
        assert!(
            AccountFilter {
                account_type: Some(AccountType::Assets),
                ..Default::default()
            }
            .matches(&account)
        );
        assert!(
            !AccountFilter {
                is_group: Some(true),
                ..Default::default()
            }
            .matches(&account)
        );
        assert!(
            !AccountFilter {
                currency: Some(hawala_shared::types::Currency::Usd),
                ..Default::default()
            }
            .matches(&account)
        );
    }
}
