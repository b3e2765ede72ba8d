//! Account domain models.

use chrono::NaiveDate;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::constants::DAYS_PER_YEAR;
use crate::fx::Currency;
use crate::{errors::ValidationError, Error, Result};

/// Institution type of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountKind {
    Wallet,
    Bank,
    Broker,
    Exchange,
    #[default]
    Other,
}

/// Effective classification of an account for rubro membership and cash FX.
///
/// Derived from the account kind unless account settings force another class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountClass {
    Wallet,
    Broker,
    Exchange,
    /// Yield jar. Only reachable through an explicit settings override.
    Frasco,
}

impl AccountClass {
    pub fn from_kind(kind: AccountKind) -> Self {
        match kind {
            AccountKind::Broker => AccountClass::Broker,
            AccountKind::Exchange => AccountClass::Exchange,
            AccountKind::Wallet | AccountKind::Bank | AccountKind::Other => AccountClass::Wallet,
        }
    }

    /// Broker and exchange cash is carved out into the Wallets rubro.
    pub fn is_investment_venue(&self) -> bool {
        matches!(self, AccountClass::Broker | AccountClass::Exchange)
    }
}

/// How a nominal annual rate compounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Compounding {
    #[default]
    Daily,
    Monthly,
    Simple,
}

impl Compounding {
    pub fn periods_per_year(&self) -> Option<i64> {
        match self {
            Compounding::Daily => Some(DAYS_PER_YEAR),
            Compounding::Monthly => Some(12),
            Compounding::Simple => None,
        }
    }
}

/// Effective annual rate (TEA, percent) from a nominal annual rate (TNA, percent).
pub fn tea_from_tna(tna: Decimal, compounding: Compounding) -> Decimal {
    let Some(periods) = compounding.periods_per_year() else {
        return tna;
    };
    let base = Decimal::ONE + tna / dec!(100) / Decimal::from(periods);
    match base.checked_powi(periods) {
        Some(growth) => (growth - Decimal::ONE) * dec!(100),
        None => tna,
    }
}

/// Interest configuration for yield-bearing cash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashYieldConfig {
    pub enabled: bool,
    /// Nominal annual rate in percent (e.g. `35` for 35%).
    pub tna: Decimal,
    pub currency: Currency,
    #[serde(default)]
    pub compounding: Compounding,
    pub last_accrual_date: Option<NaiveDate>,
}

/// Domain model representing an account in the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub kind: AccountKind,
    #[serde(default)]
    pub default_currency: Currency,
    pub cash_yield: Option<CashYieldConfig>,
}

impl Account {
    /// Placeholder for positions that reference an account the caller did not supply.
    pub fn placeholder(id: &str) -> Self {
        Account {
            id: id.to_string(),
            name: id.to_string(),
            kind: AccountKind::Other,
            default_currency: Currency::Ars,
            cash_yield: None,
        }
    }

    /// Active yield configuration for cash held in `currency`.
    pub fn yield_for(&self, currency: Currency) -> Option<&CashYieldConfig> {
        self.cash_yield
            .as_ref()
            .filter(|config| config.enabled && config.currency == currency)
    }

    /// Validates the account data.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "id".to_string(),
            )));
        }
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Account {} name cannot be empty",
                self.id
            ))));
        }
        if let Some(config) = &self.cash_yield {
            if config.tna.is_sign_negative() {
                return Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "Account {} yield TNA cannot be negative",
                    self.id
                ))));
            }
        }
        Ok(())
    }
}
