//! Fixed-term deposit (plazo fijo) models and accrual.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::constants::DAYS_PER_YEAR;
use crate::fx::Currency;
use crate::utils::time_utils::{clamped_days_elapsed, days_between};
use crate::{errors::ValidationError, Error, Result};

/// A fixed-term deposit as supplied by the deposits collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedDeposit {
    pub id: String,
    pub bank_id: String,
    pub bank_name: String,
    pub principal: Decimal,
    #[serde(default)]
    pub currency: Currency,
    /// Nominal annual rate in percent.
    pub tna: Decimal,
    pub term_days: i64,
    pub start_date: NaiveDate,
    pub maturity_date: NaiveDate,
    /// Interest promised at maturity, when the bank quoted one.
    pub expected_interest: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FixedDepositData {
    #[serde(default)]
    pub active: Vec<FixedDeposit>,
    #[serde(default)]
    pub matured: Vec<FixedDeposit>,
}

fn simple_interest(principal: Decimal, tna: Decimal, days: i64) -> Decimal {
    principal * tna / dec!(100) * Decimal::from(days) / Decimal::from(DAYS_PER_YEAR)
}

impl FixedDeposit {
    /// Days accrued as of `on`, clamped to `[0, term_days]`.
    pub fn elapsed_days(&self, on: NaiveDate) -> i64 {
        clamped_days_elapsed(self.start_date, on, self.term_days)
    }

    pub fn remaining_days(&self, on: NaiveDate) -> i64 {
        days_between(on, self.maturity_date).max(0)
    }

    pub fn accrued_interest(&self, on: NaiveDate) -> Decimal {
        simple_interest(self.principal, self.tna, self.elapsed_days(on))
    }

    /// Current value: principal plus interest accrued so far.
    pub fn current_value(&self, on: NaiveDate) -> Decimal {
        self.principal + self.accrued_interest(on)
    }

    pub fn expected_interest(&self) -> Decimal {
        self.expected_interest
            .unwrap_or_else(|| simple_interest(self.principal, self.tna, self.term_days.max(0)))
    }

    pub fn expected_payout(&self) -> Decimal {
        self.principal + self.expected_interest()
    }

    /// Validates the deposit data.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "id".to_string(),
            )));
        }
        if self.principal.is_sign_negative() && !self.principal.is_zero() {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Fixed deposit {} principal cannot be negative",
                self.id
            ))));
        }
        if self.term_days < 0 {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Fixed deposit {} term cannot be negative",
                self.id
            ))));
        }
        if self.maturity_date < self.start_date {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Fixed deposit {} matures before it starts",
                self.id
            ))));
        }
        Ok(())
    }
}
