//! Position rows supplied by the positions collaborator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::fx::Currency;

/// Asset category of a position row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetCategory {
    CashArs,
    CashUsd,
    Cedear,
    Crypto,
    Stable,
    Fci,
    Pf,
    Other,
}

impl AssetCategory {
    pub fn is_cash(&self) -> bool {
        matches!(self, AssetCategory::CashArs | AssetCategory::CashUsd)
    }

    /// Currency a cash category is denominated in.
    pub fn cash_currency(&self) -> Option<Currency> {
        match self {
            AssetCategory::CashArs => Some(Currency::Ars),
            AssetCategory::CashUsd => Some(Currency::Usd),
            _ => None,
        }
    }
}

/// Pre-aggregated metrics for one instrument held in one account.
///
/// Upstream valuations are informational: the engine recomputes every
/// value through its own FX resolution and only compares against them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRowMetrics {
    pub instrument_id: Option<String>,
    pub symbol: String,
    pub name: Option<String>,
    pub category: AssetCategory,
    pub quantity: Decimal,
    pub current_price: Option<Decimal>,
    pub avg_cost: Option<Decimal>,
    #[serde(default)]
    pub native_currency: Currency,
    pub val_ars: Option<Decimal>,
    pub val_usd: Option<Decimal>,
}

impl AssetRowMetrics {
    /// Identity of the instrument within its account.
    pub fn instrument_key(&self) -> &str {
        self.instrument_id.as_deref().unwrap_or(&self.symbol)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.symbol)
    }

    /// Currency the row is valued in. Cash categories fix it regardless of the row.
    pub fn valuation_currency(&self) -> Currency {
        self.category
            .cash_currency()
            .unwrap_or(self.native_currency)
    }

    pub fn positive_price(&self) -> Option<Decimal> {
        self.current_price.filter(|p| *p > Decimal::ZERO)
    }

    pub fn positive_avg_cost(&self) -> Option<Decimal> {
        self.avg_cost.filter(|c| *c > Decimal::ZERO)
    }
}

/// Position rows keyed by account id.
pub type GroupedPositions = BTreeMap<String, Vec<AssetRowMetrics>>;
