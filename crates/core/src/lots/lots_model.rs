use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fx::{Currency, PositiveRate};

/// An open acquisition batch. Derived on every computation, never persisted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    /// Id of the movement that opened the lot.
    pub id: String,
    pub trade_date: DateTime<Utc>,
    pub quantity: Decimal,
    /// Cost per unit in the trade currency, fees included.
    pub unit_cost: Decimal,
    pub currency: Currency,
    /// ARS per USD at trade time.
    pub fx_at_trade: Option<PositiveRate>,
    /// Set when the trade carried no usable FX rate; consumers must use a current rate.
    pub fx_missing: bool,
}

impl Lot {
    pub fn cost_native(&self) -> Decimal {
        self.quantity * self.unit_cost
    }
}

/// Cost relieved by one disposal.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RealizedSale {
    pub movement_id: String,
    pub date: DateTime<Utc>,
    pub quantity: Decimal,
    pub cost_native: Decimal,
    pub proceeds_native: Decimal,
    pub pnl_native: Decimal,
}

/// Data-consistency problems found while replaying a position.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FifoWarning {
    /// A disposal asked for more than was open; the excess was ignored.
    Oversold {
        movement_id: String,
        requested: Decimal,
        available: Decimal,
    },
    /// An acquisition with zero or negative quantity was skipped.
    NonPositiveQuantity { movement_id: String },
}

/// Open lots of a position after replaying its movements.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FifoResult {
    /// Sorted by trade date, oldest first.
    pub lots: Vec<Lot>,
    pub total_quantity: Decimal,
    pub total_cost_native: Decimal,
    pub realized: Vec<RealizedSale>,
    pub warnings: Vec<FifoWarning>,
}

impl FifoResult {
    pub fn average_cost(&self) -> Option<Decimal> {
        if self.total_quantity > Decimal::ZERO {
            Some(self.total_cost_native / self.total_quantity)
        } else {
            None
        }
    }
}
