//! Ledger movement models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::fx::{Currency, FxFamily, FxSide, PositiveRate};
use crate::{errors::ValidationError, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    Buy,
    Sell,
    Deposit,
    Withdraw,
    Interest,
    TransferIn,
    TransferOut,
    BuyUsd,
    SellUsd,
}

/// How a movement changes an instrument's open lots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LotEffect {
    Add,
    Reduce,
    None,
}

impl MovementType {
    pub fn lot_effect(&self) -> LotEffect {
        match self {
            MovementType::Buy | MovementType::Deposit | MovementType::TransferIn => LotEffect::Add,
            MovementType::Sell | MovementType::Withdraw | MovementType::TransferOut => {
                LotEffect::Reduce
            }
            MovementType::Interest | MovementType::BuyUsd | MovementType::SellUsd => {
                LotEffect::None
            }
        }
    }

    /// Whether the movement is a priced trade (its unit price is a market print).
    pub fn is_trade(&self) -> bool {
        matches!(self, MovementType::Buy | MovementType::Sell)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Cedear,
    Crypto,
    Fci,
    Pf,
    Currency,
    Wallet,
}

impl AssetClass {
    /// Classes whose movements must reference an instrument.
    pub fn is_instrument(&self) -> bool {
        matches!(self, AssetClass::Cedear | AssetClass::Crypto | AssetClass::Fci)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeMode {
    Percent,
    Fixed,
}

/// Commission charged on a movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fee {
    pub mode: FeeMode,
    /// Percent of gross for `Percent`, absolute amount for `Fixed`.
    pub amount: Decimal,
    pub currency: Option<Currency>,
}

/// FX quote captured when the movement was booked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FxSnapshot {
    pub kind: FxFamily,
    pub rate: Option<Decimal>,
    pub side: FxSide,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Totals computed by the ledger when the movement was created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementTotals {
    pub gross: Option<Decimal>,
    pub net: Option<Decimal>,
    pub ars: Option<Decimal>,
    pub usd: Option<Decimal>,
}

/// An immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub asset_class: AssetClass,
    pub instrument_id: Option<String>,
    pub symbol: Option<String>,
    pub account_id: String,
    pub quantity: Decimal,
    pub unit_price: Option<Decimal>,
    pub trade_currency: Currency,
    pub fee: Option<Fee>,
    pub fx: Option<FxSnapshot>,
    #[serde(default)]
    pub totals: MovementTotals,
}

impl Movement {
    /// Instrument identity used to match movements with position rows.
    pub fn instrument_key(&self) -> Option<&str> {
        self.instrument_id.as_deref().or(self.symbol.as_deref())
    }

    pub fn lot_effect(&self) -> LotEffect {
        self.movement_type.lot_effect()
    }

    /// Trade-time FX rate, if one was captured and is usable.
    pub fn fx_at_trade(&self) -> Option<PositiveRate> {
        self.fx
            .as_ref()
            .and_then(|snapshot| PositiveRate::from_option(snapshot.rate))
    }

    /// Quantity times unit price, or the ledger's gross when no price is recorded.
    pub fn gross_amount(&self) -> Decimal {
        match self.unit_price {
            Some(price) => self.quantity * price,
            None => self.totals.gross.unwrap_or(Decimal::ZERO),
        }
    }

    /// Fee expressed in the trade currency.
    ///
    /// A fixed fee charged in the other currency is converted through the
    /// trade-time rate; without one it is ignored rather than mixed in.
    pub fn fee_amount(&self) -> Decimal {
        let Some(fee) = &self.fee else {
            return Decimal::ZERO;
        };
        match fee.mode {
            FeeMode::Percent => self.gross_amount() * fee.amount / dec!(100),
            FeeMode::Fixed => {
                let fee_currency = fee.currency.unwrap_or(self.trade_currency);
                if fee_currency == self.trade_currency {
                    fee.amount
                } else {
                    self.fx_at_trade()
                        .map(|rate| rate.convert(fee.amount, fee_currency))
                        .unwrap_or(Decimal::ZERO)
                }
            }
        }
    }

    /// Net amount in trade currency: acquisitions add the fee, disposals subtract it.
    pub fn net_amount(&self) -> Decimal {
        if let Some(net) = self.totals.net {
            return net;
        }
        let gross = self.gross_amount();
        match self.lot_effect() {
            LotEffect::Reduce => gross - self.fee_amount(),
            LotEffect::Add | LotEffect::None => gross + self.fee_amount(),
        }
    }

    /// Per-unit price actually paid (or received) including fees.
    pub fn net_unit_price(&self) -> Option<Decimal> {
        if self.quantity > Decimal::ZERO {
            Some(self.net_amount() / self.quantity)
        } else {
            None
        }
    }

    /// Validates the movement data.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "id".to_string(),
            )));
        }
        if self.account_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Movement {} has no account",
                self.id
            ))));
        }
        if self.quantity.is_sign_negative() {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Movement {} quantity cannot be negative",
                self.id
            ))));
        }
        if self.unit_price.is_some_and(|p| p.is_sign_negative()) {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Movement {} unit price cannot be negative",
                self.id
            ))));
        }
        if self.asset_class.is_instrument() && self.instrument_key().is_none() {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Movement {} moves an instrument but references none",
                self.id
            ))));
        }
        Ok(())
    }
}

impl AsRef<Movement> for Movement {
    fn as_ref(&self) -> &Movement {
        self
    }
}
