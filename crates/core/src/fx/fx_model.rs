use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::Currency;

/// Exchange-rate regime of the Argentine multi-rate market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FxFamily {
    Oficial,
    Mep,
    Ccl,
    Cripto,
}

impl FxFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            FxFamily::Oficial => "OFICIAL",
            FxFamily::Mep => "MEP",
            FxFamily::Ccl => "CCL",
            FxFamily::Cripto => "CRIPTO",
        }
    }
}

impl fmt::Display for FxFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quote side. `Buy` is the bid (what a dealer pays for USD), `Sell` the ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FxSide {
    Buy,
    Sell,
}

/// Direction of a valuation conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConversionDirection {
    /// A USD amount valued in ARS: the holder would sell USD.
    UsdToArs,
    /// An ARS amount expressed in USD: the holder would buy USD.
    ArsToUsd,
}

impl ConversionDirection {
    /// Direction needed to value an amount held in `native` currency.
    pub fn from_native(native: Currency) -> Self {
        match native {
            Currency::Usd => ConversionDirection::UsdToArs,
            Currency::Ars => ConversionDirection::ArsToUsd,
        }
    }

    pub fn side(&self) -> FxSide {
        match self {
            ConversionDirection::UsdToArs => FxSide::Sell,
            ConversionDirection::ArsToUsd => FxSide::Buy,
        }
    }
}

/// A strictly positive ARS-per-USD rate.
///
/// There is no way to build one from zero, a negative number or a missing
/// quote, so "no rate" is always an explicit `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct PositiveRate(Decimal);

impl PositiveRate {
    pub fn new(value: Decimal) -> Option<Self> {
        if value > Decimal::ZERO {
            Some(PositiveRate(value))
        } else {
            None
        }
    }

    pub fn from_option(value: Option<Decimal>) -> Option<Self> {
        value.and_then(Self::new)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Values `native` in the opposite currency.
    pub fn convert(&self, native: Decimal, from: Currency) -> Decimal {
        match from {
            Currency::Usd => native * self.0,
            Currency::Ars => native / self.0,
        }
    }
}

impl TryFrom<Decimal> for PositiveRate {
    type Error = String;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        PositiveRate::new(value).ok_or_else(|| format!("rate must be positive, got {value}"))
    }
}

impl From<PositiveRate> for Decimal {
    fn from(rate: PositiveRate) -> Self {
        rate.0
    }
}

/// Buy and sell quotes of one FX family.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FxQuote {
    pub buy: Option<Decimal>,
    pub sell: Option<Decimal>,
}

impl FxQuote {
    pub fn new(buy: Decimal, sell: Decimal) -> Self {
        FxQuote {
            buy: Some(buy),
            sell: Some(sell),
        }
    }

    pub fn rate(&self, side: FxSide) -> Option<PositiveRate> {
        match side {
            FxSide::Buy => PositiveRate::from_option(self.buy),
            FxSide::Sell => PositiveRate::from_option(self.sell),
        }
    }
}

/// FX snapshot used for one computation cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FxRates {
    #[serde(default)]
    pub oficial: FxQuote,
    #[serde(default)]
    pub mep: FxQuote,
    #[serde(default)]
    pub ccl: FxQuote,
    #[serde(default)]
    pub cripto: FxQuote,
    pub updated_at: Option<DateTime<Utc>>,
}

impl FxRates {
    pub fn quote(&self, family: FxFamily) -> &FxQuote {
        match family {
            FxFamily::Oficial => &self.oficial,
            FxFamily::Mep => &self.mep,
            FxFamily::Ccl => &self.ccl,
            FxFamily::Cripto => &self.cripto,
        }
    }

    pub fn rate(&self, family: FxFamily, side: FxSide) -> Option<PositiveRate> {
        self.quote(family).rate(side)
    }
}

/// A manually chosen family and side for one `(account, item kind)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FxOverride {
    pub family: FxFamily,
    pub side: FxSide,
}

/// Overrides keyed by `accountId:itemKind`.
pub type FxOverridesMap = BTreeMap<String, FxOverride>;

/// How a resolved rate was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FxRateSource {
    /// Family picked from account class and asset category.
    Auto,
    /// Family and side taken from a manual override.
    Override,
    /// The automatic family had no quote; Oficial on the same side was used.
    Fallback,
}

/// Outcome of FX resolution for one valuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedFx {
    pub family: FxFamily,
    pub side: FxSide,
    pub rate: PositiveRate,
    pub source: FxRateSource,
}
