//! Portfolio output models: rubro tree, items, KPIs and the top-level snapshot.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use super::{LotDetail, PlazoDetail, WalletYieldDetail};
use crate::accounts::Compounding;
use crate::assets::AssetCategory;
use crate::fx::{Currency, FxFamily, FxRates, ResolvedFx};

/// Top-level sector grouping. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RubroId {
    Wallets,
    Frascos,
    Plazos,
    Cedears,
    Crypto,
    Fondos,
}

impl RubroId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RubroId::Wallets => "wallets",
            RubroId::Frascos => "frascos",
            RubroId::Plazos => "plazos",
            RubroId::Cedears => "cedears",
            RubroId::Crypto => "crypto",
            RubroId::Fondos => "fondos",
        }
    }
}

impl fmt::Display for RubroId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a portfolio line. Also the second half of an FX override key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    CashArs,
    CashUsd,
    Cedear,
    Crypto,
    Stable,
    Fci,
    PlazoFijo,
    Other,
}

impl ItemKind {
    pub fn from_category(category: AssetCategory) -> Self {
        match category {
            AssetCategory::CashArs => ItemKind::CashArs,
            AssetCategory::CashUsd => ItemKind::CashUsd,
            AssetCategory::Cedear => ItemKind::Cedear,
            AssetCategory::Crypto => ItemKind::Crypto,
            AssetCategory::Stable => ItemKind::Stable,
            AssetCategory::Fci => ItemKind::Fci,
            AssetCategory::Pf => ItemKind::PlazoFijo,
            AssetCategory::Other => ItemKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::CashArs => "cash_ars",
            ItemKind::CashUsd => "cash_usd",
            ItemKind::Cedear => "cedear",
            ItemKind::Crypto => "crypto",
            ItemKind::Stable => "stable",
            ItemKind::Fci => "fci",
            ItemKind::PlazoFijo => "plazo_fijo",
            ItemKind::Other => "other",
        }
    }

    /// Key under which an FX override for this kind in `account_id` is stored.
    pub fn override_key(&self, account_id: &str) -> String {
        format!("{}:{}", account_id, self.as_str())
    }

    pub fn is_cash(&self) -> bool {
        matches!(self, ItemKind::CashArs | ItemKind::CashUsd)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an item's unit price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    /// Live quote from the positions collaborator.
    Quote,
    /// Most recent same-currency trade in the ledger.
    LastTrade,
    /// Average acquisition cost.
    AvgCost,
    /// Stablecoin valued at one USD.
    Peg,
    /// Cash and deposits: the quantity is the value.
    Nominal,
    /// No usable price. The item is valued at zero.
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceMeta {
    pub source: PriceSource,
    pub as_of: Option<DateTime<Utc>>,
}

impl PriceMeta {
    pub fn new(source: PriceSource) -> Self {
        PriceMeta {
            source,
            as_of: None,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.source == PriceSource::Missing
    }
}

/// Interest terms of a yield-bearing cash line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldMeta {
    pub tna: Decimal,
    pub tea: Decimal,
    pub compounding: Compounding,
    pub last_accrual_date: Option<NaiveDate>,
}

/// Unrealized result against average cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPnl {
    pub cost_native: Decimal,
    pub cost_ars: Decimal,
    pub cost_usd: Decimal,
    pub pnl_native: Decimal,
    pub pnl_ars: Decimal,
    pub pnl_usd: Decimal,
    pub pnl_pct: Option<Decimal>,
}

/// ARS and USD sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub ars: Decimal,
    pub usd: Decimal,
}

impl Add for Totals {
    type Output = Totals;

    fn add(self, other: Totals) -> Totals {
        Totals {
            ars: self.ars + other.ars,
            usd: self.usd + other.usd,
        }
    }
}

impl Sum for Totals {
    fn sum<I: Iterator<Item = Totals>>(iter: I) -> Totals {
        iter.fold(Totals::default(), Add::add)
    }
}

/// One instrument held in one account, or one fixed deposit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// `{accountId}:{instrumentKey}`; keys every detail map.
    pub id: String,
    pub kind: ItemKind,
    pub account_id: String,
    pub instrument_id: Option<String>,
    pub symbol: String,
    pub label: String,
    pub quantity: Decimal,
    pub native_currency: Currency,
    pub price: Option<Decimal>,
    pub price_meta: PriceMeta,
    pub val_native: Decimal,
    pub val_ars: Decimal,
    pub val_usd: Decimal,
    pub fx: Option<ResolvedFx>,
    /// No rate was available; the counterpart currency value is zero.
    pub fx_missing: bool,
    pub pnl: Option<ItemPnl>,
    pub yield_meta: Option<YieldMeta>,
}

impl Item {
    /// Instrument identity within the account, as used by the movement index.
    pub fn instrument_key(&self) -> &str {
        self.instrument_id.as_deref().unwrap_or(&self.symbol)
    }

    pub fn totals(&self) -> Totals {
        Totals {
            ars: self.val_ars,
            usd: self.val_usd,
        }
    }

    pub fn fx_family(&self) -> Option<FxFamily> {
        self.fx.map(|fx| fx.family)
    }
}

/// Account-level (or bank-level) grouping inside a rubro.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: String,
    pub name: String,
    pub items: Vec<Item>,
    pub totals: Totals,
    /// Set only when every item shares one family.
    pub fx_family: Option<FxFamily>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rubro {
    pub id: RubroId,
    pub name: String,
    pub providers: Vec<Provider>,
    pub totals: Totals,
    pub fx_family: Option<FxFamily>,
}

impl Rubro {
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.providers.iter().flat_map(|p| p.items.iter())
    }
}

/// Portfolio-wide totals and currency exposure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioKpis {
    pub total_ars: Decimal,
    pub total_usd: Decimal,
    /// USD held as USD: crypto plus USD cash.
    pub usd_hard: Decimal,
    /// USD value of ARS-priced assets (CEDEARs, deposits, funds).
    pub usd_equivalent: Decimal,
    /// ARS cash, in ARS.
    pub ars_real: Decimal,
    /// `ars_real` expressed in USD at `ref_rate`.
    pub ars_real_usd: Decimal,
    pub ref_rate: Decimal,
    pub ref_rate_family: Option<FxFamily>,
    /// Neither MEP nor Oficial sell was available and `ref_rate` is 1.
    pub ref_rate_fallback: bool,
    pub pct_usd_hard: Decimal,
    pub pct_usd_eq: Decimal,
    pub pct_ars: Decimal,
}

/// Full portfolio snapshot. Recomputed from scratch on every build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioV2 {
    pub valuation_date: NaiveDate,
    pub fx: FxRates,
    pub kpis: PortfolioKpis,
    pub rubros: Vec<Rubro>,
    pub wallet_details: BTreeMap<String, WalletYieldDetail>,
    pub plazo_details: BTreeMap<String, PlazoDetail>,
    pub cedear_details: BTreeMap<String, LotDetail>,
    pub crypto_details: BTreeMap<String, LotDetail>,
    pub fci_details: BTreeMap<String, LotDetail>,
}

impl PortfolioV2 {
    pub fn rubro(&self, id: RubroId) -> Option<&Rubro> {
        self.rubros.iter().find(|r| r.id == id)
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.rubros.iter().flat_map(Rubro::items)
    }
}
