//! Account settings overlay and engine configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::accounts::{Account, AccountClass};
use crate::constants::{MIN_ASSET_ARS, MIN_CASH_ARS, MIN_CASH_USD_QTY, UPSTREAM_DRIFT_PCT};
use crate::utils::decimal_utils::decimal_constant;

/// Per-account user overrides. Every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AccountSettings {
    pub display_name: Option<String>,
    /// Forces the account into another class, e.g. marking a wallet as a frasco.
    pub rubro_override: Option<AccountClass>,
    /// Replaces the account's configured TNA, in percent.
    pub tna_override: Option<Decimal>,
}

/// Settings keyed by account id.
pub type AccountSettingsMap = BTreeMap<String, AccountSettings>;

/// Class used to place `account` in rubros and pick its cash FX family.
pub fn effective_class(account: &Account, settings: Option<&AccountSettings>) -> AccountClass {
    settings
        .and_then(|s| s.rubro_override)
        .unwrap_or_else(|| AccountClass::from_kind(account.kind))
}

/// Display name after applying a non-blank settings override.
pub fn effective_name<'a>(account: &'a Account, settings: Option<&'a AccountSettings>) -> &'a str {
    settings
        .and_then(|s| s.display_name.as_deref())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(account.name.as_str())
}

/// Minimum magnitudes for a position to be shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignificanceThresholds {
    /// Cash and USD cash are kept when `|valArs|` reaches this.
    pub min_cash_ars: Decimal,
    /// USD cash is also kept when `|quantity|` reaches this.
    pub min_cash_usd_qty: Decimal,
    /// Tradeable assets other than FCI need at least this ARS value.
    pub min_asset_ars: Decimal,
}

impl Default for SignificanceThresholds {
    fn default() -> Self {
        SignificanceThresholds {
            min_cash_ars: decimal_constant(MIN_CASH_ARS, Decimal::ONE),
            min_cash_usd_qty: decimal_constant(MIN_CASH_USD_QTY, Decimal::new(1, 2)),
            min_asset_ars: decimal_constant(MIN_ASSET_ARS, Decimal::ONE),
        }
    }
}

/// Tunables for a portfolio build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub thresholds: SignificanceThresholds,
    /// Upstream valuations further than this percentage from ours are reported.
    pub upstream_drift_pct: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            thresholds: SignificanceThresholds::default(),
            upstream_drift_pct: decimal_constant(UPSTREAM_DRIFT_PCT, Decimal::ONE),
        }
    }
}
