//! Per-item pricing and ARS/USD valuation.

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;

use super::{DiagnosticEvent, Item, ItemKind, ItemPnl, PriceMeta, PriceSource, YieldMeta};
use crate::accounts::{tea_from_tna, Account, AccountClass};
use crate::assets::{AssetCategory, AssetRowMetrics};
use crate::fixed_deposits::FixedDeposit;
use crate::fx::{resolve_fx, ConversionDirection, Currency, FxOverridesMap, FxRates, PositiveRate};
use crate::movements::MovementIndex;
use crate::settings::{AccountSettings, SignificanceThresholds};
use crate::utils::decimal_utils::{checked_ratio, round_money};

/// What a position row is valued against.
pub struct ValuationContext<'a> {
    pub account_id: &'a str,
    pub class: AccountClass,
    pub overrides: &'a FxOverridesMap,
    pub rates: &'a FxRates,
    pub movements: &'a MovementIndex<'a>,
}

/// Splits a native amount into rounded `(ars, usd)` using `rate` for the counterpart.
/// Without a rate the counterpart is zero.
pub fn to_reporting(
    native: Decimal,
    currency: Currency,
    rate: Option<PositiveRate>,
) -> (Decimal, Decimal) {
    let counterpart = rate
        .map(|rate| round_money(rate.convert(native, currency)))
        .unwrap_or(Decimal::ZERO);
    match currency {
        Currency::Ars => (round_money(native), counterpart),
        Currency::Usd => (counterpart, round_money(native)),
    }
}

/// Unit price of a position row and where it came from.
///
/// FCI rows walk quote, last trade, average cost. Stablecoins without a
/// quote are pegged to one USD. Anything else needs a live quote.
pub fn price_row(
    row: &AssetRowMetrics,
    account_id: &str,
    movements: &MovementIndex<'_>,
) -> (Option<Decimal>, PriceMeta) {
    if row.category.is_cash() {
        return (None, PriceMeta::new(PriceSource::Nominal));
    }
    if let Some(price) = row.positive_price() {
        return (Some(price), PriceMeta::new(PriceSource::Quote));
    }

    match row.category {
        AssetCategory::Stable => (Some(Decimal::ONE), PriceMeta::new(PriceSource::Peg)),
        AssetCategory::Fci => {
            if let Some(trade) =
                movements.last_trade(account_id, row.instrument_key(), row.native_currency)
            {
                return (
                    Some(trade.price),
                    PriceMeta {
                        source: PriceSource::LastTrade,
                        as_of: Some(trade.timestamp),
                    },
                );
            }
            if let Some(cost) = row.positive_avg_cost() {
                return (Some(cost), PriceMeta::new(PriceSource::AvgCost));
            }
            debug!(
                "No price for FCI {} in account {}",
                row.instrument_key(),
                account_id
            );
            (None, PriceMeta::new(PriceSource::Missing))
        }
        _ => (None, PriceMeta::new(PriceSource::Missing)),
    }
}

fn item_pnl(
    quantity: Decimal,
    avg_cost: Decimal,
    val_native: Decimal,
    currency: Currency,
    rate: Option<PositiveRate>,
) -> ItemPnl {
    let cost_native = round_money(quantity * avg_cost);
    let pnl_native = val_native - cost_native;
    let (cost_ars, cost_usd) = to_reporting(cost_native, currency, rate);
    let (pnl_ars, pnl_usd) = to_reporting(pnl_native, currency, rate);
    ItemPnl {
        cost_native,
        cost_ars,
        cost_usd,
        pnl_native,
        pnl_ars,
        pnl_usd,
        pnl_pct: checked_ratio(pnl_native, cost_native)
            .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED)),
    }
}

/// Values one position row through the FX resolver.
pub fn value_row(ctx: &ValuationContext<'_>, row: &AssetRowMetrics) -> Item {
    let kind = ItemKind::from_category(row.category);
    let (price, price_meta) = price_row(row, ctx.account_id, ctx.movements);
    let currency = match price_meta.source {
        PriceSource::Peg => Currency::Usd,
        _ => row.valuation_currency(),
    };

    let val_native = match price_meta.source {
        PriceSource::Nominal => round_money(row.quantity),
        PriceSource::Missing => Decimal::ZERO,
        _ => round_money(row.quantity * price.unwrap_or(Decimal::ZERO)),
    };

    let fx_override = ctx.overrides.get(&kind.override_key(ctx.account_id));
    let fx = resolve_fx(
        ctx.class,
        row.category,
        ConversionDirection::from_native(currency),
        fx_override,
        ctx.rates,
    );
    let rate = fx.map(|fx| fx.rate);
    let (val_ars, val_usd) = to_reporting(val_native, currency, rate);

    let pnl = match (row.positive_avg_cost(), price_meta.source) {
        (_, PriceSource::Missing | PriceSource::Nominal) => None,
        (Some(avg_cost), _) => Some(item_pnl(row.quantity, avg_cost, val_native, currency, rate)),
        (None, _) => None,
    };

    Item {
        id: format!("{}:{}", ctx.account_id, row.instrument_key()),
        kind,
        account_id: ctx.account_id.to_string(),
        instrument_id: row.instrument_id.clone(),
        symbol: row.symbol.clone(),
        label: row.display_name().to_string(),
        quantity: row.quantity,
        native_currency: currency,
        price,
        price_meta,
        val_native,
        val_ars,
        val_usd,
        fx,
        fx_missing: fx.is_none(),
        pnl,
        yield_meta: None,
    }
}

/// Values an active fixed deposit at principal plus accrued interest.
pub fn value_fixed_deposit(
    deposit: &FixedDeposit,
    valuation_date: NaiveDate,
    overrides: &FxOverridesMap,
    rates: &FxRates,
) -> Item {
    let kind = ItemKind::PlazoFijo;
    let val_native = round_money(deposit.current_value(valuation_date));
    let fx = resolve_fx(
        AccountClass::Wallet,
        AssetCategory::Pf,
        ConversionDirection::from_native(deposit.currency),
        overrides.get(&kind.override_key(&deposit.bank_id)),
        rates,
    );
    let (val_ars, val_usd) = to_reporting(val_native, deposit.currency, fx.map(|fx| fx.rate));

    Item {
        id: format!("{}:{}", deposit.bank_id, deposit.id),
        kind,
        account_id: deposit.bank_id.clone(),
        instrument_id: Some(deposit.id.clone()),
        symbol: deposit.id.clone(),
        label: format!("Plazo fijo {}", deposit.bank_name),
        quantity: deposit.principal,
        native_currency: deposit.currency,
        price: None,
        price_meta: PriceMeta::new(PriceSource::Nominal),
        val_native,
        val_ars,
        val_usd,
        fx,
        fx_missing: fx.is_none(),
        pnl: None,
        yield_meta: None,
    }
}

/// Interest terms for cash held in `currency`, if any are known.
/// A TNA override in settings wins over the account's own configuration.
pub fn yield_meta(
    account: &Account,
    settings: Option<&AccountSettings>,
    currency: Currency,
) -> Option<YieldMeta> {
    let config = account.yield_for(currency);
    let tna = settings
        .and_then(|s| s.tna_override)
        .or_else(|| config.map(|c| c.tna))?;
    let compounding = config.map(|c| c.compounding).unwrap_or_default();
    Some(YieldMeta {
        tna,
        tea: tea_from_tna(tna, compounding),
        compounding,
        last_accrual_date: config.and_then(|c| c.last_accrual_date),
    })
}

/// Whether an item is large enough to be shown.
pub fn is_significant(item: &Item, thresholds: &SignificanceThresholds) -> bool {
    match item.kind {
        ItemKind::CashArs => item.val_ars.abs() >= thresholds.min_cash_ars,
        ItemKind::CashUsd => {
            item.val_ars.abs() >= thresholds.min_cash_ars
                || item.quantity.abs() >= thresholds.min_cash_usd_qty
        }
        ItemKind::Fci | ItemKind::PlazoFijo => item.quantity > Decimal::ZERO,
        ItemKind::Cedear | ItemKind::Crypto | ItemKind::Stable | ItemKind::Other => {
            item.quantity > Decimal::ZERO && item.val_ars >= thresholds.min_asset_ars
        }
    }
}

/// Reports an upstream ARS value further than `max_pct` percent from ours.
pub fn upstream_drift(
    row: &AssetRowMetrics,
    item: &Item,
    max_pct: Decimal,
) -> Option<DiagnosticEvent> {
    let upstream = row.val_ars.filter(|v| !v.is_zero())?;
    // Overflow means the two values are orders of magnitude apart.
    let drifted = item
        .val_ars
        .checked_sub(upstream)
        .and_then(|diff| checked_ratio(diff, upstream))
        .and_then(|ratio| ratio.abs().checked_mul(Decimal::ONE_HUNDRED))
        .map_or(true, |drift_pct| drift_pct > max_pct);
    drifted.then(|| DiagnosticEvent::UpstreamValuationDrift {
        item_id: item.id.clone(),
        upstream_ars: upstream,
        computed_ars: item.val_ars,
    })
}
