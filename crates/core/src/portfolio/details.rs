//! Drill-down overlays keyed by item id. Read-only projections of items.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

use super::item_valuation::to_reporting;
use super::{DiagnosticEvent, DiagnosticsSink, Item, PriceMeta, YieldMeta};
use crate::accounts::Compounding;
use crate::constants::DAYS_PER_YEAR;
use crate::fixed_deposits::FixedDeposit;
use crate::fx::Currency;
use crate::lots::{build_fifo_lots, FifoWarning, Lot};
use crate::movements::Movement;
use crate::utils::decimal_utils::{checked_ratio, is_quantity_significant, round_money};
use crate::utils::time_utils::days_between;

/// One open lot valued at the item's current price and rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotLine {
    pub lot_id: String,
    pub trade_date: DateTime<Utc>,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    pub lot_currency: Currency,
    pub fx_at_trade: Option<Decimal>,
    pub fx_missing: bool,
    /// Cost in the item's native currency.
    pub cost_native: Decimal,
    pub cost_ars: Decimal,
    pub cost_usd: Decimal,
    pub value_native: Decimal,
    pub value_ars: Decimal,
    pub value_usd: Decimal,
    pub pnl_native: Decimal,
    pub pnl_ars: Decimal,
    pub pnl_usd: Decimal,
    pub pnl_pct: Option<Decimal>,
}

/// FIFO breakdown of a CEDEAR, crypto or FCI item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotDetail {
    pub item_id: String,
    pub account_id: String,
    pub symbol: String,
    pub native_currency: Currency,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    pub price_meta: PriceMeta,
    pub lots: Vec<LotLine>,
    pub lot_quantity: Decimal,
    pub cost_native: Decimal,
    pub cost_ars: Decimal,
    pub cost_usd: Decimal,
    pub value_native: Decimal,
    pub value_ars: Decimal,
    pub value_usd: Decimal,
    pub pnl_native: Decimal,
    pub pnl_ars: Decimal,
    pub pnl_usd: Decimal,
    pub pnl_pct: Option<Decimal>,
    pub warnings: Vec<FifoWarning>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletYieldDetail {
    pub item_id: String,
    pub account_id: String,
    pub currency: Currency,
    pub balance: Decimal,
    pub balance_ars: Decimal,
    pub balance_usd: Decimal,
    pub tna: Decimal,
    pub tea: Decimal,
    pub compounding: Compounding,
    pub daily_interest: Decimal,
    pub interest_30d: Decimal,
    pub last_accrual_date: Option<NaiveDate>,
    /// Days since the last accrual, when one is recorded.
    pub pending_accrual_days: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlazoDetail {
    pub item_id: String,
    pub deposit_id: String,
    pub bank_name: String,
    pub currency: Currency,
    pub principal: Decimal,
    pub tna: Decimal,
    pub term_days: i64,
    pub start_date: NaiveDate,
    pub maturity_date: NaiveDate,
    pub elapsed_days: i64,
    pub remaining_days: i64,
    pub accrued_interest: Decimal,
    pub current_value: Decimal,
    pub expected_interest: Decimal,
    pub expected_payout: Decimal,
}

fn lot_line(lot: &Lot, item: &Item) -> LotLine {
    let item_rate = item.fx.map(|fx| fx.rate);
    let cost_rate = lot.fx_at_trade.or(item_rate);
    let lot_cost = round_money(lot.cost_native());
    let (cost_ars, cost_usd) = to_reporting(lot_cost, lot.currency, cost_rate);
    let cost_native = if lot.currency == item.native_currency {
        lot_cost
    } else {
        match item.native_currency {
            Currency::Ars => cost_ars,
            Currency::Usd => cost_usd,
        }
    };

    let value_native = match item.price {
        Some(price) if !item.price_meta.is_missing() => round_money(lot.quantity * price),
        _ => Decimal::ZERO,
    };
    let (value_ars, value_usd) = to_reporting(value_native, item.native_currency, item_rate);
    let pnl_native = value_native - cost_native;

    LotLine {
        lot_id: lot.id.clone(),
        trade_date: lot.trade_date,
        quantity: lot.quantity,
        unit_cost: lot.unit_cost,
        lot_currency: lot.currency,
        fx_at_trade: lot.fx_at_trade.map(Decimal::from),
        fx_missing: lot.fx_missing,
        cost_native,
        cost_ars,
        cost_usd,
        value_native,
        value_ars,
        value_usd,
        pnl_native,
        pnl_ars: value_ars - cost_ars,
        pnl_usd: value_usd - cost_usd,
        pnl_pct: checked_ratio(pnl_native, cost_native)
            .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED)),
    }
}

/// Replays the item's movements into FIFO lots and values each lot.
pub fn build_lot_detail(
    item: &Item,
    movements: &[&Movement],
    diagnostics: &dyn DiagnosticsSink,
) -> LotDetail {
    let fifo = build_fifo_lots(movements);
    let lots: Vec<LotLine> = fifo.lots.iter().map(|lot| lot_line(lot, item)).collect();

    if !movements.is_empty() && is_quantity_significant(&(fifo.total_quantity - item.quantity)) {
        diagnostics.report(DiagnosticEvent::LotQuantityMismatch {
            item_id: item.id.clone(),
            lot_quantity: fifo.total_quantity,
            item_quantity: item.quantity,
        });
    }

    let sum = |f: fn(&LotLine) -> Decimal| lots.iter().map(f).sum::<Decimal>();
    let cost_native = sum(|l| l.cost_native);
    let value_native = sum(|l| l.value_native);
    let pnl_native = value_native - cost_native;

    LotDetail {
        item_id: item.id.clone(),
        account_id: item.account_id.clone(),
        symbol: item.symbol.clone(),
        native_currency: item.native_currency,
        quantity: item.quantity,
        price: item.price,
        price_meta: item.price_meta,
        lot_quantity: fifo.total_quantity,
        cost_native,
        cost_ars: sum(|l| l.cost_ars),
        cost_usd: sum(|l| l.cost_usd),
        value_native,
        value_ars: sum(|l| l.value_ars),
        value_usd: sum(|l| l.value_usd),
        pnl_native,
        pnl_ars: sum(|l| l.pnl_ars),
        pnl_usd: sum(|l| l.pnl_usd),
        pnl_pct: checked_ratio(pnl_native, cost_native)
            .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED)),
        warnings: fifo.warnings,
        lots,
    }
}

/// Interest expected over the next 30 days on `balance`.
fn interest_30d(balance: Decimal, meta: &YieldMeta) -> Decimal {
    let annual = meta.tna / Decimal::ONE_HUNDRED;
    let days = Decimal::from(DAYS_PER_YEAR);
    match meta.compounding {
        Compounding::Daily => (Decimal::ONE + annual / days)
            .checked_powi(30)
            .map(|growth| balance * (growth - Decimal::ONE))
            .unwrap_or_else(|| balance * annual * Decimal::from(30) / days),
        Compounding::Monthly => balance * annual / Decimal::from(12),
        Compounding::Simple => balance * annual * Decimal::from(30) / days,
    }
}

pub fn build_wallet_yield_detail(
    item: &Item,
    meta: &YieldMeta,
    valuation_date: NaiveDate,
) -> WalletYieldDetail {
    let balance = item.val_native;
    let daily = balance * meta.tna / Decimal::ONE_HUNDRED / Decimal::from(DAYS_PER_YEAR);
    WalletYieldDetail {
        item_id: item.id.clone(),
        account_id: item.account_id.clone(),
        currency: item.native_currency,
        balance,
        balance_ars: item.val_ars,
        balance_usd: item.val_usd,
        tna: meta.tna,
        tea: meta.tea,
        compounding: meta.compounding,
        daily_interest: round_money(daily),
        interest_30d: round_money(interest_30d(balance, meta)),
        last_accrual_date: meta.last_accrual_date,
        pending_accrual_days: meta
            .last_accrual_date
            .map(|last| days_between(last, valuation_date).max(0)),
    }
}

pub fn build_plazo_detail(
    item: &Item,
    deposit: &FixedDeposit,
    valuation_date: NaiveDate,
) -> PlazoDetail {
    PlazoDetail {
        item_id: item.id.clone(),
        deposit_id: deposit.id.clone(),
        bank_name: deposit.bank_name.clone(),
        currency: deposit.currency,
        principal: deposit.principal,
        tna: deposit.tna,
        term_days: deposit.term_days,
        start_date: deposit.start_date,
        maturity_date: deposit.maturity_date,
        elapsed_days: deposit.elapsed_days(valuation_date),
        remaining_days: deposit.remaining_days(valuation_date),
        accrued_interest: round_money(deposit.accrued_interest(valuation_date)),
        current_value: item.val_native,
        expected_interest: round_money(deposit.expected_interest()),
        expected_payout: round_money(deposit.expected_payout()),
    }
}
