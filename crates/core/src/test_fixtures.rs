//! Builders shared by the unit tests.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::accounts::{Account, AccountKind};
use crate::assets::{AssetCategory, AssetRowMetrics};
use crate::fx::{Currency, FxFamily, FxQuote, FxRates, FxSide};
use crate::movements::{AssetClass, FxSnapshot, Movement, MovementTotals, MovementType};

pub fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, d, 15, 0, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn account(id: &str, kind: AccountKind) -> Account {
    Account {
        id: id.to_string(),
        name: format!("Account {}", id),
        kind,
        default_currency: Currency::Ars,
        cash_yield: None,
    }
}

pub fn rates() -> FxRates {
    FxRates {
        oficial: FxQuote::new(dec!(890), dec!(900)),
        mep: FxQuote::new(dec!(1150), dec!(1170)),
        ccl: FxQuote::new(dec!(1180), dec!(1200)),
        cripto: FxQuote::new(dec!(1190), dec!(1210)),
        updated_at: Some(day(20)),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn movement(
    id: &str,
    movement_type: MovementType,
    asset_class: AssetClass,
    account_id: &str,
    symbol: &str,
    quantity: Decimal,
    price: Decimal,
    currency: Currency,
    timestamp: DateTime<Utc>,
) -> Movement {
    Movement {
        id: id.to_string(),
        timestamp,
        movement_type,
        asset_class,
        instrument_id: None,
        symbol: Some(symbol.to_string()),
        account_id: account_id.to_string(),
        quantity,
        unit_price: Some(price),
        trade_currency: currency,
        fee: None,
        fx: Some(FxSnapshot {
            kind: FxFamily::Mep,
            rate: Some(dec!(1000)),
            side: FxSide::Sell,
            timestamp: Some(timestamp),
        }),
        totals: MovementTotals::default(),
    }
}

pub fn buy(id: &str, account_id: &str, symbol: &str, qty: Decimal, price: Decimal, d: u32) -> Movement {
    movement(
        id,
        MovementType::Buy,
        AssetClass::Cedear,
        account_id,
        symbol,
        qty,
        price,
        Currency::Ars,
        day(d),
    )
}

pub fn sell(id: &str, account_id: &str, symbol: &str, qty: Decimal, price: Decimal, d: u32) -> Movement {
    movement(
        id,
        MovementType::Sell,
        AssetClass::Cedear,
        account_id,
        symbol,
        qty,
        price,
        Currency::Ars,
        day(d),
    )
}

pub fn row(
    symbol: &str,
    category: AssetCategory,
    quantity: Decimal,
    price: Option<Decimal>,
    currency: Currency,
) -> AssetRowMetrics {
    AssetRowMetrics {
        instrument_id: None,
        symbol: symbol.to_string(),
        name: None,
        category,
        quantity,
        current_price: price,
        avg_cost: None,
        native_currency: currency,
        val_ars: None,
        val_usd: None,
    }
}

pub fn cash_ars(amount: Decimal) -> AssetRowMetrics {
    row("ARS", AssetCategory::CashArs, amount, None, Currency::Ars)
}

pub fn cash_usd(amount: Decimal) -> AssetRowMetrics {
    row("USD", AssetCategory::CashUsd, amount, None, Currency::Usd)
}
