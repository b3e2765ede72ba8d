use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;

use super::Movement;
use crate::fx::Currency;

/// Price of the most recent trade of an instrument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LastTrade {
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// Read-only lookup of movements by `(account id, instrument key)`.
pub struct MovementIndex<'a> {
    by_account: HashMap<&'a str, HashMap<&'a str, Vec<&'a Movement>>>,
}

impl<'a> MovementIndex<'a> {
    pub fn new(movements: &'a [Movement]) -> Self {
        let mut by_account: HashMap<&'a str, HashMap<&'a str, Vec<&'a Movement>>> =
            HashMap::new();
        for movement in movements {
            if let Some(key) = movement.instrument_key() {
                by_account
                    .entry(movement.account_id.as_str())
                    .or_default()
                    .entry(key)
                    .or_default()
                    .push(movement);
            }
        }
        MovementIndex { by_account }
    }

    /// Movements of one position, in ledger order.
    pub fn for_position(&self, account_id: &str, instrument_key: &str) -> &[&'a Movement] {
        self.by_account
            .get(account_id)
            .and_then(|positions| positions.get(instrument_key))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Most recent priced BUY/SELL of the position traded in `currency`.
    pub fn last_trade(
        &self,
        account_id: &str,
        instrument_key: &str,
        currency: Currency,
    ) -> Option<LastTrade> {
        self.for_position(account_id, instrument_key)
            .iter()
            .filter(|m| m.movement_type.is_trade() && m.trade_currency == currency)
            .filter_map(|m| {
                m.unit_price
                    .filter(|price| *price > Decimal::ZERO)
                    .map(|price| LastTrade {
                        price,
                        timestamp: m.timestamp,
                    })
            })
            .max_by_key(|trade| trade.timestamp)
    }

    pub fn is_empty(&self) -> bool {
        self.by_account.is_empty()
    }
}
