//! FIFO replay of a position's movements into open lots.

use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::VecDeque;

use super::{FifoResult, FifoWarning, Lot, RealizedSale};
use crate::movements::{LotEffect, Movement, MovementType};
use crate::utils::decimal_utils::is_quantity_significant;

fn replay_rank(movement: &Movement) -> u8 {
    match movement.lot_effect() {
        LotEffect::Add => 0,
        LotEffect::None => 1,
        LotEffect::Reduce => 2,
    }
}

/// Builds the open lots of one `(account, instrument)` pair.
///
/// Movements may arrive in any order. Acquisitions booked at the same
/// instant as a disposal are applied first. Overselling clamps at zero and
/// is reported as a warning.
pub fn build_fifo_lots<M>(movements: &[M]) -> FifoResult
where
    M: AsRef<Movement>,
{
    let mut sorted: Vec<&Movement> = movements.iter().map(AsRef::as_ref).collect();
    sorted.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| replay_rank(a).cmp(&replay_rank(b)))
    });

    let mut lots: VecDeque<Lot> = VecDeque::new();
    let mut realized = Vec::new();
    let mut warnings = Vec::new();

    for movement in sorted {
        match movement.lot_effect() {
            LotEffect::Add => {
                if !movement.quantity.is_sign_positive() || movement.quantity.is_zero() {
                    warn!(
                        "Skipping lot for movement {} with non-positive quantity: {}",
                        movement.id, movement.quantity
                    );
                    warnings.push(FifoWarning::NonPositiveQuantity {
                        movement_id: movement.id.clone(),
                    });
                    continue;
                }
                let fx_at_trade = movement.fx_at_trade();
                lots.push_back(Lot {
                    id: movement.id.clone(),
                    trade_date: movement.timestamp,
                    quantity: movement.quantity,
                    unit_cost: movement.net_unit_price().unwrap_or(Decimal::ZERO),
                    currency: movement.trade_currency,
                    fx_at_trade,
                    fx_missing: fx_at_trade.is_none(),
                });
            }
            LotEffect::Reduce => {
                let (consumed, cost) = relieve_oldest(&mut lots, movement, &mut warnings);
                if movement.movement_type == MovementType::Sell && consumed > Decimal::ZERO {
                    let proceeds = movement
                        .net_unit_price()
                        .map(|unit| unit * consumed)
                        .unwrap_or(Decimal::ZERO);
                    realized.push(RealizedSale {
                        movement_id: movement.id.clone(),
                        date: movement.timestamp,
                        quantity: consumed,
                        cost_native: cost,
                        proceeds_native: proceeds,
                        pnl_native: proceeds - cost,
                    });
                }
            }
            LotEffect::None => {}
        }
    }

    let lots: Vec<Lot> = lots.into();
    let total_quantity = lots.iter().map(|lot| lot.quantity).sum();
    let total_cost_native = lots.iter().map(Lot::cost_native).sum();

    FifoResult {
        lots,
        total_quantity,
        total_cost_native,
        realized,
        warnings,
    }
}

/// Consumes `movement.quantity` from the front of `lots`.
/// Returns (quantity actually consumed, cost basis relieved).
fn relieve_oldest(
    lots: &mut VecDeque<Lot>,
    movement: &Movement,
    warnings: &mut Vec<FifoWarning>,
) -> (Decimal, Decimal) {
    let requested = movement.quantity;
    if !requested.is_sign_positive() || requested.is_zero() {
        debug!(
            "Ignoring disposal {} with non-positive quantity {}",
            movement.id, requested
        );
        return (Decimal::ZERO, Decimal::ZERO);
    }

    let available: Decimal = lots.iter().map(|lot| lot.quantity).sum();
    let mut remaining = requested;
    if available < requested {
        warn!(
            "Disposal {} of {} exceeds open quantity {}. Reducing by available amount.",
            movement.id, requested, available
        );
        warnings.push(FifoWarning::Oversold {
            movement_id: movement.id.clone(),
            requested,
            available,
        });
        remaining = available;
    }

    let mut consumed = Decimal::ZERO;
    let mut cost = Decimal::ZERO;
    while remaining > Decimal::ZERO {
        let Some(oldest) = lots.front_mut() else {
            break;
        };
        let take = oldest.quantity.min(remaining);
        consumed += take;
        cost += take * oldest.unit_cost;
        remaining -= take;
        oldest.quantity -= take;
        if oldest.quantity <= Decimal::ZERO || !is_quantity_significant(&oldest.quantity) {
            lots.pop_front();
        }
    }

    (consumed, cost)
}
