//! Sale allocation across open lots.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::{AllocationError, Lot};
use crate::utils::decimal_utils::round_money;

/// Decimal places kept when splitting a sale proportionally across lots.
const QUANTITY_DP: u32 = 8;

/// Order in which open lots are relieved by a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CostingMethod {
    #[default]
    Fifo,
    Lifo,
    Average,
    Manual,
}

/// Caller-chosen quantity for one lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualAllocation {
    pub lot_id: String,
    pub quantity: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotAllocation {
    pub lot_id: String,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    pub cost_native: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleAllocation {
    pub method: CostingMethod,
    pub allocations: Vec<LotAllocation>,
    pub total_qty_sold: Decimal,
    pub total_cost_native: Decimal,
    pub proceeds_native: Decimal,
    pub realized_pnl_native: Decimal,
}

impl SaleAllocation {
    fn from_allocations(
        method: CostingMethod,
        allocations: Vec<LotAllocation>,
        price: Decimal,
    ) -> Self {
        let total_qty_sold: Decimal = allocations.iter().map(|a| a.quantity).sum();
        let total_cost_native: Decimal = allocations.iter().map(|a| a.cost_native).sum();
        let proceeds_native = round_money(total_qty_sold * price);
        SaleAllocation {
            method,
            allocations,
            total_qty_sold,
            total_cost_native,
            proceeds_native,
            realized_pnl_native: proceeds_native - total_cost_native,
        }
    }
}

fn lot_allocation(lot: &Lot, quantity: Decimal, unit_cost: Decimal) -> LotAllocation {
    LotAllocation {
        lot_id: lot.id.clone(),
        quantity,
        unit_cost,
        cost_native: round_money(quantity * unit_cost),
    }
}

/// Decides which lots a sale of `desired_qty` at `price` consumes.
///
/// `lots` must be ordered oldest first, as produced by the FIFO engine.
/// `manual` is only read for [`CostingMethod::Manual`].
pub fn allocate_sale(
    lots: &[Lot],
    desired_qty: Decimal,
    price: Decimal,
    method: CostingMethod,
    manual: Option<&[ManualAllocation]>,
) -> Result<SaleAllocation, AllocationError> {
    if desired_qty.is_sign_negative() && !desired_qty.is_zero() {
        return Err(AllocationError::NegativeQuantity(desired_qty));
    }
    if price.is_sign_negative() && !price.is_zero() {
        return Err(AllocationError::NegativePrice(price));
    }
    if desired_qty.is_zero() {
        return Ok(SaleAllocation::from_allocations(method, Vec::new(), price));
    }

    let allocations = match method {
        CostingMethod::Manual => allocate_manual(lots, desired_qty, manual)?,
        CostingMethod::Fifo | CostingMethod::Lifo | CostingMethod::Average => {
            let available: Decimal = lots.iter().map(|lot| lot.quantity).sum();
            if desired_qty > available {
                return Err(AllocationError::InsufficientQuantity {
                    requested: desired_qty,
                    available,
                });
            }
            match method {
                CostingMethod::Fifo => allocate_in_order(lots.iter(), desired_qty),
                CostingMethod::Lifo => allocate_in_order(lots.iter().rev(), desired_qty),
                _ => allocate_average(lots, desired_qty, available),
            }
        }
    };

    Ok(SaleAllocation::from_allocations(method, allocations, price))
}

fn allocate_in_order<'a>(lots: impl Iterator<Item = &'a Lot>, desired: Decimal) -> Vec<LotAllocation> {
    let mut remaining = desired;
    let mut allocations = Vec::new();
    for lot in lots {
        if remaining <= Decimal::ZERO {
            break;
        }
        if lot.quantity <= Decimal::ZERO {
            continue;
        }
        let take = lot.quantity.min(remaining);
        allocations.push(lot_allocation(lot, take, lot.unit_cost));
        remaining -= take;
    }
    allocations
}

/// Every lot gives up its share of the sale at the blended unit cost.
/// The last open lot takes the rounding remainder; whatever it cannot hold
/// goes back to earlier lots that still have room.
fn allocate_average(lots: &[Lot], desired: Decimal, available: Decimal) -> Vec<LotAllocation> {
    let open: Vec<&Lot> = lots.iter().filter(|lot| lot.quantity > Decimal::ZERO).collect();
    if open.is_empty() || available <= Decimal::ZERO {
        return Vec::new();
    }
    let total_cost: Decimal = open.iter().map(|lot| lot.cost_native()).sum();
    let average_cost = total_cost / available;

    let mut shares: Vec<Decimal> = open
        .iter()
        .map(|lot| {
            (desired * lot.quantity / available)
                .round_dp_with_strategy(QUANTITY_DP, RoundingStrategy::ToZero)
                .min(lot.quantity)
        })
        .collect();
    let last = open.len() - 1;
    let assigned: Decimal = shares[..last].iter().sum();
    shares[last] = (desired - assigned).max(Decimal::ZERO);

    let mut overflow = Decimal::ZERO;
    if shares[last] > open[last].quantity {
        overflow = shares[last] - open[last].quantity;
        shares[last] = open[last].quantity;
    }
    for (share, lot) in shares.iter_mut().zip(open.iter()).rev() {
        if overflow <= Decimal::ZERO {
            break;
        }
        let extra = (lot.quantity - *share).min(overflow);
        *share += extra;
        overflow -= extra;
    }

    open.iter()
        .zip(shares)
        .filter(|(_, share)| *share > Decimal::ZERO)
        .map(|(lot, share)| lot_allocation(lot, share, average_cost))
        .collect()
}

fn allocate_manual(
    lots: &[Lot],
    desired: Decimal,
    manual: Option<&[ManualAllocation]>,
) -> Result<Vec<LotAllocation>, AllocationError> {
    let Some(selection) = manual.filter(|entries| !entries.is_empty()) else {
        return Err(AllocationError::SelectionPending);
    };

    let by_id: HashMap<&str, &Lot> = lots.iter().map(|lot| (lot.id.as_str(), lot)).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut selected_total = Decimal::ZERO;

    for entry in selection {
        let Some(lot) = by_id.get(entry.lot_id.as_str()) else {
            return Err(AllocationError::UnknownLot(entry.lot_id.clone()));
        };
        if !seen.insert(entry.lot_id.as_str()) {
            return Err(AllocationError::DuplicateLot(entry.lot_id.clone()));
        }
        if entry.quantity.is_sign_negative() && !entry.quantity.is_zero() {
            return Err(AllocationError::NegativeSelection {
                lot_id: entry.lot_id.clone(),
                quantity: entry.quantity,
            });
        }
        if entry.quantity > lot.quantity {
            return Err(AllocationError::ExceedsLot {
                lot_id: entry.lot_id.clone(),
                requested: entry.quantity,
                available: lot.quantity,
            });
        }
        selected_total += entry.quantity;
    }

    if selected_total.is_zero() {
        return Err(AllocationError::EmptySelection { desired });
    }
    if selected_total != desired {
        return Err(AllocationError::SelectionMismatch {
            selected: selected_total,
            desired,
        });
    }

    // Emit allocations in lot order regardless of selection order
    let quantities: HashMap<&str, Decimal> = selection
        .iter()
        .map(|entry| (entry.lot_id.as_str(), entry.quantity))
        .collect();
    Ok(lots
        .iter()
        .filter_map(|lot| {
            quantities
                .get(lot.id.as_str())
                .filter(|qty| **qty > Decimal::ZERO)
                .map(|qty| lot_allocation(lot, *qty, lot.unit_cost))
        })
        .collect())
}
