//! Movements module - ledger entries and lookups.

mod movements_index;
mod movements_model;

#[cfg(test)]
mod movements_model_tests;

pub use movements_index::{LastTrade, MovementIndex};
pub use movements_model::{
    AssetClass, Fee, FeeMode, FxSnapshot, LotEffect, Movement, MovementTotals, MovementType,
};
