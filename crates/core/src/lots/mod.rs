//! Lots module - FIFO inventory replay and sale allocation.

mod allocation;
mod fifo;
mod lots_errors;
mod lots_model;

#[cfg(test)]
mod allocation_tests;

pub use allocation::{
    allocate_sale, CostingMethod, LotAllocation, ManualAllocation, SaleAllocation,
};
pub use fifo::build_fifo_lots;
pub use lots_errors::AllocationError;
pub use lots_model::{FifoResult, FifoWarning, Lot, RealizedSale};
