//! Cartera Core - portfolio aggregation and valuation engine.
//!
//! This crate turns a ledger of movements, a set of accounts and an FX
//! snapshot into a `PortfolioV2`: holdings grouped into rubros, valued in
//! ARS and USD with the FX family each position calls for, plus lot-level
//! cost basis detail. It performs no I/O; every input is handed in by the
//! caller and every call is independent.

pub mod accounts;
pub mod assets;
pub mod constants;
pub mod errors;
pub mod fixed_deposits;
pub mod fx;
pub mod lots;
pub mod movements;
pub mod portfolio;
pub mod settings;
pub mod utils;

#[cfg(test)]
mod test_fixtures;

// Re-export the engine entry points
pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
