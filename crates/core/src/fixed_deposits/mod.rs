//! Fixed deposits module - plazo fijo positions and interest accrual.

mod fixed_deposits_model;


pub use fixed_deposits_model::{FixedDeposit, FixedDepositData};
