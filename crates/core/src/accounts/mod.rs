//! Accounts module - domain models.

mod accounts_model;


// Re-export the public interface
pub use accounts_model::{
    tea_from_tna, Account, AccountClass, AccountKind, CashYieldConfig, Compounding,
};
