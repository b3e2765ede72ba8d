use rust_decimal::Decimal;
use thiserror::Error;

/// Reasons a sale allocation is rejected.
///
/// `SelectionPending` means the caller has not chosen lots yet;
/// `EmptySelection` means it chose lots adding up to nothing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationError {
    #[error("Sale quantity cannot be negative: {0}")]
    NegativeQuantity(Decimal),

    #[error("Sale price cannot be negative: {0}")]
    NegativePrice(Decimal),

    #[error("Cannot sell {requested}: only {available} open")]
    InsufficientQuantity {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Manual costing requires a lot selection")]
    SelectionPending,

    #[error("Lot selection is empty for a sale of {desired}")]
    EmptySelection { desired: Decimal },

    #[error("Lot {0} is not open")]
    UnknownLot(String),

    #[error("Lot {0} selected more than once")]
    DuplicateLot(String),

    #[error("Negative quantity {quantity} selected from lot {lot_id}")]
    NegativeSelection { lot_id: String, quantity: Decimal },

    #[error("Lot {lot_id} holds {available}, {requested} selected")]
    ExceedsLot {
        lot_id: String,
        requested: Decimal,
        available: Decimal,
    },

    #[error("Selected {selected} does not match sale quantity {desired}")]
    SelectionMismatch { selected: Decimal, desired: Decimal },
}
