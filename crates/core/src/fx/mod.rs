//! FX (Foreign Exchange) module - rate snapshot, overrides and resolution.

pub mod currency;
mod fx_model;
mod fx_resolver;


pub use currency::{normalize_currency_code, Currency};
pub use fx_model::{
    ConversionDirection, FxFamily, FxOverride, FxOverridesMap, FxQuote, FxRateSource, FxRates,
    FxSide, PositiveRate, ResolvedFx,
};
pub use fx_resolver::{account_class_family, default_family, resolve_fx};
