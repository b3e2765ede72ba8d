/// Decimal precision for item-level ARS/USD valuations
pub const DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Quantity threshold for significant positions and lots
pub const QUANTITY_THRESHOLD: &str = "0.00000001";

/// Minimum absolute ARS value for a cash balance to be listed
pub const MIN_CASH_ARS: &str = "1";

/// Minimum absolute quantity for a USD cash balance to be listed
pub const MIN_CASH_USD_QTY: &str = "0.01";

/// Minimum ARS value for a tradeable position to be listed
pub const MIN_ASSET_ARS: &str = "1";

/// Relative difference (percent) above which an upstream valuation is reported as drifting
pub const UPSTREAM_DRIFT_PCT: &str = "1";

/// Suffix appended to broker/exchange providers carved out into the Wallets rubro
pub const CASH_PROVIDER_SUFFIX: &str = " (Liquidez)";

/// Suffix appended to broker/exchange provider ids carved out into the Wallets rubro
pub const CASH_PROVIDER_ID_SUFFIX: &str = "-cash";

/// Days in a year for nominal rate accruals
pub const DAYS_PER_YEAR: i64 = 365;

/// Settings store key holding the FX override map
pub const FX_OVERRIDES_KEY: &str = "fx_overrides";

/// Settings store key holding the account settings map
pub const ACCOUNT_SETTINGS_KEY: &str = "account_settings";
