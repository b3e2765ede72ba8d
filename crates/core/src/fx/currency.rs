use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reporting currencies of the engine.
///
/// Dollar stablecoins are valued as USD; the FX family that applies to
/// them is decided by the resolver, not by the currency code.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Ars,
    #[serde(alias = "USDT", alias = "USDC", alias = "DAI")]
    Usd,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Ars => "ARS",
            Currency::Usd => "USD",
        }
    }

    pub fn is_usd(&self) -> bool {
        matches!(self, Currency::Usd)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize_currency_code(s).ok_or_else(|| format!("unsupported currency: {s}"))
    }
}

/// Maps a free-form currency code to a reporting currency.
pub fn normalize_currency_code(code: &str) -> Option<Currency> {
    match code.trim().to_uppercase().as_str() {
        "ARS" | "$" => Some(Currency::Ars),
        "USD" | "US$" | "U$S" | "USDT" | "USDC" | "DAI" => Some(Currency::Usd),
        _ => None,
    }
}
