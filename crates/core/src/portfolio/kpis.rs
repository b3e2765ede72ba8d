//! Portfolio totals and the three-way currency exposure split.

use rust_decimal::Decimal;

use super::{PortfolioKpis, Rubro, RubroId, Totals};
use crate::fx::{Currency, FxFamily, FxRates, FxSide};
use crate::utils::decimal_utils::{percent_of, round_money};

/// Rate used to express the ARS bucket in USD: MEP sell, then Oficial sell, then 1.
fn reference_rate(rates: &FxRates) -> (Decimal, Option<FxFamily>, bool) {
    [FxFamily::Mep, FxFamily::Oficial]
        .into_iter()
        .find_map(|family| {
            rates
                .rate(family, FxSide::Sell)
                .map(|rate| (rate.value(), Some(family), false))
        })
        .unwrap_or((Decimal::ONE, None, true))
}

/// Reduces rubros to portfolio KPIs.
///
/// Totals are sums of rubro totals, never recomputed from a single rate.
/// The ARS percentage is the remainder of the other two so the split
/// always closes at 100.
pub fn build_kpis(rubros: &[Rubro], rates: &FxRates) -> PortfolioKpis {
    let totals: Totals = rubros.iter().map(|r| r.totals).sum();

    let mut usd_hard = Decimal::ZERO;
    let mut usd_equivalent = Decimal::ZERO;
    let mut ars_real = Decimal::ZERO;
    for rubro in rubros {
        match rubro.id {
            RubroId::Crypto => usd_hard += rubro.totals.usd,
            RubroId::Wallets | RubroId::Frascos => {
                for item in rubro.items() {
                    match item.native_currency {
                        Currency::Usd => usd_hard += item.val_usd,
                        Currency::Ars => ars_real += item.val_ars,
                    }
                }
            }
            RubroId::Cedears | RubroId::Plazos | RubroId::Fondos => {
                usd_equivalent += rubro.items().map(|item| item.val_usd).sum::<Decimal>();
            }
        }
    }

    let (ref_rate, ref_rate_family, ref_rate_fallback) = reference_rate(rates);
    let ars_real_usd = round_money(ars_real / ref_rate);
    let exposure = usd_hard + usd_equivalent + ars_real_usd;

    let (pct_usd_hard, pct_usd_eq, pct_ars) = if exposure > Decimal::ZERO {
        // USD shares are rounded cumulatively.
        let hard = round_money(percent_of(usd_hard, exposure));
        let usd_total = round_money(percent_of(usd_hard + usd_equivalent, exposure));
        (hard, usd_total - hard, Decimal::ONE_HUNDRED - usd_total)
    } else {
        (Decimal::ZERO, Decimal::ZERO, Decimal::ONE_HUNDRED)
    };

    PortfolioKpis {
        total_ars: totals.ars,
        total_usd: totals.usd,
        usd_hard,
        usd_equivalent,
        ars_real,
        ars_real_usd,
        ref_rate,
        ref_rate_family,
        ref_rate_fallback,
        pct_usd_hard,
        pct_usd_eq,
        pct_ars,
    }
}
