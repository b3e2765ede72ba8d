//! Picks the FX family and side a valuation must use.

use log::debug;

use super::{
    ConversionDirection, FxFamily, FxOverride, FxRateSource, FxRates, ResolvedFx,
};
use crate::accounts::AccountClass;
use crate::assets::AssetCategory;

/// Family an account class implies for its cash and unclassified holdings.
pub fn account_class_family(class: AccountClass) -> FxFamily {
    match class {
        AccountClass::Exchange => FxFamily::Cripto,
        AccountClass::Broker => FxFamily::Mep,
        AccountClass::Wallet | AccountClass::Frasco => FxFamily::Oficial,
    }
}

/// Automatic family for a holding.
///
/// Cash follows the venue it sits in; tradeable assets follow the market
/// they are quoted in, wherever they are held.
pub fn default_family(class: AccountClass, category: AssetCategory) -> FxFamily {
    match category {
        AssetCategory::CashArs | AssetCategory::CashUsd | AssetCategory::Other => {
            account_class_family(class)
        }
        AssetCategory::Cedear => FxFamily::Mep,
        AssetCategory::Crypto | AssetCategory::Stable => FxFamily::Cripto,
        AssetCategory::Fci | AssetCategory::Pf => FxFamily::Oficial,
    }
}

/// Resolves the rate for one conversion.
///
/// An override wins only if it points at a positive quote. Without one,
/// the automatic family is used, then Oficial on the same side. `None`
/// means no usable rate exists in the snapshot.
pub fn resolve_fx(
    class: AccountClass,
    category: AssetCategory,
    direction: ConversionDirection,
    manual_override: Option<&FxOverride>,
    rates: &FxRates,
) -> Option<ResolvedFx> {
    if let Some(ov) = manual_override {
        match rates.rate(ov.family, ov.side) {
            Some(rate) => {
                return Some(ResolvedFx {
                    family: ov.family,
                    side: ov.side,
                    rate,
                    source: FxRateSource::Override,
                })
            }
            None => debug!(
                "Override {} {:?} has no usable quote, using automatic resolution",
                ov.family, ov.side
            ),
        }
    }

    let side = direction.side();
    let family = default_family(class, category);
    if let Some(rate) = rates.rate(family, side) {
        return Some(ResolvedFx {
            family,
            side,
            rate,
            source: FxRateSource::Auto,
        });
    }

    if family != FxFamily::Oficial {
        if let Some(rate) = rates.rate(FxFamily::Oficial, side) {
            debug!("No {} {:?} quote, falling back to OFICIAL", family, side);
            return Some(ResolvedFx {
                family: FxFamily::Oficial,
                side,
                rate,
                source: FxRateSource::Fallback,
            });
        }
    }

    None
}
