//! Classifies positions into rubros and aggregates totals bottom-up.

use chrono::NaiveDate;
use log::debug;
use std::collections::{BTreeMap, HashMap};

use super::item_valuation::{
    is_significant, upstream_drift, value_fixed_deposit, value_row, yield_meta, ValuationContext,
};
use super::rubro_rules::{rule_by_id, rule_for, RubroSpecial, RUBRO_RULES};
use super::{DiagnosticEvent, DiagnosticsSink, Item, Provider, Rubro, RubroId, Totals};
use crate::accounts::Account;
use crate::assets::{AssetCategory, GroupedPositions};
use crate::constants::{CASH_PROVIDER_ID_SUFFIX, CASH_PROVIDER_SUFFIX};
use crate::fixed_deposits::FixedDepositData;
use crate::fx::{FxFamily, FxOverridesMap, FxRates};
use crate::movements::MovementIndex;
use crate::settings::{effective_class, effective_name, AccountSettingsMap, EngineConfig};

/// Everything one rubro build reads.
pub struct BuildContext<'a> {
    pub positions: &'a GroupedPositions,
    pub accounts: &'a [Account],
    pub fixed_deposits: Option<&'a FixedDepositData>,
    pub rates: &'a FxRates,
    pub account_settings: &'a AccountSettingsMap,
    pub fx_overrides: &'a FxOverridesMap,
    pub movements: &'a MovementIndex<'a>,
    pub valuation_date: NaiveDate,
    pub config: &'a EngineConfig,
    pub diagnostics: &'a dyn DiagnosticsSink,
}

struct ProviderDraft {
    name: String,
    items: Vec<Item>,
}

#[derive(Default)]
struct Drafts {
    by_rubro: BTreeMap<RubroId, BTreeMap<String, ProviderDraft>>,
    /// `(account id, instrument key)` already placed, and where.
    claimed: HashMap<(String, String), RubroId>,
}

impl Drafts {
    /// Records the claim. Returns the rubro holding an earlier claim, if any.
    fn claim(&mut self, account_id: &str, instrument_key: &str, rubro: RubroId) -> Option<RubroId> {
        let key = (account_id.to_string(), instrument_key.to_string());
        if let Some(existing) = self.claimed.get(&key) {
            return Some(*existing);
        }
        self.claimed.insert(key, rubro);
        None
    }

    fn push(&mut self, rubro: RubroId, provider_id: String, provider_name: String, item: Item) {
        self.by_rubro
            .entry(rubro)
            .or_default()
            .entry(provider_id)
            .or_insert_with(|| ProviderDraft {
                name: provider_name,
                items: Vec::new(),
            })
            .items
            .push(item);
    }
}

fn common_family<'a>(mut items: impl Iterator<Item = &'a Item>) -> Option<FxFamily> {
    let first = items.next()?.fx_family()?;
    items.all(|item| item.fx_family() == Some(first)).then_some(first)
}

fn finish_provider(id: String, draft: ProviderDraft) -> Provider {
    let mut items = draft.items;
    items.sort_by(|a, b| b.val_ars.cmp(&a.val_ars).then_with(|| a.id.cmp(&b.id)));
    let totals: Totals = items.iter().map(Item::totals).sum();
    let fx_family = common_family(items.iter());
    Provider {
        id,
        name: draft.name,
        items,
        totals,
        fx_family,
    }
}

fn finish_rubro(id: RubroId, drafts: BTreeMap<String, ProviderDraft>) -> Option<Rubro> {
    let mut providers: Vec<Provider> = drafts
        .into_iter()
        .filter(|(_, draft)| !draft.items.is_empty())
        .map(|(id, draft)| finish_provider(id, draft))
        .collect();
    if providers.is_empty() {
        return None;
    }
    providers.sort_by(|a, b| {
        b.totals
            .ars
            .cmp(&a.totals.ars)
            .then_with(|| a.id.cmp(&b.id))
    });

    let totals: Totals = providers.iter().map(|p| p.totals).sum();
    let fx_family = common_family(providers.iter().flat_map(|p| p.items.iter()));
    Some(Rubro {
        id,
        name: rule_by_id(id).name.to_string(),
        providers,
        totals,
        fx_family,
    })
}

fn place_positions(ctx: &BuildContext<'_>, drafts: &mut Drafts) {
    let accounts: HashMap<&str, &Account> =
        ctx.accounts.iter().map(|a| (a.id.as_str(), a)).collect();

    for (account_id, rows) in ctx.positions {
        let placeholder;
        let account = match accounts.get(account_id.as_str()) {
            Some(account) => *account,
            None => {
                ctx.diagnostics.report(DiagnosticEvent::UnknownAccount {
                    account_id: account_id.clone(),
                });
                placeholder = Account::placeholder(account_id);
                &placeholder
            }
        };
        let settings = ctx.account_settings.get(account_id);
        let class = effective_class(account, settings);
        let name = effective_name(account, settings);
        let valuation = ValuationContext {
            account_id,
            class,
            overrides: ctx.fx_overrides,
            rates: ctx.rates,
            movements: ctx.movements,
        };

        for row in rows {
            let skip = |reason: &str| DiagnosticEvent::SkippedPosition {
                account_id: account_id.clone(),
                instrument_key: row.instrument_key().to_string(),
                category: row.category,
                reason: reason.to_string(),
            };
            if row.category == AssetCategory::Pf {
                ctx.diagnostics
                    .report(skip("fixed deposits are sourced from deposit data"));
                continue;
            }
            let Some(rule) = rule_for(class, row.category) else {
                ctx.diagnostics.report(skip("no rubro accepts this position"));
                continue;
            };
            if let Some(kept_in) = drafts.claim(account_id, row.instrument_key(), rule.id) {
                ctx.diagnostics.report(DiagnosticEvent::DuplicateHolding {
                    account_id: account_id.clone(),
                    instrument_key: row.instrument_key().to_string(),
                    kept_in,
                });
                continue;
            }

            let mut item = value_row(&valuation, row);
            if let Some(event) = upstream_drift(row, &item, ctx.config.upstream_drift_pct) {
                ctx.diagnostics.report(event);
            }
            if !is_significant(&item, &ctx.config.thresholds) {
                debug!("Dropping insignificant position {}", item.id);
                continue;
            }

            if item.kind.is_cash()
                && (rule.special == RubroSpecial::YieldBearing
                    || account.yield_for(item.native_currency).is_some())
            {
                item.yield_meta = yield_meta(account, settings, item.native_currency);
            }

            let carve_out = rule.special == RubroSpecial::CashCarveOut
                && class.is_investment_venue()
                && item.kind.is_cash();
            let (provider_id, provider_name) = if carve_out {
                (
                    format!("{}{}", account_id, CASH_PROVIDER_ID_SUFFIX),
                    format!("{}{}", name, CASH_PROVIDER_SUFFIX),
                )
            } else {
                (account_id.clone(), name.to_string())
            };
            drafts.push(rule.id, provider_id, provider_name, item);
        }
    }
}

fn place_fixed_deposits(ctx: &BuildContext<'_>, drafts: &mut Drafts) {
    let Some(data) = ctx.fixed_deposits else {
        return;
    };
    debug!(
        "Placing {} active fixed deposits ({} matured ignored)",
        data.active.len(),
        data.matured.len()
    );

    for deposit in &data.active {
        if let Some(kept_in) = drafts.claim(&deposit.bank_id, &deposit.id, RubroId::Plazos) {
            ctx.diagnostics.report(DiagnosticEvent::DuplicateHolding {
                account_id: deposit.bank_id.clone(),
                instrument_key: deposit.id.clone(),
                kept_in,
            });
            continue;
        }
        let item = value_fixed_deposit(deposit, ctx.valuation_date, ctx.fx_overrides, ctx.rates);
        if !is_significant(&item, &ctx.config.thresholds) {
            debug!("Dropping fixed deposit {} without principal", deposit.id);
            continue;
        }
        drafts.push(
            RubroId::Plazos,
            deposit.bank_id.clone(),
            deposit.bank_name.clone(),
            item,
        );
    }
}

/// Builds the rubro tree. Empty providers and rubros are omitted.
pub fn build_rubros(ctx: &BuildContext<'_>) -> Vec<Rubro> {
    let mut drafts = Drafts::default();
    place_positions(ctx, &mut drafts);
    place_fixed_deposits(ctx, &mut drafts);

    RUBRO_RULES
        .iter()
        .filter_map(|rule| {
            let providers = drafts.by_rubro.remove(&rule.id)?;
            finish_rubro(rule.id, providers)
        })
        .collect()
}
