//! Top-level portfolio build.

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::details::{build_lot_detail, build_plazo_detail, build_wallet_yield_detail};
use super::kpis::build_kpis;
use super::rubros_builder::{build_rubros, BuildContext};
use super::{
    check_consistency, DiagnosticsSink, LogDiagnostics, PortfolioV2, Rubro, RubroId,
};
use crate::accounts::Account;
use crate::assets::GroupedPositions;
use crate::errors::Result;
use crate::fixed_deposits::{FixedDeposit, FixedDepositData};
use crate::fx::{FxOverridesMap, FxRates};
use crate::movements::{Movement, MovementIndex};
use crate::settings::{AccountSettingsMap, EngineConfig};
use crate::utils::time_utils::valuation_date_today;

/// Snapshot of everything a portfolio build consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioInputs {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub movements: Vec<Movement>,
    #[serde(default)]
    pub positions: GroupedPositions,
    #[serde(default)]
    pub fx_rates: FxRates,
    #[serde(default)]
    pub account_settings: AccountSettingsMap,
    #[serde(default)]
    pub fx_overrides: FxOverridesMap,
    pub fixed_deposits: Option<FixedDepositData>,
    /// Defaults to today in Buenos Aires.
    pub valuation_date: Option<NaiveDate>,
}

impl PortfolioInputs {
    /// Checks accounts, movements and deposits for malformed records.
    ///
    /// A build never requires this; it degrades instead of failing.
    pub fn validate(&self) -> Result<()> {
        for account in &self.accounts {
            account.validate()?;
        }
        for movement in &self.movements {
            movement.validate()?;
        }
        if let Some(data) = &self.fixed_deposits {
            for deposit in data.active.iter().chain(data.matured.iter()) {
                deposit.validate()?;
            }
        }
        Ok(())
    }
}

pub trait PortfolioServiceTrait: Send + Sync {
    fn build(&self, inputs: &PortfolioInputs) -> PortfolioV2;
}

pub struct PortfolioService {
    config: EngineConfig,
    diagnostics: Arc<dyn DiagnosticsSink>,
}

impl Default for PortfolioService {
    fn default() -> Self {
        PortfolioService::new(EngineConfig::default(), Arc::new(LogDiagnostics))
    }
}

impl PortfolioService {
    pub fn new(config: EngineConfig, diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
        PortfolioService {
            config,
            diagnostics,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl PortfolioServiceTrait for PortfolioService {
    fn build(&self, inputs: &PortfolioInputs) -> PortfolioV2 {
        let valuation_date = inputs.valuation_date.unwrap_or_else(valuation_date_today);
        let movements = MovementIndex::new(&inputs.movements);
        debug!(
            "Building portfolio as of {} from {} accounts and {} movements",
            valuation_date,
            inputs.accounts.len(),
            inputs.movements.len()
        );

        let rubros = build_rubros(&BuildContext {
            positions: &inputs.positions,
            accounts: &inputs.accounts,
            fixed_deposits: inputs.fixed_deposits.as_ref(),
            rates: &inputs.fx_rates,
            account_settings: &inputs.account_settings,
            fx_overrides: &inputs.fx_overrides,
            movements: &movements,
            valuation_date,
            config: &self.config,
            diagnostics: self.diagnostics.as_ref(),
        });
        let kpis = build_kpis(&rubros, &inputs.fx_rates);

        let mut portfolio = PortfolioV2 {
            valuation_date,
            fx: inputs.fx_rates.clone(),
            kpis,
            rubros: Vec::new(),
            wallet_details: BTreeMap::new(),
            plazo_details: BTreeMap::new(),
            cedear_details: BTreeMap::new(),
            crypto_details: BTreeMap::new(),
            fci_details: BTreeMap::new(),
        };
        self.attach_details(
            &mut portfolio,
            &rubros,
            &movements,
            inputs.fixed_deposits.as_ref(),
        );
        portfolio.rubros = rubros;

        self.diagnostics.report_batch(check_consistency(&portfolio));
        portfolio
    }
}

impl PortfolioService {
    fn attach_details(
        &self,
        portfolio: &mut PortfolioV2,
        rubros: &[Rubro],
        movements: &MovementIndex<'_>,
        fixed_deposits: Option<&FixedDepositData>,
    ) {
        // Deposit ids are only unique within a bank.
        let deposits: HashMap<&str, HashMap<&str, &FixedDeposit>> =
            fixed_deposits.map_or_else(HashMap::new, |data| {
                let mut by_bank: HashMap<&str, HashMap<&str, &FixedDeposit>> = HashMap::new();
                for deposit in &data.active {
                    by_bank
                        .entry(deposit.bank_id.as_str())
                        .or_default()
                        .insert(deposit.id.as_str(), deposit);
                }
                by_bank
            });
        let diagnostics = self.diagnostics.as_ref();

        for rubro in rubros {
            for item in rubro.items() {
                let lot_detail = || {
                    build_lot_detail(
                        item,
                        movements.for_position(&item.account_id, item.instrument_key()),
                        diagnostics,
                    )
                };
                match rubro.id {
                    RubroId::Cedears => {
                        portfolio.cedear_details.insert(item.id.clone(), lot_detail());
                    }
                    RubroId::Crypto => {
                        portfolio.crypto_details.insert(item.id.clone(), lot_detail());
                    }
                    RubroId::Fondos => {
                        portfolio.fci_details.insert(item.id.clone(), lot_detail());
                    }
                    RubroId::Plazos => {
                        let deposit = deposits
                            .get(item.account_id.as_str())
                            .and_then(|by_id| by_id.get(item.instrument_key()));
                        if let Some(deposit) = deposit {
                            portfolio.plazo_details.insert(
                                item.id.clone(),
                                build_plazo_detail(item, deposit, portfolio.valuation_date),
                            );
                        }
                    }
                    RubroId::Wallets | RubroId::Frascos => {
                        if let Some(meta) = &item.yield_meta {
                            portfolio.wallet_details.insert(
                                item.id.clone(),
                                build_wallet_yield_detail(item, meta, portfolio.valuation_date),
                            );
                        }
                    }
                }
            }
        }
    }
}

/// Builds a portfolio with default thresholds, logging diagnostics.
pub fn build_portfolio(inputs: &PortfolioInputs) -> PortfolioV2 {
    PortfolioService::default().build(inputs)
}
