//! Portfolio module - rubro classification, valuation, KPIs and detail overlays.

mod details;
mod diagnostics;
mod item_valuation;
mod kpis;
mod portfolio_model;
mod portfolio_service;
mod rubro_rules;
mod rubros_builder;

#[cfg(test)]
mod details_tests;

pub use details::{
    build_lot_detail, build_plazo_detail, build_wallet_yield_detail, LotDetail, LotLine,
    PlazoDetail, WalletYieldDetail,
};
pub use diagnostics::{
    check_consistency, CollectingDiagnostics, DiagnosticEvent, DiagnosticsSink, LogDiagnostics,
    NoopDiagnostics,
};
pub use item_valuation::{is_significant, price_row, to_reporting, value_row, ValuationContext};
pub use kpis::build_kpis;
pub use portfolio_model::{
    Item, ItemKind, ItemPnl, PortfolioKpis, PortfolioV2, PriceMeta, PriceSource, Provider, Rubro,
    RubroId, Totals, YieldMeta,
};
pub use portfolio_service::{
    build_portfolio, PortfolioInputs, PortfolioService, PortfolioServiceTrait,
};
pub use rubro_rules::{rule_for, RubroRule, RubroSpecial, RUBRO_RULES};
pub use rubros_builder::{build_rubros, BuildContext};
