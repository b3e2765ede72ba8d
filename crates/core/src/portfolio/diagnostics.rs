//! Structured anomaly reporting for portfolio builds.
//!
//! The engine reports every anomaly it detects to a [`DiagnosticsSink`].
//! Sinks are best-effort observers: nothing they do changes the portfolio.

use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use super::{PortfolioV2, RubroId, Totals};
use crate::assets::AssetCategory;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticEvent {
    /// A position was claimed twice; the second claim was dropped.
    DuplicateHolding {
        account_id: String,
        instrument_key: String,
        kept_in: RubroId,
    },

    /// An aggregate differs from the sum of its parts.
    TotalsMismatch {
        scope: String,
        expected: Totals,
        actual: Totals,
    },

    /// A position row was not classified.
    SkippedPosition {
        account_id: String,
        instrument_key: String,
        category: AssetCategory,
        reason: String,
    },

    /// Positions reference an account the caller did not supply.
    UnknownAccount { account_id: String },

    /// Open lots do not add up to the quantity the position reports.
    LotQuantityMismatch {
        item_id: String,
        lot_quantity: Decimal,
        item_quantity: Decimal,
    },

    /// The upstream valuation disagrees with the recomputed one.
    UpstreamValuationDrift {
        item_id: String,
        upstream_ars: Decimal,
        computed_ars: Decimal,
    },
}

pub trait DiagnosticsSink: Send + Sync {
    fn report(&self, event: DiagnosticEvent);

    fn report_batch(&self, events: Vec<DiagnosticEvent>) {
        for event in events {
            self.report(event);
        }
    }
}

/// Forwards events to the `log` facade.
#[derive(Clone, Default)]
pub struct LogDiagnostics;

impl DiagnosticsSink for LogDiagnostics {
    fn report(&self, event: DiagnosticEvent) {
        match &event {
            DiagnosticEvent::TotalsMismatch { .. } | DiagnosticEvent::DuplicateHolding { .. } => {
                warn!("Portfolio diagnostic: {:?}", event)
            }
            _ => debug!("Portfolio diagnostic: {:?}", event),
        }
    }
}

#[derive(Clone, Default)]
pub struct NoopDiagnostics;

impl DiagnosticsSink for NoopDiagnostics {
    fn report(&self, _event: DiagnosticEvent) {}
}

/// Keeps every reported event in memory.
#[derive(Clone, Default)]
pub struct CollectingDiagnostics {
    events: Arc<Mutex<Vec<DiagnosticEvent>>>,
}

impl CollectingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DiagnosticEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn clear(&self) {
        match self.events.lock() {
            Ok(mut events) => events.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }

    pub fn len(&self) -> usize {
        self.events().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticsSink for CollectingDiagnostics {
    fn report(&self, event: DiagnosticEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

/// Recomputes every aggregate of `portfolio` from its items.
/// Returns one `TotalsMismatch` per aggregate that disagrees.
pub fn check_consistency(portfolio: &PortfolioV2) -> Vec<DiagnosticEvent> {
    let mut events = Vec::new();
    let mut mismatch = |scope: String, expected: Totals, actual: Totals| {
        if expected != actual {
            events.push(DiagnosticEvent::TotalsMismatch {
                scope,
                expected,
                actual,
            });
        }
    };

    for rubro in &portfolio.rubros {
        for provider in &rubro.providers {
            let items: Totals = provider.items.iter().map(|i| i.totals()).sum();
            mismatch(
                format!("provider {}/{}", rubro.id, provider.id),
                items,
                provider.totals,
            );
        }
        let providers: Totals = rubro.providers.iter().map(|p| p.totals).sum();
        mismatch(format!("rubro {}", rubro.id), providers, rubro.totals);
    }

    let rubros: Totals = portfolio.rubros.iter().map(|r| r.totals).sum();
    mismatch(
        "kpis".to_string(),
        rubros,
        Totals {
            ars: portfolio.kpis.total_ars,
            usd: portfolio.kpis.total_usd,
        },
    );

    events
}
