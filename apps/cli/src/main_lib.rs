use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use cartera_core::{
    DiagnosticEvent, DiagnosticsSink, PortfolioInputs, PortfolioService, PortfolioServiceTrait,
    PortfolioV2,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

pub fn init_tracing() {
    let log_format = std::env::var("CARTERA_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Forwards engine diagnostics as structured tracing events.
struct TracingDiagnostics;

impl DiagnosticsSink for TracingDiagnostics {
    fn report(&self, event: DiagnosticEvent) {
        match serde_json::to_string(&event) {
            Ok(payload) => tracing::warn!(diagnostic = %payload, "portfolio diagnostic"),
            Err(err) => tracing::warn!("unserializable diagnostic {:?}: {}", event, err),
        }
    }
}

pub fn load_inputs(path: &Path) -> anyhow::Result<PortfolioInputs> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading input {}", path.display()))?;
    let inputs: PortfolioInputs = serde_json::from_str(&raw)
        .with_context(|| format!("parsing input {}", path.display()))?;
    if let Err(err) = inputs.validate() {
        tracing::warn!("Input has malformed records: {}", err);
    }
    Ok(inputs)
}

pub fn build(config: &Config) -> anyhow::Result<PortfolioV2> {
    let inputs = load_inputs(&config.input_path)?;
    tracing::info!(
        accounts = inputs.accounts.len(),
        movements = inputs.movements.len(),
        "Building portfolio from {}",
        config.input_path.display()
    );
    let service = PortfolioService::new(config.engine.clone(), Arc::new(TracingDiagnostics));
    Ok(service.build(&inputs))
}

pub fn render(portfolio: &PortfolioV2, pretty: bool) -> anyhow::Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(portfolio)?
    } else {
        serde_json::to_string(portfolio)?
    };
    Ok(json)
}
