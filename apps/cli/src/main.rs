mod config;
mod main_lib;

use std::io::Write;

use config::Config;
use main_lib::{build, init_tracing, render};

fn main() -> anyhow::Result<()> {
    let config = Config::from_env(std::env::args().nth(1))?;
    init_tracing();

    let portfolio = build(&config)?;
    tracing::info!(
        rubros = portfolio.rubros.len(),
        total_ars = %portfolio.kpis.total_ars,
        total_usd = %portfolio.kpis.total_usd,
        "Portfolio built as of {}",
        portfolio.valuation_date
    );

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", render(&portfolio, config.pretty)?)?;
    Ok(())
}
