use std::path::PathBuf;

use anyhow::{anyhow, Context};
use cartera_core::settings::EngineConfig;

pub struct Config {
    pub input_path: PathBuf,
    pub engine: EngineConfig,
    pub pretty: bool,
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

impl Config {
    /// Reads configuration from the environment, loading `.env` first.
    /// `arg` is the first positional argument and wins over `CARTERA_INPUT`.
    pub fn from_env(arg: Option<String>) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let input_path = arg
            .or_else(|| std::env::var("CARTERA_INPUT").ok())
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("no input: pass a path or set CARTERA_INPUT"))?;

        let engine = match std::env::var("CARTERA_ENGINE_CONFIG") {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading engine config {}", path))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing engine config {}", path))?
            }
            Err(_) => EngineConfig::default(),
        };
        let pretty = std::env::var("CARTERA_PRETTY")
            .map(|v| parse_flag(&v))
            .unwrap_or(true);

        Ok(Self {
            input_path,
            engine,
            pretty,
        })
    }
}
