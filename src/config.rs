use dotenvy::dotenv;
use eyre::Result;
use std::{env, str::FromStr};
use tracing::info;

use crate::source::Source;

#[derive(Debug, Clone)]
pub struct Config {
    pub time_series: Source,
    pub outflow: Source,
    pub inflow: Source,
    pub hub_network: String,
    pub history_window: usize,
    pub port: u16,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional env value, falling back when it is missing or malformed
fn parse_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}

pub fn load() -> Result<Config> {
    dotenv().ok();

    // Local paths or http(s) URLs of the warehouse exports
    let time_series = Source::parse(&var_or("TIME_SERIES_SOURCE", "public/allbridge.csv"));
    let outflow = Source::parse(&var_or("OUTFLOW_SOURCE", "public/outflow.csv"));
    let inflow = Source::parse(&var_or("INFLOW_SOURCE", "public/inflow.csv"));

    let hub_network = var_or("HUB_NETWORK", "Algorand");

    // Periods shown in the history chart (default: 12)
    let history_window = parse_or(env::var("HISTORY_WINDOW").ok(), 12);

    // API port (default: 8080)
    let port = parse_or(env::var("PORT").ok(), 8080);

    let cfg = Config {
        time_series,
        outflow,
        inflow,
        hub_network,
        history_window,
        port,
    };

    info!("Loaded config: {:?}", cfg);

    Ok(cfg)
}
