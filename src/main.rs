mod aggregator;
mod api;
mod chart;
mod config;
mod dashboard;
mod flows;
mod models;
mod parser;
mod source;

use models::Panel;
use reqwest::Client;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_writer(std::io::stdout)
        .with_target(false)
        .init();

    info!("Bridge dashboard starting...");

    let cfg = config::load()?;
    info!("  Hub network: {}", cfg.hub_network);
    info!("  Time series: {:?}", cfg.time_series);
    info!("  Outflow: {:?}", cfg.outflow);
    info!("  Inflow: {:?}", cfg.inflow);
    info!("  History window: {}", cfg.history_window);

    let client = Client::builder().build()?;

    // Warm-up load so a broken export shows up in the logs right away
    match dashboard::load(&cfg, &client).await {
        Ok(d) => {
            if let Panel::Ready(m) = &d.metrics {
                info!(
                    "Current period: {} tx ({}%), {} users ({}%), ${} volume ({}%)",
                    m.current_transactions,
                    m.transactions_delta.round_dp(2),
                    m.current_users,
                    m.users_delta.round_dp(2),
                    m.current_volume.round_dp(0),
                    m.volume_delta.round_dp(2),
                );
            } else {
                info!("Not enough history yet for month-over-month metrics");
            }
            info!(
                "Flow graphs: outflow ready = {}, inflow ready = {}",
                d.outflow.is_ready(),
                d.inflow.is_ready()
            );
        }
        Err(e) => error!("Warm-up load failed: {}", e),
    }

    let api_handle = tokio::spawn({
        let cfg = cfg.clone();
        let client = client.clone();
        async move { api::serve(cfg, client).await }
    });

    tokio::select! {
        res = api_handle => match res {
            Ok(Ok(_)) => info!("API exited cleanly"),
            Ok(Err(e)) => error!("API error: {:?}", e),
            Err(e) => error!("API task panicked: {:?}", e),
        },
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received, stopping...");
        }
    }

    info!("Bridge dashboard stopped.");
    Ok(())
}
