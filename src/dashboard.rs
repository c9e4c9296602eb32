// src/dashboard.rs
use futures_util::future::try_join3;
use reqwest::Client;
use tracing::{info, warn};

use crate::{aggregator, chart, flows, parser};
use crate::config::Config;
use crate::models::{Dashboard, FlowGraph, Panel};
use crate::source::{fetch_text, LoadError};

fn graph_panel(graph: FlowGraph) -> Panel<FlowGraph> {
    if graph.is_empty() {
        Panel::NoData
    } else {
        Panel::Ready(graph)
    }
}

/// Fetch all three exports together and derive every dashboard section.
/// Any failed fetch aborts the whole load; nothing is kept between loads.
pub async fn load(cfg: &Config, client: &Client) -> Result<Dashboard, LoadError> {
    let (series_csv, outflow_csv, inflow_csv) = try_join3(
        fetch_text(client, "time_series", &cfg.time_series),
        fetch_text(client, "outflow", &cfg.outflow),
        fetch_text(client, "inflow", &cfg.inflow),
    )
    .await?;

    let series = parser::decode_time_series(&series_csv);
    let outflow_rows = parser::decode_chain_flows(&outflow_csv);
    let inflow_rows = parser::decode_chain_flows(&inflow_csv);

    let (metrics, chart) = match aggregator::derive_metrics(&series) {
        Ok(m) => {
            let window = chart::chart_window(&m.history, cfg.history_window);
            (Panel::Ready(m), Panel::Ready(window))
        }
        Err(e) => {
            info!("Metrics not ready: {}", e);
            (Panel::NoData, Panel::NoData)
        }
    };

    if outflow_rows.is_empty() || inflow_rows.is_empty() {
        warn!(
            "Flow tables incomplete (outflow {} rows, inflow {} rows)",
            outflow_rows.len(),
            inflow_rows.len()
        );
    }

    let outflow = graph_panel(flows::build_outflow_graph(&cfg.hub_network, &outflow_rows));
    let inflow = graph_panel(flows::build_inflow_graph(&cfg.hub_network, &inflow_rows));

    Ok(Dashboard {
        hub: cfg.hub_network.clone(),
        metrics,
        chart,
        outflow,
        inflow,
        outflow_rows,
        inflow_rows,
    })
}
