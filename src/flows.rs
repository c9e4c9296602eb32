//! Hub-and-spoke flow graphs for the Sankey views.
//!
//! Node indices are plain positions in `nodes`; they are rebuilt on every
//! load and are not stable identifiers. Duplicate chain names are kept as
//! separate nodes.

use crate::models::{ChainFlowRow, FlowEdge, FlowGraph};

/// Hub → chain. The hub is node 0 and row `i` becomes node `i + 1`.
pub fn build_outflow_graph(hub: &str, rows: &[ChainFlowRow]) -> FlowGraph {
    let mut nodes = Vec::with_capacity(rows.len() + 1);
    nodes.push(hub.to_string());
    nodes.extend(rows.iter().map(|r| r.chain_name.clone()));

    let edges = rows
        .iter()
        .enumerate()
        .map(|(i, r)| FlowEdge { source: 0, target: i + 1, value: r.value })
        .collect();

    FlowGraph { nodes, edges }
}

/// Chain → hub. Row `i` becomes node `i` and the hub is the last node.
pub fn build_inflow_graph(hub: &str, rows: &[ChainFlowRow]) -> FlowGraph {
    let hub_ix = rows.len();
    let mut nodes: Vec<String> = rows.iter().map(|r| r.chain_name.clone()).collect();
    nodes.push(hub.to_string());

    let edges = rows
        .iter()
        .enumerate()
        .map(|(i, r)| FlowEdge { source: i, target: hub_ix, value: r.value })
        .collect();

    FlowGraph { nodes, edges }
}
