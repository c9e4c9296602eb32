// src/models.rs
use serde::Serialize;
use rust_decimal::Decimal;

/// One calendar month of bridge activity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesRow {
    pub period: String,               // "YYYY-MM", sorts lexicographically
    pub transactions: u64,
    pub active_users: u64,
    pub source_volume: Decimal,
    pub destination_volume: Decimal,
    pub total_volume: Decimal,        // ≈ source + destination, not enforced
    pub transactions_to_date: u64,
    pub users_to_date: u64,
    pub volume_to_date: Decimal,
}

/// Aggregate flow between the hub network and one counterparty chain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainFlowRow {
    pub chain_name: String,
    pub transfer_count: u64,
    pub value: Decimal,
}

/// Current-period snapshot plus month-over-month deltas (percent)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub current_transactions: u64,
    pub current_users: u64,
    pub current_volume: Decimal,
    pub transactions_delta: Decimal,
    pub users_delta: Decimal,
    pub volume_delta: Decimal,
    pub history: Vec<TimeSeriesRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlowEdge {
    pub source: usize,
    pub target: usize,
    pub value: Decimal,
}

/// Directed bipartite graph: one hub node, one node per counterparty row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowGraph {
    pub nodes: Vec<String>,
    pub edges: Vec<FlowEdge>,
}

impl FlowGraph {
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// A single bar in the windowed history chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub period: String,
    pub label: String,
    pub transactions: u64,
    pub users: u64,
    pub volume: Decimal,
    pub source_volume: Decimal,
    pub destination_volume: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartWindow {
    pub points: Vec<ChartPoint>,
    pub source_total: Decimal,
    pub destination_total: Decimal,
    pub grand_total: Decimal,
}

/// A dashboard section that is either ready or still waiting for data
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Panel<T> {
    Ready(T),
    NoData,
}

impl<T> Panel<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Panel::Ready(_))
    }
}

/// Everything one load produces, handed to the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub hub: String,
    pub metrics: Panel<DerivedMetrics>,
    pub chart: Panel<ChartWindow>,
    pub outflow: Panel<FlowGraph>,
    pub inflow: Panel<FlowGraph>,
    #[serde(skip)]
    pub outflow_rows: Vec<ChainFlowRow>,
    #[serde(skip)]
    pub inflow_rows: Vec<ChainFlowRow>,
}
