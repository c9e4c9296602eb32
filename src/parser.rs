// src/parser.rs
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::models::{ChainFlowRow, TimeSeriesRow};

/// Named-column contract for one CSV export
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

pub const TIME_SERIES: Layout = Layout {
    name: "time_series",
    columns: &[
        "month",
        "monthly_transactions",
        "monthly_active_users",
        "monthly_src_usdc",
        "monthly_dst_usdc",
        "monthly_usdc",
        "transactions_mtd",
        "active_users_mtd",
        "volume_mtd",
    ],
};

pub const CHAIN_FLOWS: Layout = Layout {
    name: "chain_flows",
    columns: &["chain", "transfers", "usdc_value"],
};

/// Split the export into data lines: header dropped, blank lines skipped.
/// Fields are split on a bare comma; the exporter never quotes commas.
fn data_lines<'a>(text: &'a str, layout: &'a Layout) -> impl Iterator<Item = Vec<&'a str>> + 'a {
    text.trim()
        .lines()
        .enumerate()
        .skip(1)
        .filter(|(_, line)| !line.trim().is_empty())
        .map(move |(idx, line)| {
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() != layout.columns.len() {
                warn!(
                    "{}: line {} has {} columns, expected {}",
                    layout.name,
                    idx + 1,
                    fields.len(),
                    layout.columns.len()
                );
            }
            fields
        })
}

fn text_field(fields: &[&str], idx: usize) -> String {
    fields
        .get(idx)
        .map(|s| s.replace('"', "").trim().to_string())
        .unwrap_or_default()
}

/// Parse a numeric cell; anything unparseable degrades to zero
fn decimal_field(fields: &[&str], idx: usize) -> Decimal {
    let Some(raw) = fields.get(idx) else {
        return Decimal::ZERO;
    };
    let s = raw.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .unwrap_or(Decimal::ZERO)
}

/// Counts are whole and non-negative; fractions truncate, negatives become zero
fn count_field(fields: &[&str], idx: usize) -> u64 {
    let Some(raw) = fields.get(idx) else {
        return 0;
    };
    match raw.trim().parse::<u64>() {
        Ok(n) => n,
        Err(_) => decimal_field(fields, idx).trunc().to_u64().unwrap_or(0),
    }
}

/// Decode the monthly time-series export, preserving line order
pub fn decode_time_series(text: &str) -> Vec<TimeSeriesRow> {
    let rows: Vec<TimeSeriesRow> = data_lines(text, &TIME_SERIES)
        .map(|f| TimeSeriesRow {
            period: text_field(&f, 0),
            transactions: count_field(&f, 1),
            active_users: count_field(&f, 2),
            source_volume: decimal_field(&f, 3),
            destination_volume: decimal_field(&f, 4),
            total_volume: decimal_field(&f, 5),
            transactions_to_date: count_field(&f, 6),
            users_to_date: count_field(&f, 7),
            volume_to_date: decimal_field(&f, 8),
        })
        .collect();

    debug!("Decoded {} time-series rows", rows.len());
    rows
}

/// Decode an outflow or inflow table. Rows without a chain name or with a
/// non-positive value are dropped.
pub fn decode_chain_flows(text: &str) -> Vec<ChainFlowRow> {
    let mut dropped = 0usize;
    let rows: Vec<ChainFlowRow> = data_lines(text, &CHAIN_FLOWS)
        .map(|f| ChainFlowRow {
            chain_name: text_field(&f, 0),
            transfer_count: count_field(&f, 1),
            value: decimal_field(&f, 2),
        })
        .filter(|row| {
            let keep = !row.chain_name.is_empty() && row.value > Decimal::ZERO;
            if !keep {
                dropped += 1;
            }
            keep
        })
        .collect();

    debug!("Decoded {} chain-flow rows ({} dropped)", rows.len(), dropped);
    rows
}

/// Header line plus one line per row, newline-terminated, no quoting
fn encode<I>(layout: &Layout, lines: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut out = layout.columns.join(",");
    out.push('\n');
    for line in lines {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Write rows back out in the exporter's layout
pub fn encode_time_series(rows: &[TimeSeriesRow]) -> String {
    encode(
        &TIME_SERIES,
        rows.iter().map(|r| {
            format!(
                "{},{},{},{},{},{},{},{},{}",
                r.period,
                r.transactions,
                r.active_users,
                r.source_volume,
                r.destination_volume,
                r.total_volume,
                r.transactions_to_date,
                r.users_to_date,
                r.volume_to_date,
            )
        }),
    )
}

pub fn encode_chain_flows(rows: &[ChainFlowRow]) -> String {
    encode(
        &CHAIN_FLOWS,
        rows.iter()
            .map(|r| format!("{},{},{}", r.chain_name, r.transfer_count, r.value)),
    )
}
