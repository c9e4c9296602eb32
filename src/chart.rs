// src/chart.rs
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{ChartPoint, ChartWindow, TimeSeriesRow};

/// "2024-07" → "Jul 24"; anything else is shown as-is
pub fn month_label(period: &str) -> String {
    NaiveDate::parse_from_str(&format!("{period}-15"), "%Y-%m-%d")
        .map(|d| d.format("%b %y").to_string())
        .unwrap_or_else(|_| period.to_string())
}

/// Trailing `window` periods of an already-sorted history, with legend totals.
/// Totals saturate rather than overflow.
pub fn chart_window(history: &[TimeSeriesRow], window: usize) -> ChartWindow {
    let start = history.len().saturating_sub(window);

    let points: Vec<ChartPoint> = history[start..]
        .iter()
        .map(|r| ChartPoint {
            period: r.period.clone(),
            label: month_label(&r.period),
            transactions: r.transactions,
            users: r.active_users,
            volume: r.total_volume,
            source_volume: r.source_volume,
            destination_volume: r.destination_volume,
        })
        .collect();

    let source_total = points
        .iter()
        .fold(Decimal::ZERO, |acc, p| acc.saturating_add(p.source_volume));
    let destination_total = points
        .iter()
        .fold(Decimal::ZERO, |acc, p| acc.saturating_add(p.destination_volume));

    ChartWindow {
        points,
        source_total,
        destination_total,
        grand_total: source_total.saturating_add(destination_total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(period: &str, src: i64, dst: i64) -> TimeSeriesRow {
        TimeSeriesRow {
            period: period.to_string(),
            transactions: 1,
            active_users: 1,
            source_volume: Decimal::from(src),
            destination_volume: Decimal::from(dst),
            total_volume: Decimal::from(src + dst),
            transactions_to_date: 1,
            users_to_date: 1,
            volume_to_date: Decimal::from(src + dst),
        }
    }

    #[test]
    fn labels_are_short_month_and_year() {
        assert_eq!(month_label("2024-07"), "Jul 24");
        assert_eq!(month_label("2023-12"), "Dec 23");
        assert_eq!(month_label("not-a-month"), "not-a-month");
    }

    #[test]
    fn keeps_only_the_trailing_window() {
        let history: Vec<_> = (1..=14).map(|m| row(&format!("{}-{:02}", 2023 + (m - 1) / 12, (m - 1) % 12 + 1), 1, 2)).collect();
        let w = chart_window(&history, 12);
        assert_eq!(w.points.len(), 12);
        assert_eq!(w.points[0].period, "2023-03");
        assert_eq!(w.points[11].period, "2024-02");
        assert_eq!(w.source_total, Decimal::from(12));
        assert_eq!(w.destination_total, Decimal::from(24));
        assert_eq!(w.grand_total, Decimal::from(36));
    }

    #[test]
    fn huge_volumes_saturate_totals() {
        let mut history = vec![row("2024-01", 0, 7), row("2024-02", 0, 7)];
        let big: Decimal = "50000000000000000000000000000".parse().unwrap();
        for r in &mut history {
            r.source_volume = big;
        }

        let w = chart_window(&history, 12);
        assert_eq!(w.source_total, Decimal::MAX);
        assert_eq!(w.destination_total, Decimal::from(14));
        assert_eq!(w.grand_total, Decimal::MAX);
    }

    #[test]
    fn short_history_and_zero_window() {
        let history = vec![row("2024-01", 5, 5)];
        assert_eq!(chart_window(&history, 12).points.len(), 1);

        let empty = chart_window(&history, 0);
        assert!(empty.points.is_empty());
        assert_eq!(empty.grand_total, Decimal::ZERO);
    }
}
