use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{DerivedMetrics, TimeSeriesRow};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("insufficient data: need at least 2 periods, got {rows}")]
pub struct InsufficientData {
    pub rows: usize,
}

/// Percent change; a non-positive baseline yields exactly zero. A change too
/// large for `Decimal` saturates at `Decimal::MAX` / `Decimal::MIN`.
pub fn percent_delta(current: Decimal, previous: Decimal) -> Decimal {
    if previous <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let saturated = if current >= previous { Decimal::MAX } else { Decimal::MIN };
    current
        .checked_sub(previous)
        .and_then(|diff| diff.checked_div(previous))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(saturated)
}

/// Compare the latest period's month-to-date counters against the period
/// before it. Input order does not matter.
pub fn derive_metrics(rows: &[TimeSeriesRow]) -> Result<DerivedMetrics, InsufficientData> {
    if rows.len() < 2 {
        return Err(InsufficientData { rows: rows.len() });
    }

    let mut history = rows.to_vec();
    history.sort_by(|a, b| a.period.cmp(&b.period));

    let current = &history[history.len() - 1];
    let previous = &history[history.len() - 2];

    Ok(DerivedMetrics {
        current_transactions: current.transactions_to_date,
        current_users: current.users_to_date,
        current_volume: current.volume_to_date,
        transactions_delta: percent_delta(
            current.transactions_to_date.into(),
            previous.transactions_to_date.into(),
        ),
        users_delta: percent_delta(current.users_to_date.into(), previous.users_to_date.into()),
        volume_delta: percent_delta(current.volume_to_date, previous.volume_to_date),
        history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn row(period: &str, tx: u64, users: u64, volume: i64) -> TimeSeriesRow {
        TimeSeriesRow {
            period: period.to_string(),
            transactions: tx * 2,
            active_users: users * 2,
            source_volume: Decimal::from(volume),
            destination_volume: Decimal::ZERO,
            total_volume: Decimal::from(volume),
            transactions_to_date: tx,
            users_to_date: users,
            volume_to_date: Decimal::from(volume),
        }
    }

    fn close(actual: Decimal, expected: &str) {
        let diff = (actual - Decimal::from_str(expected).unwrap()).abs();
        assert!(diff < Decimal::new(1, 2), "{actual} != {expected}");
    }

    #[test]
    fn month_over_month_deltas_use_to_date_counters() {
        let m = derive_metrics(&[row("2024-06", 100, 50, 1000), row("2024-07", 120, 55, 1100)]).unwrap();
        assert_eq!(m.current_transactions, 120);
        assert_eq!(m.current_users, 55);
        assert_eq!(m.current_volume, Decimal::from(1100));
        close(m.transactions_delta, "20.0");
        close(m.users_delta, "10.0");
        close(m.volume_delta, "10.0");
    }

    #[test]
    fn fewer_than_two_rows_is_insufficient() {
        assert_eq!(derive_metrics(&[]), Err(InsufficientData { rows: 0 }));
        assert_eq!(
            derive_metrics(&[row("2024-07", 1, 1, 1)]),
            Err(InsufficientData { rows: 1 })
        );
    }

    #[test]
    fn zero_baseline_gives_zero_delta() {
        let m = derive_metrics(&[row("2024-06", 0, 10, 0), row("2024-07", 500, 5, 900)]).unwrap();
        assert_eq!(m.transactions_delta, Decimal::ZERO);
        assert_eq!(m.volume_delta, Decimal::ZERO);
        close(m.users_delta, "-50.0");
    }

    #[test]
    fn input_order_does_not_change_the_result() {
        let sorted = vec![
            row("2023-12", 10, 5, 100),
            row("2024-01", 20, 6, 150),
            row("2024-02", 15, 9, 300),
        ];
        let shuffled = vec![sorted[2].clone(), sorted[0].clone(), sorted[1].clone()];

        let a = derive_metrics(&sorted).unwrap();
        let b = derive_metrics(&shuffled).unwrap();
        assert_eq!(a, b);
        assert_eq!(b.history, sorted);
        close(b.transactions_delta, "-25.0");
        close(b.volume_delta, "100.0");
    }

    #[test]
    fn extreme_growth_saturates_instead_of_panicking() {
        let text = "h\n2024-06,1,1,0,0,0,1,1,0.001\n2024-07,1,1,0,0,0,1,1,1000000000000000000000000000\n";
        let rows = crate::parser::decode_time_series(text);
        let m = derive_metrics(&rows).unwrap();
        assert_eq!(m.volume_delta, Decimal::MAX);
        assert_eq!(m.transactions_delta, Decimal::ZERO);

        assert_eq!(percent_delta(Decimal::MIN, Decimal::MAX), Decimal::MIN);
    }

    #[test]
    fn negative_baseline_gives_zero_delta() {
        assert_eq!(percent_delta(Decimal::from(5), Decimal::from(-5)), Decimal::ZERO);
    }
}
