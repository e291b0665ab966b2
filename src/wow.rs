//! Week-over-week comparison of two aggregation results.
//!
//! Percentage math uses floor guards (`max(count, 1)`, `max(amount, 0.01)`)
//! instead of reporting "undefined" when the previous period was empty. The
//! guard understates the percentage magnitude in that edge case; consumers
//! of these reports accept that approximation.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    aggregate::{Aggregation, Breakdown},
    data::{round1, round2},
};

/// Count and amount deltas between a current and a previous period, plus
/// per-provider share shifts when both periods carry a provider breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WowChange {
    pub count_change: i64,
    pub count_pct: f64,
    pub amount_change: f64,
    pub amount_pct: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_share_change: Option<BTreeMap<String, f64>>,
}

/// Compares `current` against `previous`.
pub fn compute_wow(current: &Aggregation, previous: &Aggregation) -> WowChange {
    let count_change = current.total_count as i64 - previous.total_count as i64;
    let count_pct = round1(count_change as f64 / previous.total_count.max(1) as f64 * 100.0);

    let amount_diff = current.total_amount - previous.total_amount;
    let amount_pct = round1(amount_diff / previous.total_amount.max(0.01) * 100.0);

    let provider_share_change = match (&current.by_provider, &previous.by_provider) {
        (Some(cur), Some(prev)) => Some(share_changes(
            cur,
            current.total_count,
            prev,
            previous.total_count,
        )),
        _ => None,
    };

    WowChange {
        count_change,
        count_pct,
        amount_change: round2(amount_diff),
        amount_pct,
        provider_share_change,
    }
}

/// Signed percentage-point share shift for the union of provider keys.
/// A provider absent from one period holds a zero share there, not an
/// exclusion from the union.
fn share_changes(
    current: &Breakdown,
    current_total: u64,
    previous: &Breakdown,
    previous_total: u64,
) -> BTreeMap<String, f64> {
    let mut providers: BTreeMap<String, f64> = BTreeMap::new();
    for key in current.keys().chain(previous.keys()) {
        if providers.contains_key(key) {
            continue;
        }
        let cur_share = share_of(current, key, current_total);
        let prev_share = share_of(previous, key, previous_total);
        providers.insert(key.to_string(), round1(cur_share - prev_share));
    }
    providers
}

fn share_of(breakdown: &Breakdown, key: &str, total: u64) -> f64 {
    let count = breakdown.get(key).map(|entry| entry.count).unwrap_or(0);
    count as f64 / total.max(1) as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::columns::{AliasTable, detect_columns};
    use crate::source::{RecordBatch, Row};

    fn aggregation(rows: &[(&str, &str, &str)]) -> Aggregation {
        let cells: Vec<[&str; 3]> = rows
            .iter()
            .map(|(date, amount, provider)| [*date, *amount, *provider])
            .collect();
        let slices: Vec<&[&str]> = cells.iter().map(|row| row.as_slice()).collect();
        let batch = RecordBatch::from_rows(&["Date", "Amount", "Provider"], &slices);
        let columns = detect_columns(&batch.headers, &AliasTable::builtin());
        let rows: Vec<&Row> = batch.rows.iter().collect();
        aggregate(&rows, &columns)
    }

    /// Builds a period from `(provider, row count, provider total)` tuples.
    /// Each provider's whole amount lands on its first row so totals stay
    /// exact regardless of row count.
    fn repeat_rows(periods: &[(&'static str, u64, f64)]) -> Aggregation {
        let mut amounts = Vec::new();
        let mut providers = Vec::new();
        for (provider, count, total) in periods {
            for i in 0..*count {
                amounts.push(if i == 0 { format!("{total}") } else { String::from("0") });
                providers.push(*provider);
            }
        }
        let tuples: Vec<(&str, &str, &str)> = providers
            .iter()
            .zip(amounts.iter())
            .map(|(provider, amount)| ("2026-02-14", amount.as_str(), *provider))
            .collect();
        aggregation(&tuples)
    }

    #[test]
    fn zero_previous_count_floors_the_divisor() {
        let previous = aggregation(&[]);
        let current = repeat_rows(&[("PG-A", 5, 500.0)]);
        let wow = compute_wow(&current, &previous);
        assert_eq!(wow.count_change, 5);
        assert_eq!(wow.count_pct, 500.0);
    }

    #[test]
    fn synthetic_two_period_comparison() {
        // previous: 10 records / 1000.00 split PG-A 6, PG-B 4
        let previous = repeat_rows(&[("PG-A", 6, 600.0), ("PG-B", 4, 400.0)]);
        // current: 12 records / 1500.00 split PG-A 9, PG-C 3
        let current = repeat_rows(&[("PG-A", 9, 1100.0), ("PG-C", 3, 400.0)]);

        assert_eq!(previous.total_count, 10);
        assert_eq!(previous.total_amount, 1000.0);
        assert_eq!(current.total_count, 12);
        assert_eq!(current.total_amount, 1500.0);

        let wow = compute_wow(&current, &previous);
        assert_eq!(wow.count_change, 2);
        assert_eq!(wow.count_pct, 20.0);
        assert_eq!(wow.amount_change, 500.0);
        assert_eq!(wow.amount_pct, 50.0);

        let shares = wow.provider_share_change.expect("provider shares");
        assert_eq!(shares["PG-A"], 15.0); // 60% -> 75%
        assert_eq!(shares["PG-B"], -40.0); // 40% -> 0%
        assert_eq!(shares["PG-C"], 25.0); // 0% -> 25%
    }

    #[test]
    fn negative_changes_are_reported() {
        let previous = repeat_rows(&[("PG-A", 8, 800.0)]);
        let current = repeat_rows(&[("PG-A", 6, 500.0)]);
        let wow = compute_wow(&current, &previous);
        assert_eq!(wow.count_change, -2);
        assert_eq!(wow.count_pct, -25.0);
        assert_eq!(wow.amount_change, -300.0);
        assert_eq!(wow.amount_pct, -37.5);
    }

    #[test]
    fn share_change_absent_when_either_period_lacks_providers() {
        let with_providers = repeat_rows(&[("PG-A", 2, 100.0)]);

        let batch = RecordBatch::from_rows(&["Date", "Amount"], &[&["2026-02-14", "50"]]);
        let columns = detect_columns(&batch.headers, &AliasTable::builtin());
        let rows: Vec<&Row> = batch.rows.iter().collect();
        let without_providers = aggregate(&rows, &columns);

        let wow = compute_wow(&with_providers, &without_providers);
        assert!(wow.provider_share_change.is_none());
    }

    #[test]
    fn amount_pct_uses_floor_when_previous_amount_is_zero() {
        let previous = aggregation(&[("2026-02-14", "abc", "PG-A")]);
        let current = repeat_rows(&[("PG-A", 1, 5.0)]);
        assert_eq!(previous.total_amount, 0.0);
        let wow = compute_wow(&current, &previous);
        // 5.00 / 0.01 * 100
        assert_eq!(wow.amount_pct, 50000.0);
    }
}
