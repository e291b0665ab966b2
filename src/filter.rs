//! Range filtering of records on their normalized date.
//!
//! Rows whose date cell fails to parse are silently dropped — a bad date
//! means the row cannot be placed in any window, which is different from the
//! amount policy where a bad cell degrades to zero and the row still counts.

use log::debug;

use crate::{
    columns::{ColumnMap, Role},
    data::parse_chargeback_date,
    error::ReportError,
    source::{RecordBatch, Row},
    window::DateRange,
};

/// Borrows the rows whose date falls inside `range` (both ends inclusive).
/// An unresolved date role is the engine's one fatal precondition: no
/// partial report is produced.
pub fn filter_by_range<'a>(
    batch: &'a RecordBatch,
    columns: &ColumnMap,
    range: DateRange,
) -> Result<Vec<&'a Row>, ReportError> {
    let date_idx = columns
        .get(Role::Date)
        .ok_or_else(|| ReportError::MissingDateColumn {
            headers: batch.headers.join(", "),
        })?;

    let mut matched = Vec::new();
    let mut undated = 0usize;
    for row in &batch.rows {
        let cell = row.get(date_idx).map(String::as_str).unwrap_or("");
        match parse_chargeback_date(cell) {
            Some(date) if range.contains(date) => matched.push(row),
            Some(_) => {}
            None => undated += 1,
        }
    }
    if undated > 0 {
        debug!("dropped {undated} row(s) with unparseable dates");
    }
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::{AliasTable, detect_columns};
    use chrono::NaiveDate;

    fn range(start: (i32, u32, u32), end: (i32, u32, u32)) -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
        )
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let batch = RecordBatch::from_rows(
            &["Date", "Amount"],
            &[
                &["2026-02-13", "1"],
                &["2026-02-14", "2"],
                &["2026-02-20", "3"],
                &["2026-02-21", "4"],
            ],
        );
        let columns = detect_columns(&batch.headers, &AliasTable::builtin());
        let matched =
            filter_by_range(&batch, &columns, range((2026, 2, 14), (2026, 2, 20))).unwrap();
        let amounts: Vec<&str> = matched.iter().map(|row| row[1].as_str()).collect();
        assert_eq!(amounts, vec!["2", "3"]);
    }

    #[test]
    fn unparseable_dates_are_dropped_not_fatal() {
        let batch = RecordBatch::from_rows(
            &["Date", "Amount"],
            &[&["soon", "1"], &["", "2"], &["2026-02-15", "3"]],
        );
        let columns = detect_columns(&batch.headers, &AliasTable::builtin());
        let matched =
            filter_by_range(&batch, &columns, range((2026, 2, 14), (2026, 2, 20))).unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0][1], "3");
    }

    #[test]
    fn mixed_date_formats_filter_together() {
        let batch = RecordBatch::from_rows(
            &["Date"],
            &[
                &["2026/02/14"],
                &["02/15/2026"],
                &["2026.02.16"],
                &["03/01/2026"],
            ],
        );
        let columns = detect_columns(&batch.headers, &AliasTable::builtin());
        let matched =
            filter_by_range(&batch, &columns, range((2026, 2, 14), (2026, 2, 20))).unwrap();
        assert_eq!(matched.len(), 3);
    }

    #[test]
    fn missing_date_role_is_fatal() {
        let batch = RecordBatch::from_rows(&["Amount", "PG"], &[&["100", "Stripe"]]);
        let columns = detect_columns(&batch.headers, &AliasTable::builtin());
        let err =
            filter_by_range(&batch, &columns, range((2026, 2, 14), (2026, 2, 20))).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("no date column"), "{message}");
        assert!(message.contains("Amount, PG"), "{message}");
    }
}
