//! Report orchestration: load a batch, detect columns, resolve the window,
//! filter, aggregate, and emit the JSON envelope for each subcommand.
//!
//! Everything here composes the pure engine stages; the only ambient inputs
//! are the input file and, for `recent`, today's local date.

use std::path::Path;

use anyhow::Result;
use chrono::Local;
use log::info;
use serde::Serialize;

use crate::{
    aggregate::{self, Aggregation},
    cli::{
        CumulativeArgs, RangeArgs, RawArgs, RecentArgs, SourceOpts, WeekArgs, WindowsArgs, WowArgs,
    },
    columns::{AliasTable, ColumnMap, detect_columns},
    filter::filter_by_range,
    io_utils,
    source::{self, RecordBatch},
    window::{self, DateRange, WeekTable},
    wow,
};

/// Envelope for every single-window report.
#[derive(Debug, Serialize)]
pub struct PeriodReport {
    pub mode: &'static str,
    pub label: String,
    pub range: String,
    #[serde(flatten)]
    pub totals: Aggregation,
}

/// One side of a week-over-week comparison.
#[derive(Debug, Serialize)]
pub struct WowPeriod {
    pub week: String,
    pub range: String,
    #[serde(flatten)]
    pub totals: Aggregation,
}

/// Envelope for the `wow` subcommand.
#[derive(Debug, Serialize)]
pub struct WowReport {
    pub mode: &'static str,
    pub previous: WowPeriod,
    pub current: WowPeriod,
    pub wow_change: wow::WowChange,
}

#[derive(Debug, Serialize)]
struct WindowListing<'a> {
    week: &'a str,
    range: String,
}

pub fn execute_week(args: &WeekArgs) -> Result<()> {
    let table = load_week_table(args.weeks.as_deref())?;
    let range = table.resolve(&args.week)?;
    let (batch, columns) = load_batch(&args.source)?;
    let report = period_report(&batch, &columns, &args.week, range)?;
    emit(&report, args.pretty)
}

pub fn execute_wow(args: &WowArgs) -> Result<()> {
    let table = load_week_table(args.weeks.as_deref())?;
    let previous_range = table.resolve(&args.previous)?;
    let current_range = table.resolve(&args.current)?;
    let (batch, columns) = load_batch(&args.source)?;

    let previous = aggregate_window(&batch, &columns, previous_range)?;
    let current = aggregate_window(&batch, &columns, current_range)?;
    let wow_change = wow::compute_wow(&current, &previous);

    let report = WowReport {
        mode: "wow",
        previous: WowPeriod {
            week: args.previous.clone(),
            range: previous_range.label(),
            totals: previous,
        },
        current: WowPeriod {
            week: args.current.clone(),
            range: current_range.label(),
            totals: current,
        },
        wow_change,
    };
    emit(&report, args.pretty)
}

pub fn execute_range(args: &RangeArgs) -> Result<()> {
    let range = DateRange::new(args.start, args.end);
    let (batch, columns) = load_batch(&args.source)?;
    let report = period_report(&batch, &columns, &range.label(), range)?;
    emit(&report, args.pretty)
}

pub fn execute_cumulative(args: &CumulativeArgs) -> Result<()> {
    let range = window::parse_month_window(&args.month)?;
    let (batch, columns) = load_batch(&args.source)?;
    let label = format!("{} cumulative", args.month.trim());
    let report = period_report(&batch, &columns, &label, range)?;
    emit(&report, args.pretty)
}

pub fn execute_recent(args: &RecentArgs) -> Result<()> {
    let range = window::recent_window(Local::now().date_naive());
    let (batch, columns) = load_batch(&args.source)?;
    let label = format!("recent 2 weeks ({})", range.label());
    let report = period_report(&batch, &columns, &label, range)?;
    emit(&report, args.pretty)
}

pub fn execute_raw(args: &RawArgs) -> Result<()> {
    let (batch, _) = load_batch(&args.source)?;
    let objects: Vec<serde_json::Map<String, serde_json::Value>> = batch
        .rows
        .iter()
        .map(|row| {
            batch
                .headers
                .iter()
                .cloned()
                .zip(row.iter().map(|cell| serde_json::Value::from(cell.as_str())))
                .collect()
        })
        .collect();
    emit(&objects, args.pretty)
}

pub fn execute_windows(args: &WindowsArgs) -> Result<()> {
    let table = load_week_table(args.weeks.as_deref())?;
    let listings: Vec<WindowListing<'_>> = table
        .iter()
        .map(|(week, range)| WindowListing {
            week,
            range: range.label(),
        })
        .collect();
    emit(&listings, args.pretty)
}

fn load_week_table(path: Option<&Path>) -> Result<WeekTable> {
    match path {
        Some(path) => WeekTable::load(path),
        None => Ok(WeekTable::builtin()),
    }
}

fn load_batch(source: &SourceOpts) -> Result<(RecordBatch, ColumnMap)> {
    let delimiter = io_utils::resolve_input_delimiter(&source.input, source.delimiter);
    let encoding = io_utils::resolve_encoding(source.input_encoding.as_deref())?;
    let batch = source::read_records(&source.input, delimiter, encoding)?;
    let columns = detect_columns(&batch.headers, &AliasTable::builtin());
    info!("detected columns: {}", columns.describe(&batch.headers));
    Ok((batch, columns))
}

fn aggregate_window(
    batch: &RecordBatch,
    columns: &ColumnMap,
    range: DateRange,
) -> Result<Aggregation> {
    let rows = filter_by_range(batch, columns, range)?;
    info!("{} row(s) in window {}", rows.len(), range.label());
    Ok(aggregate::aggregate(&rows, columns))
}

fn period_report(
    batch: &RecordBatch,
    columns: &ColumnMap,
    label: &str,
    range: DateRange,
) -> Result<PeriodReport> {
    Ok(PeriodReport {
        mode: "weekly",
        label: label.to_string(),
        range: range.label(),
        totals: aggregate_window(batch, columns, range)?,
    })
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}
