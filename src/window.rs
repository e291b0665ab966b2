//! Reporting windows: the named week table, calendar-month windows, and the
//! default trailing-two-weeks window.
//!
//! Reporting weeks run Saturday through Friday. The builtin table mirrors
//! the windows the chargeback review meeting works from; alternate tables
//! can be loaded from a JSON file so the engine itself holds no process-wide
//! configuration.

use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{Context, Result};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use itertools::Itertools;
use log::debug;

use crate::error::ReportError;

/// An inclusive calendar-date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// `"<start>~<end>"`, the range label used in report output.
    pub fn label(&self) -> String {
        format!("{}~{}", self.start, self.end)
    }

    fn span_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Named week windows, ordered chronologically by start date.
#[derive(Debug, Clone)]
pub struct WeekTable {
    entries: Vec<(String, DateRange)>,
}

impl WeekTable {
    /// The review calendar for early 2026, Saturday through Friday.
    pub fn builtin() -> Self {
        const WEEKS: &[(&str, &str, &str)] = &[
            ("JAN W3", "2026-01-17", "2026-01-23"),
            ("JAN W4", "2026-01-24", "2026-01-30"),
            ("FEB W1", "2026-01-31", "2026-02-06"),
            ("FEB W2", "2026-02-07", "2026-02-13"),
            ("FEB W3", "2026-02-14", "2026-02-20"),
            ("FEB W4", "2026-02-21", "2026-02-27"),
            ("MAR W1", "2026-02-28", "2026-03-06"),
        ];
        let entries = WEEKS
            .iter()
            .map(|(name, start, end)| {
                // Infallible: the constants above are well-formed ISO dates.
                let start = start.parse().expect("builtin week start");
                let end = end.parse().expect("builtin week end");
                (name.to_string(), DateRange::new(start, end))
            })
            .collect();
        Self { entries }
    }

    /// Loads a week table from a JSON file of the form
    /// `{"FEB W3": ["2026-02-14", "2026-02-20"], ...}`. Every window must
    /// span exactly seven days; names are normalized to uppercase and the
    /// table is ordered by start date.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Reading week table from {path:?}"))?;
        let parsed: BTreeMap<String, (String, String)> = serde_json::from_str(&raw)
            .with_context(|| format!("Parsing week table JSON from {path:?}"))?;

        let mut entries = Vec::with_capacity(parsed.len());
        for (name, (start, end)) in parsed {
            let name = name.trim().to_uppercase();
            let range = Self::parse_entry(&name, &start, &end)?;
            entries.push((name, range));
        }
        entries.sort_by_key(|(_, range)| range.start);
        debug!("loaded {} week window(s) from {path:?}", entries.len());
        Ok(Self { entries })
    }

    fn parse_entry(name: &str, start: &str, end: &str) -> Result<DateRange, ReportError> {
        let bad = |reason: String| ReportError::BadWeekTable {
            name: name.to_string(),
            reason,
        };
        let start: NaiveDate = start
            .parse()
            .map_err(|_| bad(format!("unreadable start date '{start}'")))?;
        let end: NaiveDate = end
            .parse()
            .map_err(|_| bad(format!("unreadable end date '{end}'")))?;
        let range = DateRange::new(start, end);
        if range.span_days() != 7 {
            return Err(bad(format!(
                "window spans {} day(s); week windows must span exactly 7",
                range.span_days()
            )));
        }
        Ok(range)
    }

    /// Resolves a named window, case-insensitively. Unknown names are fatal
    /// and the error lists every valid name.
    pub fn resolve(&self, name: &str) -> Result<DateRange, ReportError> {
        let wanted = name.trim().to_uppercase();
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == wanted)
            .map(|(_, range)| *range)
            .ok_or_else(|| ReportError::UnknownWeek {
                name: wanted,
                available: self.entries.iter().map(|(n, _)| n.as_str()).sorted().join(", "),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, DateRange)> {
        self.entries.iter().map(|(name, range)| (name.as_str(), *range))
    }
}

/// Window covering one calendar month, handling the December year wrap.
pub fn month_window(year: i32, month: u32) -> Option<DateRange> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(DateRange::new(start, next_month.pred_opt()?))
}

/// Parses a `YYYY-MM` month label into a [`month_window`].
pub fn parse_month_window(value: &str) -> Result<DateRange, ReportError> {
    let invalid = || ReportError::InvalidMonth {
        value: value.to_string(),
    };
    let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    month_window(year, month).ok_or_else(invalid)
}

/// The default report window: the two full Saturday–Friday weeks ending on
/// the most recent Friday at or before `today`.
pub fn recent_window(today: NaiveDate) -> DateRange {
    let since_friday =
        (today.weekday().num_days_from_monday() + 7 - Weekday::Fri.num_days_from_monday()) % 7;
    let last_friday = today - Days::new(u64::from(since_friday));
    DateRange::new(last_friday - Days::new(13), last_friday)
}
