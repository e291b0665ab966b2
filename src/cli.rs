use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Normalize payment-chargeback logs into weekly aggregate reports",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Aggregate a single named week window
    Week(WeekArgs),
    /// Compare two named week windows week-over-week
    Wow(WowArgs),
    /// Aggregate an explicit inclusive date range
    Range(RangeArgs),
    /// Aggregate one calendar month
    Cumulative(CumulativeArgs),
    /// Aggregate the two most recent full weeks ending last Friday
    Recent(RecentArgs),
    /// Dump normalized records as JSON without filtering
    Raw(RawArgs),
    /// List the named week windows and their date ranges
    Windows(WindowsArgs),
}

/// Options shared by every record-reading subcommand.
#[derive(Debug, Args)]
pub struct SourceOpts {
    /// Input CSV/TSV export of the chargeback sheet ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct WeekArgs {
    /// Week name, e.g. "FEB W3"
    pub week: String,
    #[command(flatten)]
    pub source: SourceOpts,
    /// Replace the builtin week table with a JSON file of named windows
    #[arg(long = "weeks")]
    pub weeks: Option<PathBuf>,
    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Args)]
pub struct WowArgs {
    /// Previous week name, e.g. "FEB W2"
    pub previous: String,
    /// Current week name, e.g. "FEB W3"
    pub current: String,
    #[command(flatten)]
    pub source: SourceOpts,
    /// Replace the builtin week table with a JSON file of named windows
    #[arg(long = "weeks")]
    pub weeks: Option<PathBuf>,
    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Args)]
pub struct RangeArgs {
    /// Window start date (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub start: NaiveDate,
    /// Window end date (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub end: NaiveDate,
    #[command(flatten)]
    pub source: SourceOpts,
    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Args)]
pub struct CumulativeArgs {
    /// Month to accumulate, e.g. "2026-02"
    pub month: String,
    #[command(flatten)]
    pub source: SourceOpts,
    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Args)]
pub struct RecentArgs {
    #[command(flatten)]
    pub source: SourceOpts,
    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Args)]
pub struct RawArgs {
    #[command(flatten)]
    pub source: SourceOpts,
    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Args)]
pub struct WindowsArgs {
    /// Replace the builtin week table with a JSON file of named windows
    #[arg(long = "weeks")]
    pub weeks: Option<PathBuf>,
    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
