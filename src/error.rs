use thiserror::Error;

/// Structural failures that abort a report run. Per-cell parse failures are
/// handled locally (dates drop the row from filtering, amounts fall back to
/// zero) and never reach this enum.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(
        "no date column detected among headers [{headers}]; rename the column or extend the alias table"
    )]
    MissingDateColumn { headers: String },

    #[error("unknown week '{name}'; available: {available}")]
    UnknownWeek { name: String, available: String },

    #[error("input contains no data rows")]
    EmptyInput,

    #[error("invalid week table entry '{name}': {reason}")]
    BadWeekTable { name: String, reason: String },

    #[error("invalid month '{value}'; expected YYYY-MM (e.g. 2026-02)")]
    InvalidMonth { value: String },
}
