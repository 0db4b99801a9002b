use chrono::NaiveDate;
use thiserror::Error;

/// Conditions the engine reports instead of producing non-finite values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MetricsError {
    /// The previous close is zero, so a percent change is undefined.
    #[error("cannot compute percent change: previous close on {date} is zero")]
    DivisionByZero { date: NaiveDate },

    /// Moving-average windows must cover at least one record.
    #[error("moving-average window must be at least 1, got {window}")]
    InvalidWindow { window: usize },
}
