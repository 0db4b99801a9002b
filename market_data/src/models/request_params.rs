use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    ticker::{TickerError, normalize_ticker},
    timeframe::TimeFrame,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error(transparent)]
    Ticker(#[from] TickerError),

    #[error("start date {start} must be before end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

/// Vendor-agnostic parameters for requesting price history for one ticker.
///
/// This is the standard input for all
/// [`MarketDataSource`](crate::providers::MarketDataSource) implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRequest {
    /// Normalised (upper-case) ticker symbol, e.g. `"AAPL"` or `"BBCA.JK"`.
    pub symbol: String,

    /// First trading day to include (inclusive).
    pub start: NaiveDate,

    /// Day after the last trading day to include (exclusive).
    pub end: NaiveDate,

    /// The interval of each record. Providers validate the values they support.
    #[serde(default)]
    pub timeframe: TimeFrame,
}

impl HistoryRequest {
    /// Builds a daily request, normalising the ticker and checking `start < end`.
    pub fn new(symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Self, RequestError> {
        Self::with_timeframe(symbol, start, end, TimeFrame::day())
    }

    pub fn with_timeframe(
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        timeframe: TimeFrame,
    ) -> Result<Self, RequestError> {
        let symbol = normalize_ticker(symbol)?;
        if start >= end {
            return Err(RequestError::InvalidRange { start, end });
        }
        Ok(Self {
            symbol,
            start,
            end,
            timeframe,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn normalises_symbol() {
        let req = HistoryRequest::new(" msft", date(2024, 1, 1), date(2024, 4, 10)).unwrap();
        assert_eq!(req.symbol, "MSFT");
        assert_eq!(req.timeframe, TimeFrame::day());
    }

    #[test]
    fn rejects_inverted_or_empty_range() {
        let d = date(2024, 1, 1);
        assert_eq!(
            HistoryRequest::new("MSFT", d, d),
            Err(RequestError::InvalidRange { start: d, end: d })
        );
        assert!(HistoryRequest::new("MSFT", date(2024, 2, 1), d).is_err());
    }

    #[test]
    fn rejects_blank_symbol() {
        assert_eq!(
            HistoryRequest::new("", date(2024, 1, 1), date(2024, 2, 1)),
            Err(RequestError::Ticker(TickerError::Empty))
        );
    }
}
