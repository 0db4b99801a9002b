//! Canonical in-memory representation of daily price history (OHLCV).
//!
//! [`OhlcvSeries`] is the standard output of every
//! [`MarketDataSource`](crate::providers::MarketDataSource) implementation and
//! the standard input of the metrics engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a set of records violates the series invariants.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SeriesError {
    /// Dates must be strictly increasing.
    #[error("record {index} dated {date} does not follow {previous}")]
    UnorderedDates {
        index: usize,
        previous: NaiveDate,
        date: NaiveDate,
    },

    /// Prices must be finite and non-negative.
    #[error("record {index} has invalid {field} price {value}")]
    InvalidPrice {
        index: usize,
        field: PriceField,
        value: f64,
    },
}

/// Names one of the four price columns of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
}

impl std::fmt::Display for PriceField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PriceField::Open => "open",
            PriceField::High => "high",
            PriceField::Low => "low",
            PriceField::Close => "close",
        };
        f.write_str(name)
    }
}

/// A single trading-day record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvRecord {
    /// Trading date in the exchange's local calendar.
    pub date: NaiveDate,

    /// Opening price.
    pub open: f64,

    /// Highest price during the session.
    pub high: f64,

    /// Lowest price during the session.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Shares traded during the session.
    pub volume: u64,
}

impl OhlcvRecord {
    /// Builds a record; a negative zero price is stored as `0.0`.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open: open + 0.0,
            high: high + 0.0,
            low: low + 0.0,
            close: close + 0.0,
            volume,
        }
    }

    /// Returns the value of one price column.
    pub fn price(&self, field: PriceField) -> f64 {
        match field {
            PriceField::Open => self.open,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close => self.close,
        }
    }
}

/// Price history for a single symbol, ordered by date ascending.
///
/// Construct through [`OhlcvSeries::new`], which enforces strictly increasing
/// dates and finite, non-negative prices. An empty series is valid and means
/// "no data for this ticker and range".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OhlcvSeries {
    symbol: String,
    records: Vec<OhlcvRecord>,
}

impl OhlcvSeries {
    pub fn new(symbol: impl Into<String>, records: Vec<OhlcvRecord>) -> Result<Self, SeriesError> {
        validate(&records)?;
        Ok(Self {
            symbol: symbol.into(),
            records,
        })
    }

    /// An empty series for `symbol`.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            records: Vec::new(),
        }
    }

    /// The symbol this data represents (e.g. "AAPL").
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn records(&self) -> &[OhlcvRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&OhlcvRecord> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&OhlcvRecord> {
        self.records.last()
    }

    pub fn dates(&self) -> impl ExactSizeIterator<Item = NaiveDate> + '_ {
        self.records.iter().map(|r| r.date)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.close).collect()
    }

    pub fn volumes(&self) -> Vec<u64> {
        self.records.iter().map(|r| r.volume).collect()
    }

    /// The last `count` records (fewer if the series is shorter), in date order.
    pub fn tail(&self, count: usize) -> &[OhlcvRecord] {
        let start = self.records.len().saturating_sub(count);
        &self.records[start..]
    }

    pub fn into_records(self) -> Vec<OhlcvRecord> {
        self.records
    }
}

fn validate(records: &[OhlcvRecord]) -> Result<(), SeriesError> {
    const FIELDS: [PriceField; 4] = [
        PriceField::Open,
        PriceField::High,
        PriceField::Low,
        PriceField::Close,
    ];

    for (index, record) in records.iter().enumerate() {
        for field in FIELDS {
            let value = record.price(field);
            if !value.is_finite() || value < 0.0 {
                return Err(SeriesError::InvalidPrice {
                    index,
                    field,
                    value,
                });
            }
        }

        if index > 0 {
            let previous = records[index - 1].date;
            if record.date <= previous {
                return Err(SeriesError::UnorderedDates {
                    index,
                    previous,
                    date: record.date,
                });
            }
        }
    }
    Ok(())
}
