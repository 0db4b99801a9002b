//! An in-memory [`MarketDataSource`] backed by pre-built series.
//!
//! Useful for tests and for driving the dashboard without network access.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::{
    models::{metadata::TickerMetadata, ohlcv::OhlcvSeries, request_params::HistoryRequest},
    providers::{InvalidSeriesSnafu, MarketDataSource, NetworkSnafu, NotFoundSnafu, ProviderError},
};
use snafu::ResultExt;

#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    series: HashMap<String, OhlcvSeries>,
    metadata: HashMap<String, TickerMetadata>,
    unreachable: HashMap<String, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a series under its own symbol.
    pub fn with_series(mut self, series: OhlcvSeries) -> Self {
        self.series.insert(series.symbol().to_string(), series);
        self
    }

    pub fn with_metadata(mut self, symbol: &str, metadata: TickerMetadata) -> Self {
        self.metadata.insert(symbol.to_string(), metadata);
        self
    }

    /// Makes every history request for `symbol` fail with a network error.
    pub fn with_unreachable(mut self, symbol: &str, message: &str) -> Self {
        self.unreachable
            .insert(symbol.to_string(), message.to_string());
        self
    }
}

#[async_trait]
impl MarketDataSource for StaticSource {
    async fn fetch_history(&self, request: &HistoryRequest) -> Result<OhlcvSeries, ProviderError> {
        if let Some(message) = self.unreachable.get(&request.symbol) {
            return NetworkSnafu {
                message: message.clone(),
            }
            .fail();
        }

        let Some(series) = self.series.get(&request.symbol) else {
            return NotFoundSnafu {
                symbol: request.symbol.clone(),
            }
            .fail();
        };

        let records = series
            .records()
            .iter()
            .filter(|r| r.date >= request.start && r.date < request.end)
            .cloned()
            .collect();

        OhlcvSeries::new(request.symbol.clone(), records).context(InvalidSeriesSnafu)
    }

    async fn fetch_metadata(&self, symbol: &str) -> Result<TickerMetadata, ProviderError> {
        self.metadata.get(symbol).cloned().ok_or_else(|| {
            NotFoundSnafu {
                symbol: symbol.to_string(),
            }
            .build()
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::ohlcv::OhlcvRecord;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn source() -> StaticSource {
        let records = (1..=10)
            .map(|d| OhlcvRecord::new(day(d), 10.0, 11.0, 9.0, 10.0 + d as f64, 100 * d as u64))
            .collect();
        StaticSource::new()
            .with_series(OhlcvSeries::new("AAPL", records).unwrap())
            .with_metadata("AAPL", TickerMetadata::new("Apple Inc."))
            .with_unreachable("DOWN", "connection refused")
    }

    #[tokio::test]
    async fn filters_by_half_open_range() {
        let request = HistoryRequest::new("aapl", day(3), day(6)).unwrap();
        let series = source().fetch_history(&request).await.unwrap();

        let dates: Vec<_> = series.dates().collect();
        assert_eq!(dates, vec![day(3), day(4), day(5)]);
    }

    #[tokio::test]
    async fn empty_range_is_not_an_error() {
        let request = HistoryRequest::new(
            "AAPL",
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
        )
        .unwrap();
        let series = source().fetch_history(&request).await.unwrap();
        assert!(series.is_empty());
    }

    #[tokio::test]
    async fn unknown_and_unreachable_tickers_fail_differently() {
        let unknown = HistoryRequest::new("NOPE", day(1), day(5)).unwrap();
        let err = source().fetch_history(&unknown).await.unwrap_err();
        assert!(err.is_not_found());

        let down = HistoryRequest::new("DOWN", day(1), day(5)).unwrap();
        let err = source().fetch_history(&down).await.unwrap_err();
        assert!(matches!(err, ProviderError::Network { .. }));
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn metadata_lookup() {
        let meta = source().fetch_metadata("AAPL").await.unwrap();
        assert_eq!(meta.display_name, "Apple Inc.");
        assert!(source().fetch_metadata("MSFT").await.is_err());
    }
}
