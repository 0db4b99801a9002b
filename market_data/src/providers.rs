//! Provider abstraction for market data sources.
//!
//! This module defines the [`MarketDataSource`] trait, which serves as a unified
//! interface for fetching daily price history and descriptive metadata from any
//! market data vendor.
//!
//! Each concrete provider (such as [`yahoo_rest::YahooProvider`]) implements
//! [`MarketDataSource`] to handle vendor-specific API logic and validation.
//! The trait is designed for async usage and supports dynamic dispatch
//! (`dyn MarketDataSource`) for runtime selection of providers.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use market_data::models::{
//!     metadata::TickerMetadata,
//!     ohlcv::OhlcvSeries,
//!     request_params::HistoryRequest,
//! };
//! use market_data::providers::{MarketDataSource, ProviderError};
//!
//! struct MySource;
//!
//! #[async_trait]
//! impl MarketDataSource for MySource {
//!     async fn fetch_history(
//!         &self,
//!         request: &HistoryRequest,
//!     ) -> Result<OhlcvSeries, ProviderError> {
//!         Ok(OhlcvSeries::empty(request.symbol.clone()))
//!     }
//!
//!     async fn fetch_metadata(&self, symbol: &str) -> Result<TickerMetadata, ProviderError> {
//!         Ok(TickerMetadata::new(symbol))
//!     }
//! }
//! ```

pub mod static_source;
#[cfg(feature = "yahoo")]
pub mod yahoo_rest;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::models::{
    metadata::TickerMetadata, ohlcv::OhlcvSeries, ohlcv::SeriesError,
    request_params::HistoryRequest,
};

/// Trait for fetching price history from a market data provider.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetches the OHLCV series for one ticker and date range.
    ///
    /// # Returns
    ///
    /// * `Ok(series)` - The records in the range, possibly none. An empty
    ///   series is a valid answer, distinct from an error.
    /// * `Err(ProviderError::NotFound)` - The ticker is unknown to the provider.
    /// * `Err(_)` - Transport, API or decoding failures.
    async fn fetch_history(&self, request: &HistoryRequest) -> Result<OhlcvSeries, ProviderError>;

    /// Fetches descriptive metadata (display name) for a ticker.
    ///
    /// Failures here are independent of [`fetch_history`](Self::fetch_history);
    /// callers are expected to fall back to the raw symbol.
    async fn fetch_metadata(&self, symbol: &str) -> Result<TickerMetadata, ProviderError>;
}

/// Errors that can occur within a `MarketDataSource` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// The provider does not know the requested ticker.
    #[snafu(display("Ticker {symbol} not found"))]
    NotFound {
        symbol: String,
        backtrace: Backtrace,
    },

    /// The source could not be reached (e.g., connectivity failure, timeout).
    #[snafu(display("Network error: {message}"))]
    Network {
        message: String,
        backtrace: Backtrace,
    },

    /// The provider's API returned an error response.
    #[snafu(display("API error (status {status}): {message}"))]
    Api {
        status: u16,
        message: String,
        backtrace: Backtrace,
    },

    /// The provider's response could not be decoded.
    #[snafu(display("Failed to decode provider response: {message}"))]
    Decode {
        message: String,
        backtrace: Backtrace,
    },

    /// The request parameters were invalid for this specific provider.
    #[snafu(display("Invalid parameters for provider: {message}"))]
    Validation {
        message: String,
        backtrace: Backtrace,
    },

    /// The provider returned records that violate the series invariants.
    #[snafu(display("Provider returned an invalid series: {source}"))]
    InvalidSeries {
        source: SeriesError,
        backtrace: Backtrace,
    },
}

impl ProviderError {
    /// Whether this error means "unknown ticker" rather than a failure to fetch.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound { .. })
    }
}
