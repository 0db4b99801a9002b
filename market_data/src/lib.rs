//! Price-history data model and market data sources.
//!
//! [`models`] holds the vendor-agnostic OHLCV series and request types;
//! [`providers`] defines the [`MarketDataSource`](providers::MarketDataSource)
//! trait and its implementations.

pub mod models;
pub mod providers;

pub use models::{
    metadata::TickerMetadata,
    ohlcv::{OhlcvRecord, OhlcvSeries, PriceField, SeriesError},
    request_params::{HistoryRequest, RequestError},
    ticker::{TickerError, normalize_ticker},
    timeframe::{TimeFrame, TimeFrameUnit},
};
pub use providers::{MarketDataSource, ProviderError};
