//! Yahoo Finance chart API (`/v8/finance/chart/{symbol}`) provider.

pub mod params;
pub mod provider;
pub mod response;

pub use params::{Adjustment, YahooChartParams};
pub use provider::{YahooConfig, YahooProvider};

use snafu::{Backtrace, Snafu};

/// Errors that can occur during the creation of a provider instance.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// User agent contains invalid characters.
    #[snafu(display("Invalid user agent: {source}"))]
    InvalidUserAgent {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },

    /// Base URL override is not an http(s) URL.
    #[snafu(display("Invalid base URL {url:?}"))]
    InvalidBaseUrl { url: String, backtrace: Backtrace },

    /// An environment override could not be parsed.
    #[snafu(display("Invalid environment override: {source}"))]
    EnvOverride {
        source: shared_utils::env::InvalidEnvVarError,
        backtrace: Backtrace,
    },
}
