//! One fetch → compute pass, producing either a complete [`Dashboard`] or a
//! tagged [`PipelineError`].

use chrono::NaiveDate;
use market_data::{
    HistoryRequest, MarketDataSource, OhlcvSeries, ProviderError, RequestError, TimeFrame,
};
use metrics_engine::{ChartStyle, DashboardMetrics, EngineConfig, MetricsError, compute_dashboard_metrics};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Hint shown under every generic failure message.
pub const CONNECTIVITY_HINT: &str =
    "Make sure the ticker symbol is correct and your internet connection is stable.";

/// Inputs collected from the user for one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardRequest {
    pub ticker: String,
    pub start: NaiveDate,
    /// Exclusive.
    pub end: NaiveDate,
    pub timeframe: TimeFrame,
    pub style: ChartStyle,
}

/// Everything the renderer needs after a successful pass.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub ticker: String,
    /// `None` when metadata could not be fetched.
    pub display_name: Option<String>,
    pub style: ChartStyle,
    pub series: OhlcvSeries,
    pub metrics: DashboardMetrics,
}

impl Dashboard {
    /// `"{display_name} ({TICKER})"`, or just the ticker without metadata.
    pub fn title(&self) -> String {
        match &self.display_name {
            Some(name) => format!("{name} ({})", self.ticker),
            None => self.ticker.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] RequestError),

    #[error("ticker {ticker} not found")]
    NotFound { ticker: String },

    #[error("no data for {ticker} between {start} and {end}")]
    EmptySeries {
        ticker: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("market data request failed: {0}")]
    Source(ProviderError),

    #[error(transparent)]
    Metrics(#[from] MetricsError),

    #[error("failed to write export: {0:#}")]
    Export(anyhow::Error),
}

/// A message for the user: the text plus an optional follow-up hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMessage {
    pub text: String,
    pub hint: Option<&'static str>,
}

impl PipelineError {
    /// Maps each failure kind to exactly one user-facing message.
    pub fn user_message(&self) -> UserMessage {
        match self {
            PipelineError::NotFound { ticker } => UserMessage {
                text: format!("Ticker {ticker} was not found. Make sure the ticker symbol is correct."),
                hint: None,
            },
            PipelineError::EmptySeries { ticker, .. } => UserMessage {
                text: format!("No data found for ticker {ticker}. Make sure the ticker symbol is correct."),
                hint: None,
            },
            PipelineError::InvalidRequest(_)
            | PipelineError::Source(_)
            | PipelineError::Metrics(_)
            | PipelineError::Export(_) => UserMessage {
                text: format!("Error: {self}"),
                hint: Some(CONNECTIVITY_HINT),
            },
        }
    }

    /// Whether this is a "no data" outcome rather than a failure.
    pub fn is_no_data(&self) -> bool {
        matches!(
            self,
            PipelineError::NotFound { .. } | PipelineError::EmptySeries { .. }
        )
    }
}

impl From<ProviderError> for PipelineError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound { symbol, .. } => PipelineError::NotFound { ticker: symbol },
            other => PipelineError::Source(other),
        }
    }
}

/// Runs one pass: fetch history, reject empty results, fetch the display
/// name (non-fatal), then compute every derived metric.
pub async fn run_pipeline(
    source: &dyn MarketDataSource,
    request: &DashboardRequest,
    config: &EngineConfig,
) -> Result<Dashboard, PipelineError> {
    let history = HistoryRequest::with_timeframe(
        &request.ticker,
        request.start,
        request.end,
        request.timeframe,
    )?;
    let ticker = history.symbol.clone();

    info!(%ticker, start = %history.start, end = %history.end, "fetching price history");
    let series = source.fetch_history(&history).await?;
    if series.is_empty() {
        return Err(PipelineError::EmptySeries {
            ticker,
            start: history.start,
            end: history.end,
        });
    }
    debug!(%ticker, records = series.len(), "history received");

    let display_name = match source.fetch_metadata(&ticker).await {
        Ok(metadata) => Some(metadata.display_name),
        Err(err) => {
            warn!(%ticker, error = %err, "metadata unavailable; falling back to ticker");
            None
        }
    };

    let metrics = compute_dashboard_metrics(&series, request.style, config)?;

    Ok(Dashboard {
        ticker,
        display_name,
        style: request.style,
        series,
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_data_messages_carry_no_hint() {
        let not_found = PipelineError::NotFound {
            ticker: "ZZZZ".into(),
        };
        let message = not_found.user_message();
        assert!(message.text.contains("ZZZZ"));
        assert_eq!(message.hint, None);
        assert!(not_found.is_no_data());
    }

    #[test]
    fn metrics_failures_are_generic() {
        let err = PipelineError::from(MetricsError::InvalidWindow { window: 0 });
        let message = err.user_message();
        assert!(message.text.starts_with("Error: "));
        assert_eq!(message.hint, Some(CONNECTIVITY_HINT));
        assert!(!err.is_no_data());
    }

    #[test]
    fn title_falls_back_to_ticker() {
        let dashboard = Dashboard {
            ticker: "AAPL".into(),
            display_name: None,
            style: ChartStyle::Line,
            series: OhlcvSeries::empty("AAPL"),
            metrics: compute_dashboard_metrics(
                &OhlcvSeries::empty("AAPL"),
                ChartStyle::Line,
                &EngineConfig::default(),
            )
            .unwrap(),
        };
        assert_eq!(dashboard.title(), "AAPL");

        let named = Dashboard {
            display_name: Some("Apple Inc.".into()),
            ..dashboard
        };
        assert_eq!(named.title(), "Apple Inc. (AAPL)");
    }
}
