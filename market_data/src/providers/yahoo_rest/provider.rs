use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use shared_utils::env::{env_override, env_override_parsed};
use snafu::{ResultExt, ensure};
use tracing::{debug, info};

use crate::{
    models::{metadata::TickerMetadata, ohlcv::OhlcvSeries, request_params::HistoryRequest},
    providers::{
        ApiSnafu, DecodeSnafu, MarketDataSource, NetworkSnafu, NotFoundSnafu, ProviderError,
        yahoo_rest::{
            ClientBuildSnafu, EnvOverrideSnafu, InvalidBaseUrlSnafu, InvalidUserAgentSnafu,
            ProviderInitError,
            params::{YahooChartParams, construct_params, metadata_params, validate_timeframe},
            response::{ChartEnvelope, into_series, single_result},
        },
    },
};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const CHART_PATH: &str = "v8/finance/chart";

/// Connection settings for [`YahooProvider`].
#[derive(Clone, Debug)]
pub struct YahooConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
    pub chart: YahooChartParams,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            user_agent: concat!("stock-data-viewer/", env!("CARGO_PKG_VERSION")).to_string(),
            chart: YahooChartParams::default(),
        }
    }
}

pub struct YahooProvider {
    client: Client,
    base_url: String,
    chart: YahooChartParams,
}

impl YahooProvider {
    /// Creates a new Yahoo provider from explicit settings.
    pub fn new(config: YahooConfig) -> Result<Self, ProviderInitError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        ensure!(
            base_url.starts_with("http://") || base_url.starts_with("https://"),
            InvalidBaseUrlSnafu { url: base_url }
        );

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&config.user_agent).context(InvalidUserAgentSnafu)?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            base_url,
            chart: config.chart,
        })
    }

    /// Creates a provider from defaults, applying environment overrides.
    ///
    /// Reads `MARKET_DATA_BASE_URL` and `MARKET_DATA_TIMEOUT_SECS` when set.
    pub fn from_env() -> Result<Self, ProviderInitError> {
        let mut config = YahooConfig::default();
        if let Some(url) = env_override("MARKET_DATA_BASE_URL") {
            config.base_url = url;
        }
        if let Some(secs) =
            env_override_parsed::<u64>("MARKET_DATA_TIMEOUT_SECS").context(EnvOverrideSnafu)?
        {
            config.timeout = Duration::from_secs(secs);
        }
        Self::new(config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!("{}/{}/{}", self.base_url, CHART_PATH, symbol)
    }

    /// Sends a chart request and decodes the envelope, mapping HTTP-level failures.
    async fn get_chart(
        &self,
        symbol: &str,
        query: &[(String, String)],
    ) -> Result<ChartEnvelope, ProviderError> {
        let response = self
            .client
            .get(self.chart_url(symbol))
            .query(query)
            .send()
            .await
            .map_err(|e| {
                NetworkSnafu {
                    message: error_chain(&e),
                }
                .build()
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            NetworkSnafu {
                message: error_chain(&e),
            }
            .build()
        })?;

        decode_chart(symbol, status, &body)
    }
}

/// Maps an HTTP status and body to a chart envelope or a provider error.
fn decode_chart(symbol: &str, status: StatusCode, body: &str) -> Result<ChartEnvelope, ProviderError> {
    if status == StatusCode::NOT_FOUND {
        return NotFoundSnafu { symbol }.fail();
    }

    match serde_json::from_str::<ChartEnvelope>(body) {
        Ok(envelope) if status.is_success() || envelope.chart.error.is_some() => Ok(envelope),
        Ok(_) => ApiSnafu {
            status: status.as_u16(),
            message: "response carried no error detail".to_string(),
        }
        .fail(),
        Err(e) if status.is_success() => DecodeSnafu {
            message: e.to_string(),
        }
        .fail(),
        Err(_) => ApiSnafu {
            status: status.as_u16(),
            message: body.chars().take(200).collect::<String>(),
        }
        .fail(),
    }
}

/// Flattens an error and its sources into one line.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

#[async_trait]
impl MarketDataSource for YahooProvider {
    async fn fetch_history(&self, request: &HistoryRequest) -> Result<OhlcvSeries, ProviderError> {
        // Validate the timeframe before proceeding.
        validate_timeframe(&request.timeframe)?;

        info!(
            symbol = %request.symbol,
            start = %request.start,
            end = %request.end,
            interval = %request.timeframe,
            "fetching price history"
        );

        let query = construct_params(request, &self.chart);
        let envelope = self.get_chart(&request.symbol, &query).await?;

        let Some(result) = single_result(envelope, &request.symbol)? else {
            debug!(symbol = %request.symbol, "chart response carried no result");
            return Ok(OhlcvSeries::empty(request.symbol.clone()));
        };

        let series = into_series(result, request, self.chart.adjustment)?;
        debug!(symbol = %request.symbol, records = series.len(), "decoded price history");
        Ok(series)
    }

    async fn fetch_metadata(&self, symbol: &str) -> Result<TickerMetadata, ProviderError> {
        let envelope = self.get_chart(symbol, &metadata_params()).await?;
        let result = single_result(envelope, symbol)?.ok_or_else(|| {
            NotFoundSnafu { symbol }.build()
        })?;

        result.meta.into_metadata().ok_or_else(|| {
            DecodeSnafu {
                message: format!("no display name for {symbol}"),
            }
            .build()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_base_url() {
        let config = YahooConfig {
            base_url: "ftp://example.com".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            YahooProvider::new(config),
            Err(ProviderInitError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn trims_trailing_slash() {
        let config = YahooConfig {
            base_url: "http://localhost:9999/".to_string(),
            ..Default::default()
        };
        let provider = YahooProvider::new(config).unwrap();
        assert_eq!(provider.base_url(), "http://localhost:9999");
        assert_eq!(
            provider.chart_url("AAPL"),
            "http://localhost:9999/v8/finance/chart/AAPL"
        );
    }

    #[test]
    fn http_404_is_not_found() {
        let err = decode_chart("ZZZZ", StatusCode::NOT_FOUND, "<html>gone</html>").unwrap_err();
        assert!(err.is_not_found(), "{err}");
        assert!(err.to_string().contains("ZZZZ"));
    }

    #[test]
    fn other_statuses_map_to_api_or_decode_errors() {
        let err = decode_chart("AAPL", StatusCode::BAD_GATEWAY, "upstream down").unwrap_err();
        assert!(matches!(err, ProviderError::Api { status: 502, .. }));

        let err = decode_chart("AAPL", StatusCode::OK, "not json").unwrap_err();
        assert!(matches!(err, ProviderError::Decode { .. }));

        let ok = r#"{"chart":{"result":[],"error":null}}"#;
        assert!(decode_chart("AAPL", StatusCode::OK, ok).is_ok());
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let config = YahooConfig {
            // Port 9 (discard) on localhost is closed on CI machines.
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(2),
            ..Default::default()
        };
        let provider = YahooProvider::new(config).unwrap();
        let request = HistoryRequest::new(
            "AAPL",
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        )
        .unwrap();

        let err = provider.fetch_history(&request).await.unwrap_err();
        assert!(matches!(err, ProviderError::Network { .. }), "{err}");
    }
}
