use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use snafu::ResultExt;

use crate::{
    models::{
        metadata::TickerMetadata,
        ohlcv::{OhlcvRecord, OhlcvSeries},
        request_params::HistoryRequest,
    },
    providers::{
        DecodeSnafu, InvalidSeriesSnafu, ProviderError, yahoo_rest::params::Adjustment,
    },
};

#[derive(Deserialize, Debug)]
pub struct ChartEnvelope {
    pub chart: ChartBody,
}

#[derive(Deserialize, Debug)]
pub struct ChartBody {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
pub struct ChartError {
    pub code: String,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ChartResult {
    pub meta: ChartMeta,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub symbol: String,
    pub currency: Option<String>,
    pub long_name: Option<String>,
    pub short_name: Option<String>,
    pub exchange_timezone_name: Option<String>,
    pub gmtoffset: Option<i32>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
    #[serde(default)]
    pub adjclose: Vec<AdjClose>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Quote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

#[derive(Deserialize, Debug, Default)]
pub struct AdjClose {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

impl ChartError {
    pub fn is_not_found(&self) -> bool {
        self.code.eq_ignore_ascii_case("Not Found")
    }

    pub fn message(&self) -> String {
        match &self.description {
            Some(d) => format!("{}: {}", self.code, d),
            None => self.code.clone(),
        }
    }
}

impl ChartMeta {
    /// Converts a unix timestamp into the trading date on the exchange's calendar.
    fn trading_date(&self, ts: i64) -> Option<NaiveDate> {
        let utc = DateTime::<Utc>::from_timestamp(ts, 0)?;
        if let Some(tz) = self
            .exchange_timezone_name
            .as_deref()
            .and_then(|name| name.parse::<Tz>().ok())
        {
            return Some(utc.with_timezone(&tz).date_naive());
        }
        match self.gmtoffset.and_then(FixedOffset::east_opt) {
            Some(offset) => Some(utc.with_timezone(&offset).date_naive()),
            None => Some(utc.date_naive()),
        }
    }

    pub fn into_metadata(self) -> Option<TickerMetadata> {
        let display_name = self
            .long_name
            .or(self.short_name)
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())?;
        Some(TickerMetadata {
            display_name,
            currency: self.currency,
        })
    }
}

/// Unwraps the single chart result, mapping an API-level error payload.
pub fn single_result(envelope: ChartEnvelope, symbol: &str) -> Result<Option<ChartResult>, ProviderError> {
    if let Some(error) = envelope.chart.error {
        if error.is_not_found() {
            return crate::providers::NotFoundSnafu { symbol }.fail();
        }
        return crate::providers::ApiSnafu {
            status: 200u16,
            message: error.message(),
        }
        .fail();
    }
    Ok(envelope.chart.result.and_then(|r| r.into_iter().next()))
}

fn value_at(column: &[Option<f64>], i: usize) -> Option<f64> {
    column.get(i).copied().flatten()
}

/// Converts a chart result into an [`OhlcvSeries`] for the request window.
///
/// Rows with any missing field (halted sessions, trailing live quotes) are
/// dropped, as are rows outside `[start, end)`. When two rows fall on the same
/// trading date the later one wins.
pub fn into_series(
    result: ChartResult,
    request: &HistoryRequest,
    adjustment: Adjustment,
) -> Result<OhlcvSeries, ProviderError> {
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adjclose = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose)
        .unwrap_or_default();

    let n = result.timestamp.len();
    for (name, len) in [
        ("open", quote.open.len()),
        ("high", quote.high.len()),
        ("low", quote.low.len()),
        ("close", quote.close.len()),
        ("volume", quote.volume.len()),
    ] {
        if len != n && len != 0 {
            return DecodeSnafu {
                message: format!("{name} has {len} values for {n} timestamps"),
            }
            .fail();
        }
    }

    let mut records: Vec<OhlcvRecord> = Vec::with_capacity(n);
    for (i, ts) in result.timestamp.iter().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = (
            value_at(&quote.open, i),
            value_at(&quote.high, i),
            value_at(&quote.low, i),
            value_at(&quote.close, i),
            value_at(&quote.volume, i),
        ) else {
            continue;
        };
        let Some(date) = result.meta.trading_date(*ts) else {
            continue;
        };
        if date < request.start || date >= request.end {
            continue;
        }

        let factor = match (adjustment, value_at(&adjclose, i)) {
            (Adjustment::All, Some(adj)) if close > 0.0 => adj / close,
            _ => 1.0,
        };

        let record = OhlcvRecord::new(
            date,
            open * factor,
            high * factor,
            low * factor,
            close * factor,
            volume.max(0.0).round() as u64,
        );

        match records.last_mut() {
            Some(last) if last.date == date => *last = record,
            _ => records.push(record),
        }
    }

    OhlcvSeries::new(request.symbol.clone(), records).context(InvalidSeriesSnafu)
}

#[cfg(test)]
mod tests {
    use super::*;

    const AAPL_JSON: &str = r#"{
      "chart": {
        "result": [{
          "meta": {
            "symbol": "AAPL",
            "currency": "USD",
            "longName": "Apple Inc.",
            "shortName": "Apple",
            "exchangeTimezoneName": "America/New_York",
            "gmtoffset": -18000
          },
          "timestamp": [1704205800, 1704292200, 1704378600, 1704465000],
          "indicators": {
            "quote": [{
              "open":   [187.15, 184.22, null,   181.99],
              "high":   [188.44, 185.88, 183.09, 182.76],
              "low":    [183.89, 183.43, 180.88, 180.17],
              "close":  [185.64, 184.25, 181.91, 181.18],
              "volume": [82488700, 58414500, 71983600, 62303300]
            }],
            "adjclose": [{ "adjclose": [92.82, 92.125, 90.955, 90.59] }]
          }
        }],
        "error": null
      }
    }"#;

    fn request() -> HistoryRequest {
        HistoryRequest::new(
            "AAPL",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
        )
        .unwrap()
    }

    fn parse(json: &str) -> ChartResult {
        let envelope: ChartEnvelope = serde_json::from_str(json).unwrap();
        single_result(envelope, "AAPL").unwrap().unwrap()
    }

    #[test]
    fn raw_rows_skip_gaps_and_use_exchange_dates() {
        let series = into_series(parse(AAPL_JSON), &request(), Adjustment::Raw).unwrap();

        assert_eq!(series.len(), 3);
        let dates: Vec<_> = series.dates().map(|d| d.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-02", "2024-01-03", "2024-01-05"]);
        assert_eq!(series.records()[0].close, 185.64);
        assert_eq!(series.records()[0].volume, 82_488_700);
    }

    #[test]
    fn adjusted_rows_scale_by_adjclose_ratio() {
        let series = into_series(parse(AAPL_JSON), &request(), Adjustment::All).unwrap();
        let first = &series.records()[0];

        assert!((first.close - 92.82).abs() < 1e-9);
        let factor = 92.82 / 185.64;
        assert!((first.open - 187.15 * factor).abs() < 1e-9);
        assert_eq!(first.volume, 82_488_700);
    }

    #[test]
    fn window_end_is_exclusive() {
        let mut req = request();
        req.end = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let series = into_series(parse(AAPL_JSON), &req, Adjustment::Raw).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn padded_rows_are_trimmed_on_the_exchange_calendar() {
        // Sessions at 21:00 UTC fall on the next day in Pacific/Auckland.
        let json = r#"{"chart":{"result":[{
            "meta":{"symbol":"AIR.NZ","exchangeTimezoneName":"Pacific/Auckland","gmtoffset":46800},
            "timestamp":[1704142800,1704229200,1704315600,1704402000],
            "indicators":{"quote":[{
              "open":[1.0,2.0,3.0,4.0],"high":[1.0,2.0,3.0,4.0],"low":[1.0,2.0,3.0,4.0],
              "close":[1.0,2.0,3.0,4.0],"volume":[10,20,30,40]}]}}],"error":null}}"#;
        let request = HistoryRequest::new(
            "AIR.NZ",
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        )
        .unwrap();

        let envelope: ChartEnvelope = serde_json::from_str(json).unwrap();
        let result = single_result(envelope, "AIR.NZ").unwrap().unwrap();
        let series = into_series(result, &request, Adjustment::Raw).unwrap();

        let dates: Vec<_> = series.dates().map(|d| d.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-03", "2024-01-04"]);
        assert_eq!(series.closes(), vec![2.0, 3.0]);
    }

    #[test]
    fn missing_timestamps_mean_empty_series() {
        let json = r#"{"chart":{"result":[{"meta":{"symbol":"AAPL"},"indicators":{"quote":[{}]}}],"error":null}}"#;
        let series = into_series(parse(json), &request(), Adjustment::All).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn not_found_error_payload() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let envelope: ChartEnvelope = serde_json::from_str(json).unwrap();
        let err = single_result(envelope, "ZZZZ").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn other_error_payload_is_api_error() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid input"}}}"#;
        let envelope: ChartEnvelope = serde_json::from_str(json).unwrap();
        let err = single_result(envelope, "AAPL").unwrap_err();
        assert!(matches!(err, ProviderError::Api { .. }));
    }

    #[test]
    fn mismatched_columns_are_a_decode_error() {
        let json = r#"{"chart":{"result":[{"meta":{"symbol":"AAPL"},"timestamp":[1704205800,1704292200],
            "indicators":{"quote":[{"open":[1.0],"high":[1.0,1.0],"low":[1.0,1.0],"close":[1.0,1.0],"volume":[1,1]}]}}],"error":null}}"#;
        let err = into_series(parse(json), &request(), Adjustment::Raw).unwrap_err();
        assert!(matches!(err, ProviderError::Decode { .. }));
    }

    #[test]
    fn metadata_prefers_long_name() {
        let meta = parse(AAPL_JSON).meta.into_metadata().unwrap();
        assert_eq!(meta.display_name, "Apple Inc.");
        assert_eq!(meta.currency.as_deref(), Some("USD"));

        let bare: ChartMeta = serde_json::from_str(r#"{"symbol":"X"}"#).unwrap();
        assert!(bare.into_metadata().is_none());
    }
}
