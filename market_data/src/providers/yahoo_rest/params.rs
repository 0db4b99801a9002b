use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    models::{
        request_params::HistoryRequest,
        timeframe::{TimeFrame, TimeFrameUnit},
    },
    providers::{ProviderError, ValidationSnafu},
};

/// Specifies the corporate action adjustment for price data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Adjustment {
    /// Prices as traded.
    Raw,
    /// Open/high/low/close scaled by the split- and dividend-adjusted close.
    #[default]
    All,
}

/// Yahoo-specific options for a chart request.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct YahooChartParams {
    #[serde(default)]
    pub adjustment: Adjustment,
    /// Include pre/post market data (only meaningful for intraday intervals).
    #[serde(default)]
    pub include_pre_post: bool,
}

/// Ensures the timeframe is one the chart API accepts for history requests.
pub fn validate_timeframe(timeframe: &TimeFrame) -> Result<(), ProviderError> {
    let ok = match timeframe.unit {
        TimeFrameUnit::Day => matches!(timeframe.amount, 1 | 5),
        TimeFrameUnit::Week => timeframe.amount == 1,
        TimeFrameUnit::Month => matches!(timeframe.amount, 1 | 3),
    };

    if ok {
        Ok(())
    } else {
        ValidationSnafu {
            message: format!(
                "unsupported interval {timeframe}; use 1d, 5d, 1wk, 1mo or 3mo"
            ),
        }
        .fail()
    }
}

/// Days added on each side of the requested range. Sessions are dated on the
/// exchange calendar, which can be up to a day away from UTC; `into_series`
/// trims the padding back to `[start, end)`.
const WINDOW_PADDING: Days = Days::new(1);

/// Unix timestamp of midnight UTC for `date`.
fn epoch_seconds(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

/// Builds the query string for a history request.
pub fn construct_params(
    request: &HistoryRequest,
    options: &YahooChartParams,
) -> Vec<(String, String)> {
    let period1 = request
        .start
        .checked_sub_days(WINDOW_PADDING)
        .unwrap_or(request.start);
    let period2 = request
        .end
        .checked_add_days(WINDOW_PADDING)
        .unwrap_or(request.end);

    let mut query = vec![
        ("period1".to_string(), epoch_seconds(period1).to_string()),
        ("period2".to_string(), epoch_seconds(period2).to_string()),
        ("interval".to_string(), request.timeframe.to_string()),
        ("events".to_string(), "div,splits".to_string()),
        (
            "includeAdjustedClose".to_string(),
            (options.adjustment == Adjustment::All).to_string(),
        ),
    ];
    if options.include_pre_post {
        query.push(("includePrePost".to_string(), "true".to_string()));
    }
    query
}

/// Query string for a lightweight request whose only purpose is the `meta` block.
pub fn metadata_params() -> Vec<(String, String)> {
    vec![
        ("range".to_string(), "5d".to_string()),
        ("interval".to_string(), "1d".to_string()),
    ]
}
