//! Point-in-time snapshot of the latest prices in a series.

use market_data::OhlcvSeries;
use serde::Serialize;

use crate::error::MetricsError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointMetrics {
    /// Close of the last record.
    pub current_price: f64,
    /// Close of the second-to-last record, or `current_price` for a single record.
    pub previous_price: f64,
    /// `(current - previous) / previous * 100`.
    pub percent_change: f64,
    /// Maximum of the High column.
    pub period_high: f64,
    /// Minimum of the Low column.
    pub period_low: f64,
}

/// Computes [`PointMetrics`] for a series.
///
/// Returns `Ok(None)` for an empty series and
/// [`MetricsError::DivisionByZero`] when the previous close is zero.
pub fn compute_point_metrics(series: &OhlcvSeries) -> Result<Option<PointMetrics>, MetricsError> {
    let records = series.records();
    let Some(last) = records.last() else {
        return Ok(None);
    };

    let current_price = last.close;
    let (previous_price, percent_change) = match records.len().checked_sub(2).map(|i| &records[i]) {
        None => (current_price, 0.0),
        Some(prev) if prev.close == 0.0 => {
            return Err(MetricsError::DivisionByZero { date: prev.date });
        }
        Some(prev) => (
            prev.close,
            (current_price - prev.close) / prev.close * 100.0,
        ),
    };

    let period_high = records
        .iter()
        .map(|r| r.high)
        .fold(f64::NEG_INFINITY, f64::max);
    let period_low = records.iter().map(|r| r.low).fold(f64::INFINITY, f64::min);

    Ok(Some(PointMetrics {
        current_price,
        previous_price,
        percent_change,
        period_high,
        period_low,
    }))
}
