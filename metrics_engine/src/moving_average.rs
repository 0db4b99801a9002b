//! Trailing simple moving averages of the close price.

use chrono::NaiveDate;
use market_data::OhlcvSeries;
use serde::Serialize;

use crate::error::MetricsError;

/// Moving average aligned one-to-one with the source series.
///
/// `values[i]` is `None` until a full window of closes is available
/// (`i < window - 1`); a shorter window is never substituted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAverageSeries {
    pub window: usize,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<Option<f64>>,
}

impl MovingAverageSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of defined entries.
    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// The most recent defined value, if any.
    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }

    /// Display label, e.g. `MA 20`.
    pub fn label(&self) -> String {
        format!("MA {}", self.window)
    }
}

/// Computes the `window`-record simple moving average of closes.
pub fn compute_moving_average(
    series: &OhlcvSeries,
    window: usize,
) -> Result<MovingAverageSeries, MetricsError> {
    if window == 0 {
        return Err(MetricsError::InvalidWindow { window });
    }

    let closes = series.closes();
    let mut values = vec![None; closes.len()];
    for (offset, chunk) in closes.windows(window).enumerate() {
        let sum: f64 = chunk.iter().sum();
        values[offset + window - 1] = Some(sum / window as f64);
    }

    Ok(MovingAverageSeries {
        window,
        dates: series.dates().collect(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use market_data::OhlcvRecord;

    use super::*;

    fn closes(values: &[f64]) -> OhlcvSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let records = values
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                OhlcvRecord::new(start + chrono::Duration::days(i as i64), c, c, c, c, 10)
            })
            .collect();
        OhlcvSeries::new("MA", records).unwrap()
    }

    #[test]
    fn three_day_average() {
        let ma = compute_moving_average(&closes(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3).unwrap();
        assert_eq!(ma.values, vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
        assert_eq!(ma.dates.len(), 5);
        assert_eq!(ma.latest(), Some(4.0));
        assert_eq!(ma.label(), "MA 3");
    }

    #[test]
    fn window_of_one_is_the_close() {
        let ma = compute_moving_average(&closes(&[7.0, 8.0]), 1).unwrap();
        assert_eq!(ma.values, vec![Some(7.0), Some(8.0)]);
    }

    #[test]
    fn window_longer_than_series_is_all_undefined() {
        let ma = compute_moving_average(&closes(&[1.0, 2.0, 3.0]), 4).unwrap();
        assert_eq!(ma.values, vec![None, None, None]);
        assert_eq!(ma.defined_count(), 0);
        assert_eq!(ma.latest(), None);
    }

    #[test]
    fn zero_window_is_rejected() {
        assert_eq!(
            compute_moving_average(&closes(&[1.0]), 0),
            Err(MetricsError::InvalidWindow { window: 0 })
        );
    }

    #[test]
    fn empty_series() {
        let ma = compute_moving_average(&OhlcvSeries::empty("MA"), 20).unwrap();
        assert!(ma.is_empty());
    }
}
