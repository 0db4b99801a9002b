//! Descriptive statistics over a whole column of the series.

use std::fmt;

use market_data::OhlcvSeries;
use serde::Serialize;

/// Column a [`SummaryStatistics`] bundle was computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatColumn {
    Close,
    Volume,
}

impl fmt::Display for StatColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatColumn::Close => "Close",
            StatColumn::Volume => "Volume",
        })
    }
}

/// The column-specific extra aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ColumnAggregate {
    /// `max - min`, reported for Close.
    Range(f64),
    /// Total over all records, reported for Volume.
    Sum(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub column: StatColumn,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (divisor `N - 1`); `None` when `N == 1`.
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub aggregate: ColumnAggregate,
}

impl SummaryStatistics {
    pub fn range(&self) -> Option<f64> {
        match self.aggregate {
            ColumnAggregate::Range(r) => Some(r),
            ColumnAggregate::Sum(_) => None,
        }
    }

    pub fn sum(&self) -> Option<f64> {
        match self.aggregate {
            ColumnAggregate::Sum(s) => Some(s),
            ColumnAggregate::Range(_) => None,
        }
    }
}

/// Computes summary statistics for `column`; `None` for an empty series.
pub fn compute_summary_statistics(
    series: &OhlcvSeries,
    column: StatColumn,
) -> Option<SummaryStatistics> {
    let values: Vec<f64> = match column {
        StatColumn::Close => series.closes(),
        StatColumn::Volume => series.volumes().into_iter().map(|v| v as f64).collect(),
    };
    if values.is_empty() {
        return None;
    }

    let count = values.len();
    let sum: f64 = values.iter().sum();
    let mean = sum / count as f64;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let aggregate = match column {
        StatColumn::Close => ColumnAggregate::Range(max - min),
        StatColumn::Volume => ColumnAggregate::Sum(sum),
    };

    Some(SummaryStatistics {
        column,
        count,
        mean,
        median: median(values.clone()),
        std_dev: sample_std_dev(&values, mean),
        min,
        max,
        aggregate,
    })
}

fn median(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

fn sample_std_dev(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((squares / (values.len() - 1) as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use market_data::OhlcvRecord;

    use super::*;

    fn series(rows: &[(f64, u64)]) -> OhlcvSeries {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, &(c, v))| {
                OhlcvRecord::new(start + chrono::Duration::days(i as i64), c, c, c, c, v)
            })
            .collect();
        OhlcvSeries::new("S", records).unwrap()
    }

    #[test]
    fn close_statistics() {
        let s = series(&[(2.0, 1), (4.0, 1), (4.0, 1), (4.0, 1), (5.0, 1), (5.0, 1), (7.0, 1), (9.0, 1)]);
        let stats = compute_summary_statistics(&s, StatColumn::Close).unwrap();

        assert_eq!(stats.count, 8);
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.median, 4.5);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
        assert_eq!(stats.range(), Some(7.0));
        assert_eq!(stats.sum(), None);
        // sum of squares 32, n - 1 = 7
        assert!((stats.std_dev.unwrap() - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn volume_statistics() {
        let s = series(&[(1.0, 1000), (1.0, 1500), (1.0, 500)]);
        let stats = compute_summary_statistics(&s, StatColumn::Volume).unwrap();

        assert_eq!(stats.mean, 1000.0);
        assert_eq!(stats.median, 1000.0);
        assert_eq!(stats.sum(), Some(3000.0));
        assert_eq!(stats.range(), None);
        assert_eq!(stats.std_dev, Some(500.0));
    }

    #[test]
    fn single_record_has_undefined_std_dev() {
        let stats = compute_summary_statistics(&series(&[(3.0, 10)]), StatColumn::Close).unwrap();
        assert_eq!(stats.std_dev, None);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.range(), Some(0.0));
    }

    #[test]
    fn constant_series_has_zero_std_dev() {
        let stats =
            compute_summary_statistics(&series(&[(3.0, 10), (3.0, 10)]), StatColumn::Close).unwrap();
        assert_eq!(stats.std_dev, Some(0.0));
    }

    #[test]
    fn empty_series_has_no_statistics() {
        assert!(compute_summary_statistics(&OhlcvSeries::empty("S"), StatColumn::Volume).is_none());
    }
}
