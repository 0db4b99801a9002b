//! One-call entry point computing every derived value the dashboard shows.

use market_data::OhlcvSeries;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    chart::{ChartSpec, ChartStyle, moving_average_chart, price_chart},
    error::MetricsError,
    format::{FormattedView, format_recent_window},
    moving_average::{MovingAverageSeries, compute_moving_average},
    point::{PointMetrics, compute_point_metrics},
    statistics::{StatColumn, SummaryStatistics, compute_summary_statistics},
};

/// Window sizes used by [`compute_dashboard_metrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub short_ma: usize,
    pub long_ma: usize,
    pub recent_rows: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            short_ma: 20,
            long_ma: 50,
            recent_rows: 90,
        }
    }
}

/// Everything derived from one series in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardMetrics {
    /// `None` for an empty series.
    pub point: Option<PointMetrics>,
    pub short_ma: MovingAverageSeries,
    pub long_ma: MovingAverageSeries,
    /// `None` for an empty series.
    pub close_stats: Option<SummaryStatistics>,
    /// `None` for an empty series.
    pub volume_stats: Option<SummaryStatistics>,
    pub recent: FormattedView,
    pub price_chart: ChartSpec,
    pub overlay_chart: ChartSpec,
}

/// Computes the full metrics bundle. Pure: `series` is only borrowed.
pub fn compute_dashboard_metrics(
    series: &OhlcvSeries,
    style: ChartStyle,
    config: &EngineConfig,
) -> Result<DashboardMetrics, MetricsError> {
    debug!(
        symbol = series.symbol(),
        records = series.len(),
        short_ma = config.short_ma,
        long_ma = config.long_ma,
        "computing dashboard metrics"
    );

    let point = compute_point_metrics(series)?;
    let short_ma = compute_moving_average(series, config.short_ma)?;
    let long_ma = compute_moving_average(series, config.long_ma)?;
    let overlay_chart = moving_average_chart(series, &[&short_ma, &long_ma]);

    Ok(DashboardMetrics {
        point,
        close_stats: compute_summary_statistics(series, StatColumn::Close),
        volume_stats: compute_summary_statistics(series, StatColumn::Volume),
        recent: format_recent_window(series, config.recent_rows),
        price_chart: price_chart(series, style),
        overlay_chart,
        short_ma,
        long_ma,
    })
}
