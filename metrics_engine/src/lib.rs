//! Derived-metrics engine for daily OHLCV price history.
//!
//! Every function here is pure and synchronous: it borrows an
//! [`OhlcvSeries`](market_data::OhlcvSeries) and returns freshly computed
//! values, leaving the series untouched. The only error conditions are
//! [`MetricsError::DivisionByZero`] and [`MetricsError::InvalidWindow`].

pub mod chart;
pub mod csv_export;
pub mod dashboard_metrics;
pub mod error;
pub mod format;
pub mod moving_average;
pub mod point;
pub mod statistics;

pub use chart::{ChartSpec, ChartStyle, Trace};
pub use dashboard_metrics::{DashboardMetrics, EngineConfig, compute_dashboard_metrics};
pub use error::MetricsError;
pub use format::{FormattedRow, FormattedView, format_recent_window};
pub use moving_average::{MovingAverageSeries, compute_moving_average};
pub use point::{PointMetrics, compute_point_metrics};
pub use statistics::{ColumnAggregate, StatColumn, SummaryStatistics, compute_summary_statistics};
