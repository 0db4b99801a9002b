use std::path::PathBuf;

use chrono::{Duration, NaiveDate};
use clap::Parser;
use market_data::TimeFrame;
use metrics_engine::ChartStyle;

use crate::{config::DashboardConfig, logging::LogFormat};

/// Default look-back when `--start` is omitted.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 100;

#[derive(Debug, Parser)]
#[command(
    name = "stock-dashboard",
    version,
    about = "Fetch daily price history for a ticker and print a dashboard"
)]
pub struct Cli {
    /// Ticker symbol (e.g. "AAPL", "BBCA.JK"); trimmed and upper-cased
    #[arg(short, long)]
    pub ticker: String,

    /// First day to include, YYYY-MM-DD (default: 100 days before today)
    #[arg(long, value_name = "DATE")]
    pub start: Option<NaiveDate>,

    /// Day after the last day to include, YYYY-MM-DD (default: today)
    #[arg(long, value_name = "DATE")]
    pub end: Option<NaiveDate>,

    /// Main chart style: candlestick, line or area (labels like "Line Chart" also work)
    #[arg(long, default_value = "candlestick")]
    pub chart: ChartStyle,

    /// Record interval: 1d, 5d, 1wk, 1mo or 3mo
    #[arg(long, default_value = "1d")]
    pub interval: TimeFrame,

    /// Path to the config file (dashboard.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory for the CSV export (overrides config and environment)
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Skip writing the CSV export
    #[arg(long)]
    pub no_export: bool,

    /// Also write the chart specifications as JSON next to the CSV
    #[arg(long)]
    pub charts_json: bool,

    /// Log output format (overrides config)
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}

impl Cli {
    /// Resolves the requested range against `today`.
    pub fn date_range(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let end = self.end.unwrap_or(today);
        let start = self
            .start
            .unwrap_or(today - Duration::days(DEFAULT_LOOKBACK_DAYS));
        (start, end)
    }

    /// Applies the flags that override configuration values.
    pub fn apply_overrides(&self, config: &mut DashboardConfig) {
        if let Some(dir) = &self.export_dir {
            config.export.dir = dir.clone();
        }
        if self.charts_json {
            config.export.charts_json = true;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
    }
}
