//! Renderer-agnostic chart specifications.
//!
//! Charts are built from the unformatted series and serialise to a plain
//! trace/layout structure that any plotting front end can draw.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use market_data::OhlcvSeries;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::moving_average::MovingAverageSeries;

const PRICE_CHART_HEIGHT: u32 = 600;
const OVERLAY_CHART_HEIGHT: u32 = 500;
const AREA_COLOR: &str = "#037b66";
const CLOSE_COLOR: &str = "blue";
const MA_COLORS: [&str; 4] = ["orange", "red", "green", "purple"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown chart style {0:?}; expected candlestick, line or area")]
pub struct ParseChartStyleError(pub String);

/// The mutually exclusive styles for the main price chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartStyle {
    #[default]
    Candlestick,
    Line,
    Area,
}

impl ChartStyle {
    pub const ALL: [ChartStyle; 3] = [ChartStyle::Candlestick, ChartStyle::Line, ChartStyle::Area];

    /// Menu label, e.g. `Line Chart`.
    pub fn label(&self) -> &'static str {
        match self {
            ChartStyle::Candlestick => "Candlestick",
            ChartStyle::Line => "Line Chart",
            ChartStyle::Area => "Area Chart",
        }
    }
}

impl fmt::Display for ChartStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts short names (`line`) as well as menu labels (`Line Chart`), case-insensitively.
impl FromStr for ChartStyle {
    type Err = ParseChartStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let key = normalized.strip_suffix(" chart").unwrap_or(&normalized);
        match key {
            "candlestick" | "candle" => Ok(ChartStyle::Candlestick),
            "line" => Ok(ChartStyle::Line),
            "area" => Ok(ChartStyle::Area),
            _ => Err(ParseChartStyleError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trace {
    Candlestick {
        name: String,
        x: Vec<NaiveDate>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
    },
    /// A line; `None` points are gaps (serialised as `null`).
    Line {
        name: String,
        x: Vec<NaiveDate>,
        y: Vec<Option<f64>>,
        color: Option<String>,
        /// Fill the area between the line and zero.
        fill_to_zero: bool,
    },
}

impl Trace {
    pub fn name(&self) -> &str {
        match self {
            Trace::Candlestick { name, .. } | Trace::Line { name, .. } => name,
        }
    }

    pub fn point_count(&self) -> usize {
        match self {
            Trace::Candlestick { x, .. } | Trace::Line { x, .. } => x.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub height: u32,
    pub traces: Vec<Trace>,
}

/// The main price chart in the requested style.
pub fn price_chart(series: &OhlcvSeries, style: ChartStyle) -> ChartSpec {
    let symbol = series.symbol();
    let x: Vec<NaiveDate> = series.dates().collect();
    let closes = || series.closes().into_iter().map(Some).collect::<Vec<_>>();

    let (title, trace) = match style {
        ChartStyle::Candlestick => (
            format!("{symbol} Candlestick Chart"),
            Trace::Candlestick {
                name: symbol.to_string(),
                open: series.records().iter().map(|r| r.open).collect(),
                high: series.records().iter().map(|r| r.high).collect(),
                low: series.records().iter().map(|r| r.low).collect(),
                close: series.closes(),
                x,
            },
        ),
        ChartStyle::Line => (
            format!("{symbol} Closing Price"),
            Trace::Line {
                name: "Close".to_string(),
                y: closes(),
                color: None,
                fill_to_zero: false,
                x,
            },
        ),
        ChartStyle::Area => (
            format!("{symbol} Price Area Chart"),
            Trace::Line {
                name: "Close".to_string(),
                y: closes(),
                color: Some(AREA_COLOR.to_string()),
                fill_to_zero: true,
                x,
            },
        ),
    };

    ChartSpec {
        title,
        x_axis_title: "Date".to_string(),
        y_axis_title: "Price ($)".to_string(),
        height: PRICE_CHART_HEIGHT,
        traces: vec![trace],
    }
}

/// Close price overlaid with one line per moving average.
pub fn moving_average_chart(series: &OhlcvSeries, averages: &[&MovingAverageSeries]) -> ChartSpec {
    let x: Vec<NaiveDate> = series.dates().collect();
    let mut traces = vec![Trace::Line {
        name: "Close Price".to_string(),
        x: x.clone(),
        y: series.closes().into_iter().map(Some).collect(),
        color: Some(CLOSE_COLOR.to_string()),
        fill_to_zero: false,
    }];

    for (i, ma) in averages.iter().enumerate() {
        traces.push(Trace::Line {
            name: ma.label(),
            x: x.clone(),
            y: ma.values.clone(),
            color: Some(MA_COLORS[i % MA_COLORS.len()].to_string()),
            fill_to_zero: false,
        });
    }

    ChartSpec {
        title: format!("{} Price with Moving Averages", series.symbol()),
        x_axis_title: "Date".to_string(),
        y_axis_title: "Price ($)".to_string(),
        height: OVERLAY_CHART_HEIGHT,
        traces,
    }
}
