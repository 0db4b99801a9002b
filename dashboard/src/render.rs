//! Plain-text rendering of a [`Dashboard`] and of pipeline failures.

use std::fmt::Write as _;

use indexmap::IndexMap;
use market_data::OhlcvSeries;
use metrics_engine::{
    ChartSpec, FormattedView, MovingAverageSeries, PointMetrics, SummaryStatistics, Trace,
    format::{format_currency, format_grouped, format_percent, format_signed_percent},
};

use crate::pipeline::{Dashboard, PipelineError};

const NOT_AVAILABLE: &str = "n/a";

/// Renders every panel of a successful pass.
pub fn render_dashboard(dashboard: &Dashboard) -> String {
    let metrics = &dashboard.metrics;
    let mut out = String::new();

    section(&mut out, &dashboard.title());
    if let Some(point) = &metrics.point {
        out.push_str(&render_key_values(&point_panel(point)));
    }

    section(
        &mut out,
        &format!("{} - {}", dashboard.style.label(), dashboard.ticker),
    );
    out.push_str(&render_chart_summary(&metrics.price_chart));

    section(&mut out, "Technical Analysis");
    out.push_str(&render_chart_summary(&metrics.overlay_chart));
    for ma in [&metrics.short_ma, &metrics.long_ma] {
        out.push_str(&render_moving_average(ma));
    }

    if let Some(stats) = &metrics.close_stats {
        section(&mut out, "Price Statistics");
        out.push_str(&render_key_values(&price_stats_panel(stats)));
    }
    if let Some(stats) = &metrics.volume_stats {
        section(&mut out, "Volume Statistics");
        out.push_str(&render_key_values(&volume_stats_panel(stats)));
    }

    section(&mut out, "Recent Prices");
    out.push_str(&render_recent_table(&metrics.recent));

    section(&mut out, "Complete Raw Data");
    out.push_str(&render_raw_table(&dashboard.series));

    out
}

/// Renders the single message shown for a failed pass.
pub fn render_failure(err: &PipelineError) -> String {
    let message = err.user_message();
    match message.hint {
        Some(hint) => format!("{}\nTip: {hint}\n", message.text),
        None => format!("{}\n", message.text),
    }
}

fn section(out: &mut String, title: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    let _ = writeln!(out, "== {title} ==");
}

pub fn point_panel(point: &PointMetrics) -> IndexMap<&'static str, String> {
    IndexMap::from([
        ("Current Price", format_currency(point.current_price)),
        (
            "Daily Change",
            format!(
                "{} ({})",
                format_percent(point.percent_change),
                format_signed_percent(point.percent_change)
            ),
        ),
        ("Period High", format_currency(point.period_high)),
        ("Period Low", format_currency(point.period_low)),
    ])
}

/// Average, median, std dev and range, each as currency.
pub fn price_stats_panel(stats: &SummaryStatistics) -> IndexMap<&'static str, String> {
    IndexMap::from([
        ("Average Price", format_currency(stats.mean)),
        ("Median Price", format_currency(stats.median)),
        (
            "Standard Deviation",
            stats
                .std_dev
                .map(format_currency)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
        (
            "Price Range",
            format_currency(stats.range().unwrap_or(stats.max - stats.min)),
        ),
    ])
}

/// Average, max, min and total volume, grouped with no decimals.
pub fn volume_stats_panel(stats: &SummaryStatistics) -> IndexMap<&'static str, String> {
    let total = stats.sum().unwrap_or(stats.mean * stats.count as f64);
    IndexMap::from([
        ("Average Volume", format_grouped(stats.mean, 0)),
        ("Max Volume", format_grouped(stats.max, 0)),
        ("Min Volume", format_grouped(stats.min, 0)),
        ("Total Volume", format_grouped(total, 0)),
    ])
}

/// `Label: value` lines with the values aligned.
pub fn render_key_values(panel: &IndexMap<&'static str, String>) -> String {
    let width = panel.keys().map(|k| k.len()).max().unwrap_or(0) + 1;
    panel
        .iter()
        .map(|(key, value)| format!("{:<width$} {value}\n", format!("{key}:")))
        .collect()
}

pub fn render_chart_summary(chart: &ChartSpec) -> String {
    let mut out = format!(
        "{} ({} vs {}, height {})\n",
        chart.title, chart.x_axis_title, chart.y_axis_title, chart.height
    );
    for trace in &chart.traces {
        let _ = writeln!(out, "  {}", describe_trace(trace));
    }
    out
}

fn describe_trace(trace: &Trace) -> String {
    let (kind, x) = match trace {
        Trace::Candlestick { x, .. } => ("candlestick", x),
        Trace::Line {
            x, fill_to_zero, ..
        } => (if *fill_to_zero { "area" } else { "line" }, x),
    };
    match (x.first(), x.last()) {
        (Some(first), Some(last)) => format!(
            "{} [{kind}]: {} points, {first} to {last}",
            trace.name(),
            trace.point_count()
        ),
        _ => format!("{} [{kind}]: no points", trace.name()),
    }
}

fn render_moving_average(ma: &MovingAverageSeries) -> String {
    let latest = ma
        .latest()
        .map(format_currency)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    format!(
        "{}: {} of {} defined, latest {latest}\n",
        ma.label(),
        ma.defined_count(),
        ma.len()
    )
}

pub fn render_recent_table(view: &FormattedView) -> String {
    let rows = view
        .rows
        .iter()
        .map(|r| {
            vec![
                r.date.to_string(),
                r.open.clone(),
                r.high.clone(),
                r.low.clone(),
                r.close.clone(),
                r.volume.clone(),
            ]
        })
        .collect::<Vec<_>>();
    render_table(&rows)
}

/// Every record with unformatted numbers.
pub fn render_raw_table(series: &OhlcvSeries) -> String {
    let rows = series
        .records()
        .iter()
        .map(|r| {
            vec![
                r.date.to_string(),
                r.open.to_string(),
                r.high.to_string(),
                r.low.to_string(),
                r.close.to_string(),
                r.volume.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    render_table(&rows)
}

const HEADERS: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];

/// Date left-aligned, numbers right-aligned.
fn render_table(rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let line = |cells: &[&str]| {
        let mut s = String::new();
        for (i, (cell, width)) in cells.iter().zip(widths.iter().copied()).enumerate() {
            if i == 0 {
                let _ = write!(s, "{cell:<width$}");
            } else {
                let _ = write!(s, "  {cell:>width$}");
            }
        }
        s.push('\n');
        s
    };

    let mut out = line(&HEADERS);
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&line(&cells));
    }
    out
}
