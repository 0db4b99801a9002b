//! Locale-invariant display formatting and the recent-price view.
//!
//! All output uses `.` as the decimal separator and `,` for thousands
//! grouping, independent of the host locale.

use chrono::NaiveDate;
use market_data::OhlcvSeries;
use serde::Serialize;

/// Inserts `,` every three digits into the integer part of a plain decimal string.
pub fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// `$D.DD`, e.g. `$1234.50`. Currency values are not grouped.
///
/// Values that round to zero never carry a sign.
pub fn format_currency(value: f64) -> String {
    let magnitude = format!("{:.2}", value.abs());
    if value.is_sign_negative() && magnitude != "0.00" {
        format!("-${magnitude}")
    } else {
        format!("${magnitude}")
    }
}

/// Rounds to `decimals` places and groups thousands, e.g. `1,234,567`.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    group_thousands(&format!("{value:.decimals$}"))
}

/// Integer volume with thousands separators.
pub fn format_volume(volume: u64) -> String {
    group_thousands(&volume.to_string())
}

/// `D.DD%`.
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// `+D.DD%` / `-D.DD%`, for deltas.
pub fn format_signed_percent(value: f64) -> String {
    format!("{value:+.2}%")
}

/// One display row of the recent-price table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedRow {
    pub date: NaiveDate,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
}

/// Display projection of the most recent records; never authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormattedView {
    pub rows: Vec<FormattedRow>,
}

impl FormattedView {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Formats the last `min(count, len)` records, oldest first.
pub fn format_recent_window(series: &OhlcvSeries, count: usize) -> FormattedView {
    let rows = series
        .tail(count)
        .iter()
        .map(|r| FormattedRow {
            date: r.date,
            open: format_currency(r.open),
            high: format_currency(r.high),
            low: format_currency(r.low),
            close: format_currency(r.close),
            volume: format_volume(r.volume),
        })
        .collect();
    FormattedView { rows }
}
