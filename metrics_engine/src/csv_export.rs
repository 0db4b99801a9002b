//! CSV export of the full, unformatted series (and the matching reader).
//!
//! Layout: header `Date,Open,High,Low,Close,Volume`, ISO dates, plain numbers
//! with no currency symbols or grouping.

use std::io::{Read, Write};

use chrono::NaiveDate;
use market_data::{OhlcvRecord, OhlcvSeries, SeriesError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error while writing CSV")]
    Io(#[from] std::io::Error),

    #[error("CSV rows do not form a valid series: {0}")]
    Series(#[from] SeriesError),
}

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Volume")]
    volume: u64,
}

impl From<&OhlcvRecord> for CsvRow {
    fn from(r: &OhlcvRecord) -> Self {
        Self {
            date: r.date,
            open: r.open,
            high: r.high,
            low: r.low,
            close: r.close,
            volume: r.volume,
        }
    }
}

impl From<CsvRow> for OhlcvRecord {
    fn from(r: CsvRow) -> Self {
        OhlcvRecord::new(r.date, r.open, r.high, r.low, r.close, r.volume)
    }
}

/// `{SYMBOL}.csv`.
pub fn export_file_name(symbol: &str) -> String {
    format!("{symbol}.csv")
}

/// Writes every record of `series` to `writer`.
///
/// The header row is written even for an empty series.
pub fn write_csv<W: Write>(series: &OhlcvSeries, writer: W) -> Result<(), CsvError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(["Date", "Open", "High", "Low", "Close", "Volume"])?;
    for record in series.records() {
        wtr.serialize(CsvRow::from(record))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn to_csv_string(series: &OhlcvSeries) -> Result<String, CsvError> {
    let mut buf = Vec::new();
    write_csv(series, &mut buf)?;
    // The writer only ever emits UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Parses a file produced by [`write_csv`] back into a validated series.
pub fn read_csv<R: Read>(symbol: &str, reader: R) -> Result<OhlcvSeries, CsvError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let records = rdr
        .deserialize::<CsvRow>()
        .map(|row| row.map(OhlcvRecord::from))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(OhlcvSeries::new(symbol, records)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> OhlcvSeries {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        OhlcvSeries::new(
            "AAPL",
            vec![
                OhlcvRecord::new(d(2), 100.0, 105.0, 95.0, 102.0, 1000),
                OhlcvRecord::new(d(3), 102.0, 110.25, 100.0, 108.125, 1_500_000),
            ],
        )
        .unwrap()
    }

    #[test]
    fn file_name_uses_symbol() {
        assert_eq!(export_file_name("BBCA.JK"), "BBCA.JK.csv");
    }

    #[test]
    fn output_is_unformatted() {
        let text = to_csv_string(&series()).unwrap();
        let mut lines = text.lines();

        assert_eq!(lines.next(), Some("Date,Open,High,Low,Close,Volume"));
        let second = lines.nth(1).unwrap();
        assert!(second.starts_with("2024-01-03,"));
        assert!(second.ends_with(",1500000"));
        assert!(!text.contains('$'));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn empty_series_still_has_header() {
        let text = to_csv_string(&OhlcvSeries::empty("AAPL")).unwrap();
        assert_eq!(text.trim_end(), "Date,Open,High,Low,Close,Volume");
        assert!(read_csv("AAPL", text.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn reader_rejects_unordered_rows() {
        let text = "Date,Open,High,Low,Close,Volume\n2024-01-03,1,1,1,1,1\n2024-01-02,1,1,1,1,1\n";
        assert!(matches!(
            read_csv("X", text.as_bytes()),
            Err(CsvError::Series(SeriesError::UnorderedDates { .. }))
        ));
    }

    #[test]
    fn reader_rejects_formatted_numbers() {
        let text = "Date,Open,High,Low,Close,Volume\n2024-01-03,$1.00,1,1,1,\"1,000\"\n";
        assert!(matches!(read_csv("X", text.as_bytes()), Err(CsvError::Csv(_))));
    }
}
