//! CSV upload source - parse user-provided tabular bytes, no network.
//!
//! The schema is exact and case-sensitive: `Date, Open, High, Low, Close,
//! Volume`, with dates in `YYYY-MM-DD`. Extra columns are tolerated and
//! ignored; missing ones are enumerated in the error. `write_csv` emits the
//! same six-column format, so a written series re-reads to an identical one.

use super::provider::{FetchError, SourceProvider};
use crate::domain::{PriceRecord, PriceSeries};
use chrono::NaiveDate;
use std::io;

/// Required columns, in the order `write_csv` emits them.
pub const REQUIRED_COLUMNS: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];

/// Source adapter over an uploaded CSV file's bytes.
pub struct CsvProvider {
    bytes: Vec<u8>,
}

impl CsvProvider {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    fn parse_bytes(symbol: &str, bytes: &[u8]) -> Result<PriceSeries, FetchError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let headers = reader
            .headers()
            .map_err(|e| FetchError::Parse(format!("unreadable header row: {e}")))?
            .clone();

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| !headers.iter().any(|h| h == **col))
            .map(|col| col.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(FetchError::Schema { missing });
        }

        let index_of = |col: &str| -> usize {
            headers
                .iter()
                .position(|h| h == col)
                .expect("checked above")
        };
        let idx = [
            index_of("Date"),
            index_of("Open"),
            index_of("High"),
            index_of("Low"),
            index_of("Close"),
            index_of("Volume"),
        ];

        let mut records = Vec::new();
        for (i, row) in reader.records().enumerate() {
            // Header is line 1.
            let line = i + 2;
            let row = row.map_err(|e| FetchError::Parse(format!("line {line}: {e}")))?;

            let field = |j: usize| row.get(idx[j]).unwrap_or("");

            let date = NaiveDate::parse_from_str(field(0), "%Y-%m-%d").map_err(|e| {
                FetchError::Parse(format!("line {line}: invalid Date '{}': {e}", field(0)))
            })?;

            let number = |name: &str, j: usize| -> Result<f64, FetchError> {
                field(j).parse::<f64>().map_err(|e| {
                    FetchError::Parse(format!("line {line}: invalid {name} '{}': {e}", field(j)))
                })
            };

            records.push(PriceRecord {
                date,
                open: number("Open", 1)?,
                high: number("High", 2)?,
                low: number("Low", 3)?,
                close: number("Close", 4)?,
                volume: field(5).parse::<u64>().map_err(|e| {
                    FetchError::Parse(format!("line {line}: invalid Volume '{}': {e}", field(5)))
                })?,
            });
        }

        Ok(PriceSeries::from_unsorted(symbol, records))
    }
}

impl SourceProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv_upload"
    }

    fn fetch(&self, symbol: &str) -> Result<PriceSeries, FetchError> {
        Self::parse_bytes(symbol, &self.bytes)
    }
}

/// Write a series in the required six-column format.
pub fn write_csv(series: &PriceSeries) -> Result<String, csv::Error> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(REQUIRED_COLUMNS)?;
    for r in series.records() {
        wtr.write_record([
            &r.date.to_string(),
            &r.open.to_string(),
            &r.high.to_string(),
            &r.low.to_string(),
            &r.close.to_string(),
            &r.volume.to_string(),
        ])?;
    }
    let data = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(io::Error::other(e.to_string())))?;
    String::from_utf8(data).map_err(|e| csv::Error::from(io::Error::other(e.to_string())))
}
