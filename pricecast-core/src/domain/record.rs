//! PriceRecord - the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV record for a single symbol.
///
/// The usual ordering invariants (`low <= open,close <= high`) are expected
/// of well-formed input but are not re-derived here: malformed rows pass
/// through uncorrected as long as they survive type and format checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// An ordered daily price series for one symbol.
///
/// Constructed exactly once per request by a source adapter and immutable
/// afterwards. Records are strictly ascending by date with no duplicates -
/// `from_unsorted` establishes this regardless of the order the source
/// delivered them in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    records: Vec<PriceRecord>,
}

impl PriceSeries {
    /// Build a series from records in arbitrary order.
    ///
    /// Sorts ascending by date and drops duplicate dates, keeping the first
    /// occurrence.
    pub fn from_unsorted(symbol: impl Into<String>, mut records: Vec<PriceRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        records.dedup_by_key(|r| r.date);
        Self {
            symbol: symbol.into(),
            records,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&PriceRecord> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&PriceRecord> {
        self.records.last()
    }
}
