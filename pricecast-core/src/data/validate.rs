//! Series validation gate - runs between fetch and orchestration.

use crate::domain::PriceSeries;
use thiserror::Error;

/// Minimum record count before forecasting is attempted. Seasonal
/// components need at least this many points to fit.
pub const MIN_RECORDS: usize = 30;

#[derive(Debug, Clone, Error)]
#[error("insufficient data: {count} records, need at least {min}")]
pub struct InsufficientData {
    pub count: usize,
    pub min: usize,
}

/// Accept a series with at least `MIN_RECORDS` records, unchanged; reject
/// anything shorter. Content is not inspected - this is the length gate
/// only, and the only defense against a degenerate downstream call.
pub fn validate(series: PriceSeries) -> Result<PriceSeries, InsufficientData> {
    if series.len() < MIN_RECORDS {
        return Err(InsufficientData {
            count: series.len(),
            min: MIN_RECORDS,
        });
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceRecord;
    use chrono::NaiveDate;

    fn series_of(n: usize) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let records = (0..n)
            .map(|i| PriceRecord {
                date: start + chrono::Duration::days(i as i64),
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 100.0,
                volume: 1,
            })
            .collect();
        PriceSeries::from_unsorted("T", records)
    }

    #[test]
    fn rejects_29_records() {
        let err = validate(series_of(29)).unwrap_err();
        assert_eq!(err.count, 29);
        assert_eq!(err.min, MIN_RECORDS);
    }

    #[test]
    fn accepts_30_records() {
        let series = validate(series_of(30)).unwrap();
        assert_eq!(series.len(), 30);
    }

    #[test]
    fn passes_series_through_unchanged() {
        let original = series_of(40);
        let validated = validate(original.clone()).unwrap();
        assert_eq!(original.records(), validated.records());
        assert_eq!(original.symbol(), validated.symbol());
    }
}
