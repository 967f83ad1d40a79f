//! Forecast orchestration - prepare, fit, forecast, summarize.
//!
//! The four operations are designed to run in sequence on one validated
//! series. Only this module touches the regression model's native output
//! shape; everything downstream sees `ForecastRow`/`ForecastSummary`.

pub mod model;

use crate::data::validate::{InsufficientData, MIN_RECORDS};
use crate::domain::{ForecastRow, ForecastSummary, ForecastTable, PriceSeries};
use chrono::{Duration, NaiveDate};
use thiserror::Error;

pub use model::{FitError, ModelConfig, Prediction, SeasonalModel, SeasonalityMode};

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error(transparent)]
    InsufficientData(#[from] InsufficientData),

    #[error("model training failed: {0}")]
    Training(FitError),

    #[error("forecast generation failed: {0}")]
    Forecast(String),
}

/// The (date, close) projection the model trains on.
#[derive(Debug, Clone)]
pub struct TrainingFrame {
    points: Vec<(NaiveDate, f64)>,
}

impl TrainingFrame {
    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Project a series down to (date, close), dropping rows without a usable
/// close.
///
/// Re-checks the 30-point minimum even though the validator already gates
/// on it: callers are allowed to skip the validator and come here directly,
/// and dropping unusable closes can shrink a series below the threshold.
pub fn prepare_training_frame(series: &PriceSeries) -> Result<TrainingFrame, InsufficientData> {
    let points: Vec<(NaiveDate, f64)> = series
        .records()
        .iter()
        .filter(|r| r.close.is_finite())
        .map(|r| (r.date, r.close))
        .collect();

    if points.len() < MIN_RECORDS {
        return Err(InsufficientData {
            count: points.len(),
            min: MIN_RECORDS,
        });
    }

    Ok(TrainingFrame { points })
}

/// Train the model: yearly seasonality on, weekly on, daily off, additive.
pub fn fit(frame: &TrainingFrame) -> Result<SeasonalModel, ForecastError> {
    SeasonalModel::fit(frame.points(), ModelConfig::default()).map_err(ForecastError::Training)
}

/// Extend the historical timeline by `horizon_days` calendar days and
/// produce estimates for every date, history and future.
pub fn forecast(model: &SeasonalModel, horizon_days: i64) -> Result<ForecastTable, ForecastError> {
    if horizon_days < 0 {
        return Err(ForecastError::Forecast(format!(
            "horizon must be non-negative, got {horizon_days} days"
        )));
    }

    let last = model.last_date();
    let mut dates: Vec<NaiveDate> = model.history_dates().to_vec();
    for d in 1..=horizon_days {
        dates.push(last + Duration::days(d));
    }

    let mut rows = Vec::with_capacity(dates.len());
    for date in dates {
        let p = model.predict(date);
        if !p.expected.is_finite() {
            return Err(ForecastError::Forecast(format!(
                "non-finite estimate for {date}"
            )));
        }
        rows.push(ForecastRow {
            date,
            point_estimate: p.expected,
            lower_bound: p.band_low,
            upper_bound: p.band_high,
        });
    }

    Ok(ForecastTable::new(rows))
}

/// Derive the summary metrics from the last historical close and the final
/// forecast row. Pure; a zero current price yields a NaN change percentage
/// instead of a division fault.
pub fn summarize(series: &PriceSeries, table: &ForecastTable) -> ForecastSummary {
    let current_price = series.last().map_or(f64::NAN, |r| r.close);
    let (predicted_price, confidence_lower, confidence_upper) = table.last().map_or(
        (f64::NAN, f64::NAN, f64::NAN),
        |row| (row.point_estimate, row.lower_bound, row.upper_bound),
    );

    let price_change = predicted_price - current_price;
    let predicted_change_pct = if current_price == 0.0 {
        f64::NAN
    } else {
        price_change / current_price * 100.0
    };

    ForecastSummary {
        current_price,
        predicted_price,
        price_change,
        predicted_change_pct,
        confidence_lower,
        confidence_upper,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceRecord;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 3, 1).unwrap() + Duration::days(offset)
    }

    fn series_of(n: i64) -> PriceSeries {
        let records = (0..n)
            .map(|i| PriceRecord {
                date: day(i),
                open: 100.0,
                high: 102.0,
                low: 98.0,
                close: 100.0 + 0.3 * i as f64,
                volume: 1_000,
            })
            .collect();
        PriceSeries::from_unsorted("T", records)
    }

    #[test]
    fn ten_records_fail_before_any_fit() {
        let err = prepare_training_frame(&series_of(10)).unwrap_err();
        assert_eq!(err.count, 10);
        assert_eq!(err.min, MIN_RECORDS);
    }

    #[test]
    fn nan_closes_are_dropped_and_counted() {
        let mut records: Vec<PriceRecord> = series_of(31).records().to_vec();
        records[4].close = f64::NAN;
        records[9].close = f64::NAN;
        let series = PriceSeries::from_unsorted("T", records);

        let err = prepare_training_frame(&series).unwrap_err();
        assert_eq!(err.count, 29);
    }

    #[test]
    fn table_covers_history_plus_horizon() {
        let series = series_of(120);
        let frame = prepare_training_frame(&series).unwrap();
        let model = fit(&frame).unwrap();
        let table = forecast(&model, 180).unwrap();

        assert_eq!(table.len(), 120 + 180);
        // Historical rows correspond one-to-one in date.
        for (row, rec) in table.rows().iter().zip(series.records()) {
            assert_eq!(row.date, rec.date);
        }
        assert_eq!(
            table.last().unwrap().date,
            series.last().unwrap().date + Duration::days(180)
        );
    }

    #[test]
    fn zero_horizon_covers_history_only() {
        let series = series_of(60);
        let model = fit(&prepare_training_frame(&series).unwrap()).unwrap();
        let table = forecast(&model, 0).unwrap();
        assert_eq!(table.len(), 60);
    }

    #[test]
    fn negative_horizon_is_rejected() {
        let series = series_of(60);
        let model = fit(&prepare_training_frame(&series).unwrap()).unwrap();
        let err = forecast(&model, -1).unwrap_err();
        assert!(matches!(err, ForecastError::Forecast(_)));
    }

    #[test]
    fn summarize_reads_last_rows() {
        let series = series_of(60);
        let table = ForecastTable::new(vec![ForecastRow {
            date: day(200),
            point_estimate: 150.0,
            lower_bound: 140.0,
            upper_bound: 160.0,
        }]);

        let summary = summarize(&series, &table);
        let current = series.last().unwrap().close;
        assert_eq!(summary.current_price, current);
        assert_eq!(summary.predicted_price, 150.0);
        assert_eq!(summary.confidence_lower, 140.0);
        assert_eq!(summary.confidence_upper, 160.0);
        assert!((summary.predicted_change_pct - (150.0 - current) / current * 100.0).abs() < 1e-12);
    }

    #[test]
    fn summarize_zero_price_yields_nan_not_a_fault() {
        let records = (0..35)
            .map(|i| PriceRecord {
                date: day(i),
                open: 0.0,
                high: 0.0,
                low: 0.0,
                close: 0.0,
                volume: 0,
            })
            .collect();
        let series = PriceSeries::from_unsorted("Z", records);
        let table = ForecastTable::new(vec![ForecastRow {
            date: day(40),
            point_estimate: 1.0,
            lower_bound: 0.5,
            upper_bound: 1.5,
        }]);

        let summary = summarize(&series, &table);
        assert!(summary.predicted_change_pct.is_nan());
    }

    #[test]
    fn summarize_is_deterministic() {
        let series = series_of(90);
        let model = fit(&prepare_training_frame(&series).unwrap()).unwrap();
        let table = forecast(&model, 30).unwrap();

        let a = summarize(&series, &table);
        let b = summarize(&series, &table);
        assert_eq!(a.current_price.to_bits(), b.current_price.to_bits());
        assert_eq!(a.predicted_price.to_bits(), b.predicted_price.to_bits());
        assert_eq!(
            a.predicted_change_pct.to_bits(),
            b.predicted_change_pct.to_bits()
        );
        assert_eq!(a.confidence_lower.to_bits(), b.confidence_lower.to_bits());
        assert_eq!(a.confidence_upper.to_bits(), b.confidence_upper.to_bits());
    }
}
