//! Seasonal trend regression - the forecasting procedure.
//!
//! Fits an additive decomposition of a daily series: linear trend plus
//! weekly seasonality (day-of-week dummies) plus yearly seasonality
//! (Fourier harmonic pairs on the day-of-year), solved as one least-squares
//! problem.
//!
//! Implementation notes:
//! - The design matrix is tall and can be rank-deficient (a weekday dummy
//!   column is all-zero when the series has no weekend rows), so we solve
//!   with SVD and progressively looser tolerances rather than QR.
//! - Uncertainty is the residual standard deviation, reported as a
//!   symmetric 95% band. Multiplicative mode fits the log series and
//!   exponentiates, which makes the band asymmetric in price space.
//!
//! Nothing outside this module depends on the model's native output shape;
//! the orchestrator maps `Prediction` to the public `ForecastRow`.

use chrono::{Datelike, NaiveDate};
use nalgebra::{DMatrix, DVector};
use thiserror::Error;

const YEAR_DAYS: f64 = 365.25;

/// Fourier pairs used for the yearly component.
const YEARLY_HARMONICS: usize = 3;

/// Two-sided z for a 95% interval.
const Z_95: f64 = 1.96;

/// How periodic components combine with the trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonalityMode {
    Additive,
    Multiplicative,
}

/// Prophet-style seasonality switches.
///
/// `daily_seasonality` is accepted for contract parity but inert: with one
/// record per calendar day there is no intraday signal to fit.
#[derive(Debug, Clone, Copy)]
pub struct ModelConfig {
    pub yearly_seasonality: bool,
    pub weekly_seasonality: bool,
    pub daily_seasonality: bool,
    pub mode: SeasonalityMode,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            yearly_seasonality: true,
            weekly_seasonality: true,
            daily_seasonality: false,
            mode: SeasonalityMode::Additive,
        }
    }
}

#[derive(Debug, Error)]
pub enum FitError {
    #[error("{count} points cannot identify {params} model terms")]
    TooFewPoints { count: usize, params: usize },

    #[error("dates must be strictly increasing (violation at index {index})")]
    NonMonotonicDates { index: usize },

    #[error("non-finite value at index {index}")]
    NonFiniteValue { index: usize },

    #[error("multiplicative seasonality requires strictly positive values (index {index})")]
    NonPositiveValue { index: usize },

    #[error("design matrix is too ill-conditioned to solve")]
    Singular,
}

/// Native model output for a single date.
#[derive(Debug, Clone, Copy)]
pub struct Prediction {
    pub expected: f64,
    pub band_low: f64,
    pub band_high: f64,
}

/// A fitted seasonal trend model.
#[derive(Debug)]
pub struct SeasonalModel {
    config: ModelConfig,
    origin: NaiveDate,
    history: Vec<NaiveDate>,
    beta: DVector<f64>,
    sigma: f64,
}

impl SeasonalModel {
    /// Fit the model to (date, value) pairs, which must be strictly
    /// ascending by date.
    pub fn fit(points: &[(NaiveDate, f64)], config: ModelConfig) -> Result<Self, FitError> {
        let n = points.len();
        let params = param_count(&config);
        if n <= params {
            return Err(FitError::TooFewPoints { count: n, params });
        }

        for (i, pair) in points.windows(2).enumerate() {
            if pair[1].0 <= pair[0].0 {
                return Err(FitError::NonMonotonicDates { index: i + 1 });
            }
        }

        let origin = points[0].0;
        let mut y = DVector::zeros(n);
        for (i, &(_, value)) in points.iter().enumerate() {
            if !value.is_finite() {
                return Err(FitError::NonFiniteValue { index: i });
            }
            y[i] = match config.mode {
                SeasonalityMode::Additive => value,
                SeasonalityMode::Multiplicative => {
                    if value <= 0.0 {
                        return Err(FitError::NonPositiveValue { index: i });
                    }
                    value.ln()
                }
            };
        }

        let mut x = DMatrix::zeros(n, params);
        for (i, &(date, _)) in points.iter().enumerate() {
            for (j, v) in design_row(&config, origin, date).into_iter().enumerate() {
                x[(i, j)] = v;
            }
        }

        let beta = solve_least_squares(&x, &y).ok_or(FitError::Singular)?;

        // Residual standard deviation with a degrees-of-freedom correction.
        let fitted = &x * &beta;
        let rss: f64 = (0..n).map(|i| (y[i] - fitted[i]).powi(2)).sum();
        let dof = (n - params).max(1) as f64;
        let sigma = (rss / dof).sqrt();

        Ok(Self {
            config,
            origin,
            history: points.iter().map(|&(d, _)| d).collect(),
            beta,
            sigma,
        })
    }

    /// Dates the model was trained on, ascending.
    pub fn history_dates(&self) -> &[NaiveDate] {
        &self.history
    }

    pub fn last_date(&self) -> NaiveDate {
        // fit() rejects empty inputs, so history is never empty.
        self.history[self.history.len() - 1]
    }

    /// Point estimate and 95% band for any date, past or future.
    pub fn predict(&self, date: NaiveDate) -> Prediction {
        let row = design_row(&self.config, self.origin, date);
        let mu: f64 = row
            .iter()
            .zip(self.beta.iter())
            .map(|(a, b)| a * b)
            .sum();
        let half = Z_95 * self.sigma;
        match self.config.mode {
            SeasonalityMode::Additive => Prediction {
                expected: mu,
                band_low: mu - half,
                band_high: mu + half,
            },
            SeasonalityMode::Multiplicative => Prediction {
                expected: mu.exp(),
                band_low: (mu - half).exp(),
                band_high: (mu + half).exp(),
            },
        }
    }
}

fn param_count(config: &ModelConfig) -> usize {
    let mut p = 2; // intercept + trend
    if config.weekly_seasonality {
        p += 6; // Monday..Saturday dummies, Sunday is the baseline
    }
    if config.yearly_seasonality {
        p += 2 * YEARLY_HARMONICS;
    }
    p
}

fn design_row(config: &ModelConfig, origin: NaiveDate, date: NaiveDate) -> Vec<f64> {
    let mut row = Vec::with_capacity(param_count(config));
    row.push(1.0);
    // Trend in years since the first training date, to keep the columns
    // comparably scaled for long histories.
    row.push((date - origin).num_days() as f64 / YEAR_DAYS);

    if config.weekly_seasonality {
        let weekday = date.weekday().num_days_from_monday() as usize;
        for d in 0..6 {
            row.push(if weekday == d { 1.0 } else { 0.0 });
        }
    }

    if config.yearly_seasonality {
        let phase = date.ordinal0() as f64 / YEAR_DAYS;
        for k in 1..=YEARLY_HARMONICS {
            let angle = 2.0 * std::f64::consts::PI * k as f64 * phase;
            row.push(angle.sin());
            row.push(angle.cos());
        }
    }

    row
}

/// Solve a least-squares problem with SVD, trying progressively looser
/// tolerances so near-collinear columns (rank-deficient weekday dummies)
/// still yield a finite solution.
fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trend_only() -> ModelConfig {
        ModelConfig {
            yearly_seasonality: false,
            weekly_seasonality: false,
            daily_seasonality: false,
            mode: SeasonalityMode::Additive,
        }
    }

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 2).unwrap() + chrono::Duration::days(offset)
    }

    fn linear_points(n: i64, intercept: f64, slope_per_day: f64) -> Vec<(NaiveDate, f64)> {
        (0..n)
            .map(|i| (day(i), intercept + slope_per_day * i as f64))
            .collect()
    }

    #[test]
    fn recovers_linear_trend() {
        let points = linear_points(60, 100.0, 0.5);
        let model = SeasonalModel::fit(&points, trend_only()).unwrap();

        // Extrapolate 30 days past the end.
        let p = model.predict(day(89));
        let truth = 100.0 + 0.5 * 89.0;
        assert!(
            (p.expected - truth).abs() < 1e-6,
            "expected {truth}, got {}",
            p.expected
        );
        // Perfect fit: the band collapses onto the estimate.
        assert!(p.band_high - p.band_low < 1e-6);
    }

    #[test]
    fn band_brackets_estimate_on_noisy_data() {
        // Deterministic pseudo-noise on top of a trend.
        let points: Vec<_> = (0..120)
            .map(|i| {
                let noise = ((i as f64) * 12.9898).sin() * 3.0;
                (day(i), 100.0 + 0.2 * i as f64 + noise)
            })
            .collect();
        let model = SeasonalModel::fit(&points, ModelConfig::default()).unwrap();

        let p = model.predict(day(150));
        assert!(p.expected.is_finite());
        assert!(p.band_low < p.expected && p.expected < p.band_high);
    }

    #[test]
    fn weekday_only_history_still_fits() {
        // Trading data has no weekend rows; the Saturday dummy column is
        // all-zero and the solve must not reject the rank deficiency.
        let points: Vec<_> = (0..200)
            .map(|i| day(i))
            .filter(|d| d.weekday().number_from_monday() <= 5)
            .enumerate()
            .map(|(i, d)| (d, 50.0 + 0.1 * i as f64))
            .collect();
        assert!(points.len() > 100);
        let model = SeasonalModel::fit(&points, ModelConfig::default()).unwrap();
        assert!(model.predict(day(220)).expected.is_finite());
    }

    #[test]
    fn rejects_non_monotonic_dates() {
        let mut points = linear_points(40, 10.0, 1.0);
        points.swap(5, 6);
        let err = SeasonalModel::fit(&points, trend_only()).unwrap_err();
        assert!(matches!(err, FitError::NonMonotonicDates { .. }));
    }

    #[test]
    fn rejects_too_few_points() {
        let points = linear_points(10, 10.0, 1.0);
        let err = SeasonalModel::fit(&points, ModelConfig::default()).unwrap_err();
        assert!(matches!(err, FitError::TooFewPoints { .. }));
    }

    #[test]
    fn rejects_non_finite_values() {
        let mut points = linear_points(40, 10.0, 1.0);
        points[3].1 = f64::NAN;
        let err = SeasonalModel::fit(&points, trend_only()).unwrap_err();
        assert!(matches!(err, FitError::NonFiniteValue { index: 3 }));
    }

    #[test]
    fn multiplicative_requires_positive_values() {
        let mut points = linear_points(40, 10.0, 1.0);
        points[7].1 = 0.0;
        let config = ModelConfig {
            mode: SeasonalityMode::Multiplicative,
            ..trend_only()
        };
        let err = SeasonalModel::fit(&points, config).unwrap_err();
        assert!(matches!(err, FitError::NonPositiveValue { index: 7 }));
    }

    #[test]
    fn multiplicative_band_stays_positive() {
        let points: Vec<_> = (0..90)
            .map(|i| (day(i), 100.0 * (1.0 + 0.001 * i as f64)))
            .collect();
        let config = ModelConfig {
            mode: SeasonalityMode::Multiplicative,
            ..ModelConfig::default()
        };
        let model = SeasonalModel::fit(&points, config).unwrap();
        let p = model.predict(day(120));
        assert!(p.band_low > 0.0);
        assert!(p.band_low <= p.expected && p.expected <= p.band_high);
    }
}
