//! The full prediction pipeline, shared by every front-end.
//!
//! One user action runs one linear pass: fetch -> validate -> prepare ->
//! fit -> forecast -> summarize. No stage is re-entered, nothing is retried
//! automatically, and no state survives the request; a failure at any stage
//! surfaces with enough context (stage, source, symbol) to show to an end
//! user as-is.

use crate::data::validate::{self, InsufficientData};
use crate::data::{FetchError, SourceProvider};
use crate::domain::{ForecastSummary, ForecastTable, PriceSeries, RequestContext};
use crate::forecast::{self, ForecastError};
use std::fmt;
use thiserror::Error;

/// Pipeline stages, in execution order. `Failed` is represented by
/// `RunError` carrying the stage it was reached from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Validating,
    PreparingTraining,
    Fitting,
    Forecasting,
    Summarizing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetching => "fetching",
            Stage::Validating => "validating",
            Stage::PreparingTraining => "preparing training data",
            Stage::Fitting => "fitting",
            Stage::Forecasting => "forecasting",
            Stage::Summarizing => "summarizing",
        };
        f.write_str(name)
    }
}

/// A stage-local failure.
#[derive(Debug, Error)]
pub enum RunErrorKind {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    InsufficientData(#[from] InsufficientData),

    #[error(transparent)]
    Forecast(#[from] ForecastError),
}

/// A failed prediction request: which stage, which source, which symbol,
/// and why.
#[derive(Debug)]
pub struct RunError {
    pub stage: Stage,
    pub source: String,
    pub symbol: String,
    pub kind: RunErrorKind,
}

impl RunError {
    /// Recovery suggestion, when the underlying failure carries one.
    pub fn hint(&self) -> Option<&'static str> {
        match &self.kind {
            RunErrorKind::Fetch(e) => e.hint(),
            RunErrorKind::InsufficientData(_) => {
                Some("pick a symbol or source with a longer history")
            }
            RunErrorKind::Forecast(_) => Some("try a different symbol or timeframe"),
        }
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} failed for {} via {}: {}",
            self.stage, self.symbol, self.source, self.kind
        )
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Everything one prediction request produces. Owned by the caller,
/// discarded at the end of the request.
#[derive(Debug)]
pub struct PredictionOutcome {
    pub series: PriceSeries,
    pub table: ForecastTable,
    pub summary: ForecastSummary,
}

/// Run one prediction request end to end.
pub fn run_prediction(
    ctx: &RequestContext,
    provider: &dyn SourceProvider,
) -> Result<PredictionOutcome, RunError> {
    let fail = |stage: Stage, kind: RunErrorKind| RunError {
        stage,
        source: provider.name().to_string(),
        symbol: ctx.symbol.clone(),
        kind,
    };

    let series = provider
        .fetch(&ctx.symbol)
        .map_err(|e| fail(Stage::Fetching, e.into()))?;

    let series =
        validate::validate(series).map_err(|e| fail(Stage::Validating, e.into()))?;

    let frame = forecast::prepare_training_frame(&series)
        .map_err(|e| fail(Stage::PreparingTraining, e.into()))?;

    let model = forecast::fit(&frame).map_err(|e| fail(Stage::Fitting, e.into()))?;

    let table = forecast::forecast(&model, ctx.horizon.days())
        .map_err(|e| fail(Stage::Forecasting, e.into()))?;

    let summary = forecast::summarize(&series, &table);

    Ok(PredictionOutcome {
        series,
        table,
        summary,
    })
}
