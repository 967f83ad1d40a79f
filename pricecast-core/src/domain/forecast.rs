//! Forecast output types - the stable contract the presentation layer sees.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of forecast output. Dates beyond the last historical date are
/// the future horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub date: NaiveDate,
    pub point_estimate: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// Ordered forecast rows covering the full historical span plus the
/// requested horizon. Produced once per prediction request and owned by
/// the call that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastTable {
    rows: Vec<ForecastRow>,
}

impl ForecastTable {
    pub fn new(rows: Vec<ForecastRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ForecastRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&ForecastRow> {
        self.rows.last()
    }
}

/// Direction implied by the predicted change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Bullish,
    Bearish,
    Flat,
}

/// Decision-relevant metrics derived from a series and its forecast table.
///
/// Computed fresh per request, never cached. `predicted_change_pct` is NaN
/// when the current price is exactly zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub current_price: f64,
    pub predicted_price: f64,
    pub price_change: f64,
    pub predicted_change_pct: f64,
    pub confidence_lower: f64,
    pub confidence_upper: f64,
}

impl ForecastSummary {
    pub fn trend(&self) -> Trend {
        if self.predicted_change_pct > 0.0 {
            Trend::Bullish
        } else if self.predicted_change_pct < 0.0 {
            Trend::Bearish
        } else {
            // Zero and NaN both land here.
            Trend::Flat
        }
    }
}
