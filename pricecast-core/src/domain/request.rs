//! Request context - which source, which symbol, how far ahead.
//!
//! A `RequestContext` is built once per user action and never mutated
//! afterwards; every pipeline stage reads from it instead of from ambient
//! session state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Month horizons the caller may request.
pub const MONTH_CHOICES: [u32; 8] = [1, 2, 3, 6, 9, 12, 18, 24];

/// Year horizons the caller may request.
pub const YEAR_CHOICES: [u32; 5] = [1, 2, 3, 4, 5];

/// Identifies one of the closed set of data sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceId {
    AlphaVantage,
    Fmp,
    CsvUpload,
}

impl SourceId {
    /// Human-readable source name, used in error context and the catalog.
    pub fn name(&self) -> &'static str {
        match self {
            SourceId::AlphaVantage => "Alpha Vantage",
            SourceId::Fmp => "Financial Modeling Prep",
            SourceId::CsvUpload => "CSV upload",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// User-facing forecast horizon.
///
/// Converted to calendar days with the flat 30-days-per-month and
/// 365-days-per-year approximation the reference behavior uses, truncating
/// toward zero. The drift for multi-month horizons (18 months -> 540 days)
/// is preserved deliberately; do not "fix" the arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Horizon {
    Months(u32),
    Years(u32),
}

impl Horizon {
    /// Horizon length in calendar days.
    pub fn days(&self) -> i64 {
        match *self {
            Horizon::Months(m) => i64::from(m) * 30,
            Horizon::Years(y) => i64::from(y) * 365,
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Horizon::Months(1) => write!(f, "1 month"),
            Horizon::Months(m) => write!(f, "{m} months"),
            Horizon::Years(1) => write!(f, "1 year"),
            Horizon::Years(y) => write!(f, "{y} years"),
        }
    }
}

/// Everything a single prediction request needs, fixed up front.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub source: SourceId,
    pub symbol: String,
    pub horizon: Horizon,
}

impl RequestContext {
    pub fn new(source: SourceId, symbol: impl Into<String>, horizon: Horizon) -> Self {
        Self {
            source,
            symbol: symbol.into(),
            horizon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_months_is_180_days() {
        assert_eq!(Horizon::Months(6).days(), 180);
    }

    #[test]
    fn two_years_is_730_days() {
        assert_eq!(Horizon::Years(2).days(), 730);
    }

    #[test]
    fn eighteen_months_keeps_flat_month_approximation() {
        // 540, not the calendar-accurate ~548.
        assert_eq!(Horizon::Months(18).days(), 540);
    }

    #[test]
    fn all_offered_choices_are_positive() {
        for m in MONTH_CHOICES {
            assert!(Horizon::Months(m).days() > 0);
        }
        for y in YEAR_CHOICES {
            assert!(Horizon::Years(y).days() > 0);
        }
    }

    #[test]
    fn horizon_display() {
        assert_eq!(Horizon::Months(1).to_string(), "1 month");
        assert_eq!(Horizon::Months(6).to_string(), "6 months");
        assert_eq!(Horizon::Years(2).to_string(), "2 years");
    }
}
