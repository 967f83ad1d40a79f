//! Source provider trait and structured error types.
//!
//! The SourceProvider trait abstracts over the closed set of data origins
//! (Alpha Vantage, Financial Modeling Prep, CSV upload) so the pipeline can
//! swap implementations and tests can substitute in-memory providers.

use crate::domain::PriceSeries;
use std::time::Duration;
use thiserror::Error;

/// Network timeout applied by every HTTP-calling provider. A call that
/// exceeds it fails with `FetchError::Timeout` rather than hanging.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Structured error types for fetch operations.
///
/// Every variant is presentable to an end user as-is; `hint()` adds the
/// recovery suggestion the reference behavior shows alongside.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The upstream service returned an explicit error payload.
    /// `market_unsupported` is set when the message indicates the call
    /// itself was rejected, typically an uncovered market.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        market_unsupported: bool,
    },

    /// The upstream rate limit was hit.
    #[error("request quota exhausted: {message}")]
    QuotaExceeded { message: String },

    /// The expected data field was absent from an otherwise well-formed
    /// response. `market_unsupported` is a heuristic hint based on the
    /// symbol's exchange suffix, not an authoritative verdict.
    #[error("no data found for symbol '{symbol}'")]
    NoDataFound {
        symbol: String,
        market_unsupported: bool,
    },

    /// Required CSV columns are absent.
    #[error("missing required columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    /// A date or numeric field could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// The network call exceeded its deadline.
    #[error("request timed out after {}s", FETCH_TIMEOUT.as_secs())]
    Timeout,

    /// Any other transport failure.
    #[error("network error: {0}")]
    Network(String),
}

impl FetchError {
    /// Whether this failure indicates the symbol's market is not covered
    /// by the source that was asked.
    pub fn market_unsupported(&self) -> bool {
        matches!(
            self,
            FetchError::Provider {
                market_unsupported: true,
                ..
            } | FetchError::NoDataFound {
                market_unsupported: true,
                ..
            }
        )
    }

    /// Recovery suggestion to show next to the error message.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            FetchError::Provider {
                market_unsupported: true,
                ..
            }
            | FetchError::NoDataFound {
                market_unsupported: true,
                ..
            } => Some("this source does not cover the symbol's exchange; try a different source"),
            FetchError::NoDataFound { .. } => Some("try a different source for this symbol"),
            FetchError::QuotaExceeded { .. } => Some("wait for the quota window to reset and retry"),
            FetchError::Schema { .. } | FetchError::Parse(_) => {
                Some("fix the input file and upload it again")
            }
            FetchError::Timeout => Some("transient failure; retrying the request may succeed"),
            _ => None,
        }
    }

    /// Map a reqwest transport error into the fetch taxonomy.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

/// Trait for data sources.
///
/// Implementations are idempotent for identical arguments (identical bytes
/// parse deterministically; network calls are plain reads), so an external
/// cache may safely wrap them. The cache is not part of this crate.
pub trait SourceProvider: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch the full daily series for a symbol.
    fn fetch(&self, symbol: &str) -> Result<PriceSeries, FetchError>;
}
