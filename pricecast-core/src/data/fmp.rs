//! Financial Modeling Prep data source.
//!
//! Calls the `historical-price-full` endpoint bounded by a fixed start date
//! and today. Unlike Alpha Vantage the entries arrive object-shaped with
//! numeric fields, so the mapping is direct. FMP covers the international
//! exchanges Alpha Vantage does not.

use super::provider::{FetchError, SourceProvider, FETCH_TIMEOUT};
use crate::domain::{PriceRecord, PriceSeries};
use chrono::NaiveDate;
use serde::Deserialize;

const BASE_URL: &str = "https://financialmodelingprep.com/api/v3/historical-price-full";

/// Earliest date requested from the endpoint.
const HISTORY_START: &str = "2020-01-01";

#[derive(Debug, Deserialize)]
pub(crate) struct HistoricalResponse {
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    historical: Option<Vec<HistoricalBar>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoricalBar {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    // FMP reports volume as a JSON number that may carry a fractional part.
    volume: f64,
}

pub struct FmpProvider {
    client: reqwest::blocking::Client,
    api_key: String,
}

impl FmpProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            api_key: api_key.into(),
        }
    }

    pub(crate) fn parse_payload(
        symbol: &str,
        resp: HistoricalResponse,
    ) -> Result<PriceSeries, FetchError> {
        if let Some(message) = resp.error_message {
            return Err(FetchError::Provider {
                message,
                market_unsupported: false,
            });
        }

        let Some(historical) = resp.historical else {
            return Err(FetchError::NoDataFound {
                symbol: symbol.to_string(),
                market_unsupported: false,
            });
        };

        let mut records = Vec::with_capacity(historical.len());
        for bar in historical {
            let date = NaiveDate::parse_from_str(&bar.date, "%Y-%m-%d")
                .map_err(|e| FetchError::Parse(format!("invalid date '{}': {e}", bar.date)))?;
            records.push(PriceRecord {
                date,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume.max(0.0) as u64,
            });
        }

        // The endpoint returns newest-first; from_unsorted restores
        // ascending order.
        Ok(PriceSeries::from_unsorted(symbol, records))
    }
}

impl SourceProvider for FmpProvider {
    fn name(&self) -> &str {
        "fmp"
    }

    fn fetch(&self, symbol: &str) -> Result<PriceSeries, FetchError> {
        let today = chrono::Local::now().date_naive().to_string();
        let url = format!("{BASE_URL}/{symbol}");
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("from", HISTORY_START),
                ("to", &today),
            ])
            .send()
            .map_err(FetchError::from_transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Network(format!("HTTP {status} for {symbol}")));
        }

        let payload: HistoricalResponse = resp
            .json()
            .map_err(|e| FetchError::Parse(format!("malformed response for {symbol}: {e}")))?;

        Self::parse_payload(symbol, payload)
    }
}
