//! Alpha Vantage data source.
//!
//! Calls the `TIME_SERIES_DAILY` endpoint. The payload keys daily entries
//! by date string and carries every numeric field as a string, so parsing
//! is field-by-field. Alpha Vantage covers US listings and ADRs only; its
//! error and no-data responses are mapped onto the fetch taxonomy with a
//! market-unsupported hint where the evidence supports one.

use super::compatibility::has_foreign_suffix;
use super::provider::{FetchError, SourceProvider, FETCH_TIMEOUT};
use crate::domain::{PriceRecord, PriceSeries};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;

const BASE_URL: &str = "https://www.alphavantage.co/query";

/// Response shape for `TIME_SERIES_DAILY`. Exactly one of the three
/// optional fields is expected to be present.
#[derive(Debug, Deserialize)]
pub(crate) struct DailyResponse {
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<BTreeMap<String, DailyQuote>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DailyQuote {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

pub struct AlphaVantageProvider {
    client: reqwest::blocking::Client,
    api_key: String,
}

impl AlphaVantageProvider {
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

    /// Map a decoded payload to a canonical series.
    ///
    /// Split from the HTTP call so the error taxonomy and field mapping are
    /// testable against mock payloads without a network.
    pub(crate) fn parse_payload(
        symbol: &str,
        resp: DailyResponse,
    ) -> Result<PriceSeries, FetchError> {
        if let Some(message) = resp.error_message {
            // "Invalid API call" is how the provider phrases a rejected
            // request, commonly an uncovered exchange.
            let market_unsupported = message.contains("Invalid API call");
            return Err(FetchError::Provider {
                message,
                market_unsupported,
            });
        }

        if let Some(note) = resp.note {
            return Err(FetchError::QuotaExceeded { message: note });
        }

        let Some(time_series) = resp.time_series else {
            return Err(FetchError::NoDataFound {
                symbol: symbol.to_string(),
                market_unsupported: has_foreign_suffix(symbol),
            });
        };

        let mut records = Vec::with_capacity(time_series.len());
        for (date_str, quote) in time_series {
            let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
                .map_err(|e| FetchError::Parse(format!("invalid date '{date_str}': {e}")))?;
            records.push(PriceRecord {
                date,
                open: parse_price("open", &date_str, &quote.open)?,
                high: parse_price("high", &date_str, &quote.high)?,
                low: parse_price("low", &date_str, &quote.low)?,
                close: parse_price("close", &date_str, &quote.close)?,
                volume: quote.volume.trim().parse::<u64>().map_err(|e| {
                    FetchError::Parse(format!(
                        "invalid volume '{}' on {date_str}: {e}",
                        quote.volume
                    ))
                })?,
            });
        }

        Ok(PriceSeries::from_unsorted(symbol, records))
    }
}

fn parse_price(field: &str, date: &str, raw: &str) -> Result<f64, FetchError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| FetchError::Parse(format!("invalid {field} '{raw}' on {date}: {e}")))
}

impl SourceProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        "alpha_vantage"
    }

    fn fetch(&self, symbol: &str) -> Result<PriceSeries, FetchError> {
        let resp = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("outputsize", "full"),
                ("apikey", &self.api_key),
                ("datatype", "json"),
            ])
            .send()
            .map_err(FetchError::from_transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Network(format!("HTTP {status} for {symbol}")));
        }

        let payload: DailyResponse = resp
            .json()
            .map_err(|e| FetchError::Parse(format!("malformed response for {symbol}: {e}")))?;

        Self::parse_payload(symbol, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> DailyResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn quota_note_maps_to_quota_exceeded() {
        let resp = decode(r#"{"Note": "Thank you for using Alpha Vantage! Our standard API rate limit is 25 requests per day."}"#);
        let err = AlphaVantageProvider::parse_payload("AAPL", resp).unwrap_err();
        assert!(matches!(err, FetchError::QuotaExceeded { .. }));
    }

    #[test]
    fn explicit_error_maps_to_provider_error() {
        let resp = decode(
            r#"{"Error Message": "Invalid API call. Please retry or visit the documentation."}"#,
        );
        let err = AlphaVantageProvider::parse_payload("RELIANCE.NS", resp).unwrap_err();
        match err {
            FetchError::Provider {
                market_unsupported, ..
            } => assert!(market_unsupported),
            other => panic!("expected Provider error, got {other:?}"),
        }
    }

    #[test]
    fn missing_series_with_foreign_suffix_hints_market() {
        let resp = decode(r#"{"Meta Data": {}}"#);
        let err = AlphaVantageProvider::parse_payload("RELIANCE.NS", resp).unwrap_err();
        match err {
            FetchError::NoDataFound {
                symbol,
                market_unsupported,
            } => {
                assert_eq!(symbol, "RELIANCE.NS");
                assert!(market_unsupported);
            }
            other => panic!("expected NoDataFound, got {other:?}"),
        }
    }

    #[test]
    fn missing_series_without_suffix_has_no_market_hint() {
        let resp = decode(r#"{}"#);
        let err = AlphaVantageProvider::parse_payload("ZZZZ", resp).unwrap_err();
        assert!(!err.market_unsupported());
    }

    #[test]
    fn success_payload_parses_and_sorts() {
        let resp = decode(
            r#"{
                "Time Series (Daily)": {
                    "2024-01-03": {"1. open": "102.0", "2. high": "104.0", "3. low": "101.0", "4. close": "103.5", "5. volume": "3000"},
                    "2024-01-02": {"1. open": "100.0", "2. high": "102.0", "3. low": "99.0", "4. close": "101.0", "5. volume": "2000"}
                }
            }"#,
        );
        let series = AlphaVantageProvider::parse_payload("AAPL", resp).unwrap();
        assert_eq!(series.symbol(), "AAPL");
        assert_eq!(series.len(), 2);
        assert_eq!(
            series.first().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        assert_eq!(series.last().unwrap().close, 103.5);
        assert_eq!(series.last().unwrap().volume, 3000);
    }

    #[test]
    fn unparseable_volume_is_a_parse_error() {
        let resp = decode(
            r#"{
                "Time Series (Daily)": {
                    "2024-01-02": {"1. open": "100.0", "2. high": "102.0", "3. low": "99.0", "4. close": "101.0", "5. volume": "n/a"}
                }
            }"#,
        );
        let err = AlphaVantageProvider::parse_payload("AAPL", resp).unwrap_err();
        match err {
            FetchError::Parse(msg) => assert!(msg.contains("volume")),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }
}
