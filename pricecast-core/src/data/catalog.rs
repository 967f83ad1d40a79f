//! Symbol catalog - the selectable symbol -> company-name table.
//!
//! Stored as a TOML file so deployments can swap listings without a
//! rebuild; a built-in default covers the common US tickers, ADRs, and the
//! international listings that exercise the compatibility policy.

use super::compatibility::is_compatible;
use crate::domain::SourceId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolCatalog {
    symbols: BTreeMap<String, String>,
}

impl SymbolCatalog {
    /// Load a catalog from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("read catalog file: {e}"))?;
        Self::from_toml(&content)
    }

    /// Parse a catalog from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("parse catalog TOML: {e}"))
    }

    /// Serialize the catalog to TOML.
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("serialize catalog: {e}"))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains_key(symbol)
    }

    pub fn name_of(&self, symbol: &str) -> Option<&str> {
        self.symbols.get(symbol).map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.symbols.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The subset of this catalog usable with a source. Advisory - used to
    /// narrow the picker before a network call is attempted.
    pub fn filter_compatible(&self, source: SourceId) -> SymbolCatalog {
        SymbolCatalog {
            symbols: self
                .symbols
                .iter()
                .filter(|(sym, _)| is_compatible(source, sym))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Built-in default listing.
    pub fn default_listing() -> Self {
        let entries: [(&str, &str); 40] = [
            ("AAPL", "Apple Inc."),
            ("AMZN", "Amazon.com Inc."),
            ("BA", "Boeing Company"),
            ("BABA", "Alibaba Group (ADR)"),
            ("BAC", "Bank of America"),
            ("COST", "Costco Wholesale"),
            ("DIS", "Walt Disney Company"),
            ("GOOGL", "Alphabet Inc."),
            ("HD", "Home Depot Inc."),
            ("INFY", "Infosys Limited (ADR)"),
            ("JNJ", "Johnson & Johnson"),
            ("JPM", "JPMorgan Chase & Co."),
            ("KO", "Coca-Cola Company"),
            ("MA", "Mastercard Inc."),
            ("MCD", "McDonald's Corporation"),
            ("META", "Meta Platforms"),
            ("MSFT", "Microsoft Corporation"),
            ("NFLX", "Netflix Inc."),
            ("NKE", "Nike Inc."),
            ("NVDA", "NVIDIA Corporation"),
            ("ORCL", "Oracle Corporation"),
            ("PEP", "PepsiCo Inc."),
            ("PG", "Procter & Gamble"),
            ("SAP", "SAP SE (ADR)"),
            ("SBUX", "Starbucks Corporation"),
            ("SHEL", "Shell plc (ADR)"),
            ("TSLA", "Tesla Inc."),
            ("TSM", "Taiwan Semiconductor (ADR)"),
            ("UBER", "Uber Technologies"),
            ("V", "Visa Inc."),
            ("WMT", "Walmart Inc."),
            ("XOM", "Exxon Mobil Corporation"),
            // International listings, FMP only.
            ("ASML.AS", "ASML Holding"),
            ("BMW.DE", "BMW AG"),
            ("BP.L", "BP p.l.c."),
            ("MC.PA", "LVMH"),
            ("NESN.SW", "Nestle S.A."),
            ("RELIANCE.NS", "Reliance Industries"),
            ("TCS.NS", "Tata Consultancy Services"),
            ("7203.T", "Toyota Motor Corporation"),
        ];
        SymbolCatalog {
            symbols: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}
