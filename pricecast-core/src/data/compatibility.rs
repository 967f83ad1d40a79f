//! Source/symbol compatibility policy.
//!
//! Alpha Vantage only covers US listings and ADRs; symbols carrying a
//! foreign exchange suffix need a different source. The suffix list is a
//! heuristic used to warn before a network call - the adapter still
//! surfaces the authoritative error if the warning is ignored.

use crate::domain::SourceId;

/// Exchange suffixes denoting non-US listings (NSE, Tokyo, Korea,
/// Amsterdam, Frankfurt, London, Paris, Swiss, Saudi).
pub const FOREIGN_SUFFIXES: [&str; 9] = [
    ".NS", ".T", ".KS", ".AS", ".DE", ".L", ".PA", ".SW", ".SR",
];

/// True if the symbol carries a recognized foreign exchange suffix.
pub fn has_foreign_suffix(symbol: &str) -> bool {
    FOREIGN_SUFFIXES.iter().any(|s| symbol.ends_with(s))
}

/// Whether a symbol is usable with a source. Advisory only.
pub fn is_compatible(source: SourceId, symbol: &str) -> bool {
    match source {
        SourceId::AlphaVantage => !has_foreign_suffix(symbol),
        SourceId::Fmp | SourceId::CsvUpload => true,
    }
}
