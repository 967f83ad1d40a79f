//! Data acquisition and normalization.

pub mod alpha_vantage;
pub mod catalog;
pub mod compatibility;
pub mod csv_import;
pub mod fmp;
pub mod provider;
pub mod validate;

pub use alpha_vantage::AlphaVantageProvider;
pub use catalog::SymbolCatalog;
pub use compatibility::{has_foreign_suffix, is_compatible, FOREIGN_SUFFIXES};
pub use csv_import::{write_csv, CsvProvider, REQUIRED_COLUMNS};
pub use fmp::FmpProvider;
pub use provider::{FetchError, SourceProvider, FETCH_TIMEOUT};
pub use validate::{validate, InsufficientData, MIN_RECORDS};
