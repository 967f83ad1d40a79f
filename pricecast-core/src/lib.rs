//! PriceCast Core - canonical price series, source adapters, validation,
//! and forecast orchestration.
//!
//! This crate is the library boundary an external presentation layer
//! consumes:
//! - Domain types (price records, series, forecast rows/tables/summaries,
//!   request context)
//! - Source adapters behind one trait (Alpha Vantage, Financial Modeling
//!   Prep, CSV upload) with a shared error taxonomy
//! - The series length gate and the source/symbol compatibility policy
//! - A seasonal trend regression and the orchestration around it
//! - `pipeline::run_prediction`, the single linear pass a user action
//!   triggers

pub mod data;
pub mod domain;
pub mod forecast;
pub mod pipeline;
