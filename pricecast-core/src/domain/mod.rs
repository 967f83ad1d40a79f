//! Domain types - canonical price records, forecast output, request context.

pub mod forecast;
pub mod record;
pub mod request;

pub use forecast::{ForecastRow, ForecastSummary, ForecastTable, Trend};
pub use record::{PriceRecord, PriceSeries};
pub use request::{Horizon, RequestContext, SourceId, MONTH_CHOICES, YEAR_CHOICES};
