//! Common transport-layer types shared between the CLI and the frontend.
//! These structs mirror the payload delivered by the data collaborator so both
//! sides can deserialize forecast documents without duplicating shapes.

mod explanation;
mod forecast;
mod time_unit;

pub use explanation::{ExplanationEntry, ExplanationSet};
pub use forecast::{ForecastPayload, Kpi, SeriesPoint, TimePoint, RESERVED_KEYS};
pub use time_unit::TimeUnit;
