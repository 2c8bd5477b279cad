//! Resource accessors
//!
//! [`Endpoint<T>`] carries the generic list/first/count operations; the
//! sibling modules add convenience queries for specific resources.

pub mod base;
pub mod results;
pub mod schedule;
pub mod telemetry;
pub mod timing;

pub use base::Endpoint;
pub use telemetry::{DEFAULT_HIGH_SPEED, DRS_OPEN, TemperatureExtremes};
