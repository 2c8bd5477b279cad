//! Query construction
//!
//! Filters are described with [`Filters`]/[`FilterBuilder`] and encoded into
//! wire parameters by [`build_query_params`].

pub mod encode;
pub mod filters;

pub use encode::{QueryParams, build_query_params, sanitize_for_logging, to_query_string};
pub use filters::{FilterBuilder, FilterValue, Filters, Operator, Scalar};
