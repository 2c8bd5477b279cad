//! OpenF1 REST API module
//!
//! Layered bottom-up: query encoding, the retrying HTTP client, the
//! transport that shapes responses, typed endpoints, and the client facade.

pub mod client;
pub mod config;
pub mod constants;
pub mod endpoints;
pub mod http;
pub mod models;
pub mod query;
pub mod resilience;
pub mod transport;

pub use client::OpenF1Client;
pub use config::{ClientConfig, ClientConfigBuilder, ResponseFormat, Timeout};
pub use endpoints::Endpoint;
pub use http::{HttpClient, HttpResponse};
pub use models::Resource;
pub use query::{FilterBuilder, FilterValue, Filters, Operator, Scalar, build_query_params};
pub use resilience::{RetryConfig, RetryPolicy};
pub use transport::{FetchResult, Record, Transport};
