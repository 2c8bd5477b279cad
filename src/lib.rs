//! Typed client for the OpenF1 motorsport data API
//!
//! ```no_run
//! # async fn demo() -> openf1_client::error::Result<()> {
//! use openf1_client::{FilterBuilder, OpenF1Client};
//!
//! let client = OpenF1Client::builder().connect().await?;
//! let filters = FilterBuilder::new()
//!     .eq("session_key", "latest")
//!     .gte("speed", 315)
//!     .build();
//! let samples = client.car_data().list(&filters).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod csv_parser;
pub mod error;

pub use api::{
    ClientConfig, ClientConfigBuilder, Endpoint, FilterBuilder, FilterValue, Filters, OpenF1Client,
    Operator, ResponseFormat, Scalar, Timeout,
};
pub use auth::{AuthManager, AuthProvider, TokenInfo};
pub use error::{ApiError, OpenF1Error, Result};
