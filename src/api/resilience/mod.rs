//! Resilience features
//!
//! Provides the status-driven retry policy used by the HTTP layer.

pub mod retry;

pub use retry::{RetryConfig, RetryPolicy};
