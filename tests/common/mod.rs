//! Shared helpers for integration tests against a mock OpenF1 server

#![allow(dead_code)]

use openf1_client::api::{ClientConfig, ClientConfigBuilder};
use std::time::Duration;
use wiremock::MockServer;

/// Data API root served by the mock
pub fn base_url(server: &MockServer) -> String {
    format!("{}/v1", server.uri())
}

pub fn token_url(server: &MockServer) -> String {
    format!("{}/token", server.uri())
}

/// Builder pointed at the mock, with near-instant retry backoff
pub fn builder_for(server: &MockServer) -> ClientConfigBuilder {
    ClientConfig::builder()
        .base_url(base_url(server))
        .token_url(token_url(server))
        .backoff_factor(Duration::from_millis(1))
}

pub fn config_for(server: &MockServer) -> ClientConfig {
    builder_for(server).build().expect("valid test config")
}
