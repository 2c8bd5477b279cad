//! Low-level HTTP client
//!
//! Owns the pooled `reqwest` client, builds URLs, attaches the bearer token
//! and static headers, applies the retry policy and maps the final outcome
//! onto [`OpenF1Error`].

use super::config::ClientConfig;
use super::constants::{self, headers};
use super::query::{QueryParams, sanitize_for_logging, to_query_string};
use super::resilience::{RetryConfig, RetryPolicy};
use crate::error::{OpenF1Error, ResponseBody, Result, check_status};
use log::{debug, error};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Instant;

/// Form body sent with POST requests
pub type FormFields = BTreeMap<String, String>;

/// A fully read, status-checked response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub url: String,
    pub body: String,
}

impl HttpResponse {
    /// Decode the body as JSON; a malformed payload is a validation failure
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| OpenF1Error::Validation {
            message: format!("Invalid JSON in response from {}: {}", self.url, e),
            field: None,
            value: Some(Value::String(self.body.clone())),
        })
    }

    pub fn text(&self) -> &str {
        &self.body
    }
}

/// HTTP client bound to one immutable configuration
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    config: ClientConfig,
    base_url: String,
    retry_policy: RetryPolicy,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let timeout = config.timeout();
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .connect_timeout(timeout.connect())
            .read_timeout(timeout.read())
            .user_agent(config.user_agent())
            .default_headers(static_headers(&config)?)
            .danger_accept_invalid_certs(!config.verify_ssl())
            .build()
            .map_err(|e| OpenF1Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            retry_policy: RetryPolicy::new(RetryConfig::from_client_config(&config)),
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Full URL for a path relative to the base URL
    pub fn build_url(&self, path: &str) -> String {
        constants::join_url(&self.base_url, path)
    }

    fn bearer_token(&self) -> Option<&str> {
        self.config.access_token().filter(|t| !t.is_empty())
    }

    /// Request a path relative to the base URL
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        params: Option<&QueryParams>,
        form: Option<&FormFields>,
    ) -> Result<HttpResponse> {
        let url = self.build_url(path);
        self.execute(method, url, params, form).await
    }

    pub async fn get(&self, path: &str, params: Option<&QueryParams>) -> Result<HttpResponse> {
        self.request(Method::GET, path, params, None).await
    }

    pub async fn post(&self, path: &str, form: Option<&FormFields>) -> Result<HttpResponse> {
        self.request(Method::POST, path, None, form).await
    }

    /// Request an absolute URL outside the base URL (the token endpoint)
    pub async fn send_absolute(
        &self,
        method: Method,
        url: &str,
        form: Option<&FormFields>,
    ) -> Result<HttpResponse> {
        self.execute(method, url.to_string(), None, form).await
    }

    async fn execute(
        &self,
        method: Method,
        url: String,
        params: Option<&QueryParams>,
        form: Option<&FormFields>,
    ) -> Result<HttpResponse> {
        debug!(
            "HTTP {} {} params={:?} form={:?}",
            method,
            url,
            params.map(|p| sanitize_for_logging(p)),
            form.map(|f| sanitize_for_logging(f))
        );

        let start = Instant::now();
        let response = self
            .retry_policy
            .execute(
                method.as_str(),
                || self.send_once(&method, &url, params, form),
                |response: &reqwest::Response| response.status().as_u16(),
            )
            .await
            .map_err(|e| self.map_transport_error(e, &url))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e, &url))?;

        debug!(
            "HTTP {} {} -> {} ({:.2}s)",
            method,
            url,
            status.as_u16(),
            start.elapsed().as_secs_f64()
        );

        check_status(
            status.as_u16(),
            Some(ResponseBody::parse(&body)),
            Some(&url),
            retry_after(&headers),
        )?;

        Ok(HttpResponse {
            status,
            headers,
            url,
            body,
        })
    }

    async fn send_once(
        &self,
        method: &Method,
        url: &str,
        params: Option<&QueryParams>,
        form: Option<&FormFields>,
    ) -> reqwest::Result<reqwest::Response> {
        let target = match params {
            Some(params) if !params.is_empty() => format!("{}?{}", url, to_query_string(params)),
            _ => url.to_string(),
        };
        let mut builder = self.client.request(method.clone(), target);

        if let Some(form) = form {
            builder = builder.form(form);
        }
        if let Some(token) = self.bearer_token() {
            builder = builder.bearer_auth(token);
        }

        builder.send().await
    }

    fn map_transport_error(&self, err: reqwest::Error, url: &str) -> OpenF1Error {
        if err.is_timeout() {
            error!("Request timeout: {}", url);
            OpenF1Error::Timeout {
                message: format!("Request to {} timed out", url),
                timeout: self.config.timeout().read(),
                source: Some(Box::new(err)),
            }
        } else if err.is_connect() {
            error!("Connection error: {} - {}", url, err);
            OpenF1Error::transport(format!("Failed to connect to {}", url), err)
        } else {
            error!("Request error: {} - {}", url, err);
            OpenF1Error::transport(format!("Request to {} failed", url), err)
        }
    }

    /// Drop this handle; clones held elsewhere keep the shared pool alive
    pub fn close(self) {
        debug!("Closing HTTP client for {}", self.base_url);
    }
}

fn static_headers(config: &ClientConfig) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in config.extra_headers() {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| OpenF1Error::config(format!("invalid header name: {}", name)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| OpenF1Error::config(format!("invalid value for header {}", name)))?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Integer `Retry-After` seconds, if present and numeric
fn retry_after(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(headers::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}
