//! Error taxonomy for the OpenF1 client
//!
//! Every fallible operation in the crate returns [`OpenF1Error`]. HTTP-derived
//! variants share an [`ApiError`] payload so callers can inspect the exact
//! failure context (status, body, URL) regardless of which kind they matched.

use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Boxed low-level cause carried by transport failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, OpenF1Error>;

/// Status code used for failures that never produced an HTTP response
/// (token payload problems, strategy-level auth failures).
pub const NO_STATUS: u16 = 0;

/// Body of an error response: parsed JSON when the content was JSON-shaped,
/// otherwise the raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// Parse a raw body, preferring JSON
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(text.to_string()),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            ResponseBody::Json(Value::Null) => true,
            ResponseBody::Json(_) => false,
            ResponseBody::Text(text) => text.is_empty(),
        }
    }
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Json(value) => write!(f, "{}", value),
            ResponseBody::Text(text) => write!(f, "{}", text),
        }
    }
}

/// Details of a non-2xx response (or an auth failure with no response)
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub message: String,
    pub status_code: u16,
    pub response_body: Option<ResponseBody>,
    pub request_url: Option<String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            message: message.into(),
            status_code,
            response_body: None,
            request_url: None,
        }
    }

    pub fn with_body(mut self, body: ResponseBody) -> Self {
        self.response_body = Some(body);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.request_url = Some(url.into());
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (HTTP {})", self.message, self.status_code)?;
        if let Some(url) = &self.request_url {
            write!(f, " | URL: {}", url)?;
        }
        if let Some(body) = self.response_body.as_ref().filter(|b| !b.is_empty()) {
            write!(f, " | Response: {}", body)?;
        }
        Ok(())
    }
}

/// All errors raised by the OpenF1 client
#[derive(Debug, Error)]
pub enum OpenF1Error {
    /// Invalid construction arguments
    #[error("{0}")]
    Config(String),

    /// Network-level failure; no HTTP response was obtained
    #[error("{}", transport_display(.message, .source))]
    Transport {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The request exceeded the configured timeout
    #[error("{message} (timeout: {}s)", .timeout.as_secs_f64())]
    Timeout {
        message: String,
        timeout: Duration,
        #[source]
        source: Option<BoxError>,
    },

    /// 401/403, or a failure inside an authentication strategy
    #[error("{0}")]
    Auth(ApiError),

    /// 404
    #[error("{0}")]
    NotFound(ApiError),

    /// 429, with the advisory Retry-After value in seconds
    #[error("{}", rate_limit_display(.error, .retry_after))]
    RateLimit {
        error: ApiError,
        retry_after: Option<u64>,
    },

    /// 5xx once the retry budget is spent
    #[error("{0}")]
    Server(ApiError),

    /// Any other non-2xx status
    #[error("{0}")]
    Api(ApiError),

    /// A response payload did not match the expected schema
    #[error("{}", validation_display(.message, .field, .value))]
    Validation {
        message: String,
        field: Option<String>,
        value: Option<Value>,
    },
}

fn transport_display(message: &str, source: &Option<BoxError>) -> String {
    match source {
        Some(source) => format!("{}: {}", message, source),
        None => message.to_string(),
    }
}

fn rate_limit_display(error: &ApiError, retry_after: &Option<u64>) -> String {
    match retry_after {
        Some(secs) if *secs > 0 => format!("{} | Retry after: {}s", error, secs),
        _ => error.to_string(),
    }
}

fn validation_display(message: &str, field: &Option<String>, value: &Option<Value>) -> String {
    let mut parts = vec![message.to_string()];
    if let Some(field) = field {
        parts.push(format!("Field: {}", field));
    }
    if let Some(value) = value {
        parts.push(format!("Value: {}", value));
    }
    parts.join(" | ")
}

impl OpenF1Error {
    pub fn config(message: impl Into<String>) -> Self {
        OpenF1Error::Config(message.into())
    }

    pub fn transport(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        OpenF1Error::Transport {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Authentication failure that never reached an HTTP status
    pub fn auth(message: impl Into<String>) -> Self {
        OpenF1Error::Auth(ApiError::new(message, NO_STATUS))
    }

    /// True for network failures, timeouts included
    pub fn is_transport(&self) -> bool {
        matches!(self, OpenF1Error::Transport { .. } | OpenF1Error::Timeout { .. })
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, OpenF1Error::Auth(_))
    }

    /// Shared API payload, for every variant that carries one
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            OpenF1Error::Auth(e)
            | OpenF1Error::NotFound(e)
            | OpenF1Error::Server(e)
            | OpenF1Error::Api(e) => Some(e),
            OpenF1Error::RateLimit { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        self.api_error().map(|e| e.status_code)
    }

    pub fn retry_after(&self) -> Option<u64> {
        match self {
            OpenF1Error::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

fn default_message(status_code: u16) -> String {
    match status_code {
        400 => "Bad request".to_string(),
        401 => "Authentication required".to_string(),
        403 => "Access forbidden".to_string(),
        404 => "Resource not found".to_string(),
        405 => "Method not allowed".to_string(),
        408 => "Request timeout".to_string(),
        422 => "Validation error".to_string(),
        429 => "Rate limit exceeded".to_string(),
        500 => "Internal server error".to_string(),
        502 => "Bad gateway".to_string(),
        503 => "Service unavailable".to_string(),
        504 => "Gateway timeout".to_string(),
        other => format!("HTTP error {}", other),
    }
}

/// Map a final HTTP status onto the error taxonomy.
///
/// 2xx returns `Ok(())`; every other status produces exactly one variant.
pub fn check_status(
    status_code: u16,
    response_body: Option<ResponseBody>,
    request_url: Option<&str>,
    retry_after: Option<u64>,
) -> Result<()> {
    if (200..300).contains(&status_code) {
        return Ok(());
    }

    let error = ApiError {
        message: default_message(status_code),
        status_code,
        response_body,
        request_url: request_url.map(str::to_string),
    };

    Err(match status_code {
        401 | 403 => OpenF1Error::Auth(error),
        404 => OpenF1Error::NotFound(error),
        429 => OpenF1Error::RateLimit { error, retry_after },
        500..=599 => OpenF1Error::Server(error),
        _ => OpenF1Error::Api(error),
    })
}
