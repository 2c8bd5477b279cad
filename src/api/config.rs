//! Client configuration with builder pattern
//!
//! [`ClientConfig`] is immutable once built. Deriving a variant (for example
//! attaching a freshly obtained token) goes through [`ClientConfig::with_token`]
//! or [`ClientConfig::to_builder`], both of which leave the receiver untouched.

use super::constants;
use crate::error::{OpenF1Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Request timeout, either shared by both phases or split into connect/read
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timeout {
    Total(Duration),
    Split { connect: Duration, read: Duration },
}

impl Timeout {
    /// Build a shared timeout from fractional seconds
    pub fn from_secs_f64(secs: f64) -> Result<Self> {
        Ok(Timeout::Total(positive_duration(secs)?))
    }

    /// Build a connect/read pair from fractional seconds
    pub fn split_secs_f64(connect: f64, read: f64) -> Result<Self> {
        Ok(Timeout::Split {
            connect: positive_duration(connect)?,
            read: positive_duration(read)?,
        })
    }

    pub fn connect(&self) -> Duration {
        match self {
            Timeout::Total(d) => *d,
            Timeout::Split { connect, .. } => *connect,
        }
    }

    pub fn read(&self) -> Duration {
        match self {
            Timeout::Total(d) => *d,
            Timeout::Split { read, .. } => *read,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.connect().is_zero() || self.read().is_zero() {
            return Err(OpenF1Error::config(format!("timeout must be positive: {:?}", self)));
        }
        Ok(())
    }
}

impl Default for Timeout {
    fn default() -> Self {
        Timeout::Total(Duration::from_secs(constants::DEFAULT_TIMEOUT_SECS))
    }
}

fn positive_duration(secs: f64) -> Result<Duration> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(OpenF1Error::config(format!("timeout must be positive: {}", secs)));
    }
    Ok(Duration::from_secs_f64(secs))
}

/// Response body format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Json,
    Csv,
}

impl ResponseFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::Json => "json",
            ResponseFormat::Csv => "csv",
        }
    }
}

impl FromStr for ResponseFormat {
    type Err = OpenF1Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(ResponseFormat::Json),
            "csv" => Ok(ResponseFormat::Csv),
            other => Err(OpenF1Error::config(format!(
                "default_format must be 'json' or 'csv': {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable client configuration
#[derive(Clone, PartialEq)]
pub struct ClientConfig {
    base_url: String,
    token_url: String,
    timeout: Timeout,
    max_retries: u32,
    username: Option<String>,
    password: Option<String>,
    access_token: Option<String>,
    default_format: ResponseFormat,
    user_agent: String,
    extra_headers: BTreeMap<String, String>,
    verify_ssl: bool,
    retry_on_status: Vec<u16>,
    backoff_factor: Duration,
}

impl ClientConfig {
    /// Create a new builder seeded with defaults
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Load settings from `OPENF1_*` environment variables (and `.env`)
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env()?.build()
    }

    /// Builder pre-filled with this configuration, for deriving variants
    pub fn to_builder(&self) -> ClientConfigBuilder {
        ClientConfigBuilder { config: self.clone() }
    }

    /// New configuration carrying the given access token
    pub fn with_token(&self, access_token: impl Into<String>) -> Self {
        let mut config = self.clone();
        config.access_token = Some(access_token.into());
        config
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    pub fn timeout(&self) -> Timeout {
        self.timeout
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn default_format(&self) -> ResponseFormat {
        self.default_format
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn extra_headers(&self) -> &BTreeMap<String, String> {
        &self.extra_headers
    }

    pub fn verify_ssl(&self) -> bool {
        self.verify_ssl
    }

    pub fn retry_on_status(&self) -> &[u16] {
        &self.retry_on_status
    }

    pub fn backoff_factor(&self) -> Duration {
        self.backoff_factor
    }

    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    pub fn has_token(&self) -> bool {
        self.access_token.is_some()
    }

    /// Configured for authenticated requests, by token or by credentials
    pub fn is_authenticated(&self) -> bool {
        self.has_token() || self.has_credentials()
    }

    /// Static headers sent with every request: user agent plus extras
    pub fn headers(&self) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        headers.insert(constants::headers::USER_AGENT.to_string(), self.user_agent.clone());
        headers.extend(self.extra_headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        headers
    }

    fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(OpenF1Error::config("base_url cannot be empty"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(OpenF1Error::config(format!(
                "base_url must start with http:// or https://: {}",
                self.base_url
            )));
        }

        self.timeout.validate()?;

        if self.username.is_some() != self.password.is_some() {
            return Err(OpenF1Error::config(
                "Both username and password must be provided together, or neither",
            ));
        }

        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_BASE_URL.to_string(),
            token_url: constants::DEFAULT_TOKEN_URL.to_string(),
            timeout: Timeout::default(),
            max_retries: constants::DEFAULT_MAX_RETRIES,
            username: None,
            password: None,
            access_token: None,
            default_format: ResponseFormat::Json,
            user_agent: constants::default_user_agent(),
            extra_headers: BTreeMap::new(),
            verify_ssl: true,
            retry_on_status: constants::DEFAULT_RETRY_STATUSES.to_vec(),
            backoff_factor: Duration::from_millis(constants::DEFAULT_BACKOFF_FACTOR_MS),
        }
    }
}

// Secrets stay out of debug output
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token_url", &self.token_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("default_format", &self.default_format)
            .field("user_agent", &self.user_agent)
            .field("extra_headers", &self.extra_headers)
            .field("verify_ssl", &self.verify_ssl)
            .field("retry_on_status", &self.retry_on_status)
            .finish()
    }
}

/// Builder for ClientConfig
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn token_url(mut self, token_url: impl Into<String>) -> Self {
        self.config.token_url = token_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Timeout) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Shared connect/read timeout
    pub fn timeout_duration(self, timeout: Duration) -> Self {
        self.timeout(Timeout::Total(timeout))
    }

    /// Distinct connect and read timeouts
    pub fn split_timeout(self, connect: Duration, read: Duration) -> Self {
        self.timeout(Timeout::Split { connect, read })
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.config.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = Some(password.into());
        self
    }

    /// Set both halves of the password-grant credentials
    pub fn credentials(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username(username).password(password)
    }

    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.config.access_token = Some(token.into());
        self
    }

    pub fn default_format(mut self, format: ResponseFormat) -> Self {
        self.config.default_format = format;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Add one static header sent with every request
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.extra_headers.insert(name.into(), value.into());
        self
    }

    pub fn extra_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.config.extra_headers = headers;
        self
    }

    pub fn verify_ssl(mut self, verify: bool) -> Self {
        self.config.verify_ssl = verify;
        self
    }

    pub fn retry_on_status(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.config.retry_on_status = statuses.into_iter().collect();
        self
    }

    /// Base factor of the exponential retry backoff
    pub fn backoff_factor(mut self, factor: Duration) -> Self {
        self.config.backoff_factor = factor;
        self
    }

    /// Overlay `OPENF1_*` environment variables, loading `.env` first if present
    pub fn with_env(mut self) -> Result<Self> {
        dotenvy::dotenv().ok();

        if let Some(url) = env_var("OPENF1_BASE_URL") {
            self = self.base_url(url);
        }
        if let Some(url) = env_var("OPENF1_TOKEN_URL") {
            self = self.token_url(url);
        }
        if let Some(username) = env_var("OPENF1_USERNAME") {
            self = self.username(username);
        }
        if let Some(password) = env_var("OPENF1_PASSWORD") {
            self = self.password(password);
        }
        if let Some(token) = env_var("OPENF1_ACCESS_TOKEN") {
            self = self.access_token(token);
        }
        if let Some(timeout) = env_var("OPENF1_TIMEOUT") {
            let secs: f64 = timeout
                .parse()
                .map_err(|_| OpenF1Error::config(format!("OPENF1_TIMEOUT is not a number: {}", timeout)))?;
            self = self.timeout(Timeout::from_secs_f64(secs)?);
        }
        if let Some(retries) = env_var("OPENF1_MAX_RETRIES") {
            self = self.max_retries(parse_retries(&retries)?);
        }
        if let Some(format) = env_var("OPENF1_FORMAT") {
            self = self.default_format(format.parse()?);
        }
        if let Some(verify) = env_var("OPENF1_VERIFY_SSL") {
            self = self.verify_ssl(!matches!(verify.to_lowercase().as_str(), "0" | "false" | "no"));
        }

        Ok(self)
    }

    /// Validate and build the final configuration
    pub fn build(self) -> Result<ClientConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Parse a retry count from text, rejecting negatives with a config error
pub fn parse_retries(raw: &str) -> Result<u32> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| OpenF1Error::config(format!("max_retries is not an integer: {}", raw)))?;
    if value < 0 {
        return Err(OpenF1Error::config(format!("max_retries cannot be negative: {}", value)));
    }
    u32::try_from(value).map_err(|_| OpenF1Error::config(format!("max_retries is too large: {}", value)))
}
