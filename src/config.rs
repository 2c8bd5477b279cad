use crate::api::config::{ClientConfigBuilder, Timeout, parse_retries};
use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings read from `config.toml`; every field is optional and only
/// overrides the built-in default when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub token_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub access_token: Option<String>,
    /// Seconds, shared by connect and read unless `connect_timeout` is set
    pub timeout: Option<f64>,
    pub connect_timeout: Option<f64>,
    pub max_retries: Option<i64>,
    pub format: Option<String>,
    pub verify_ssl: Option<bool>,
    pub user_agent: Option<String>,
    pub retry_on_status: Option<Vec<u16>>,
    pub headers: BTreeMap<String, String>,
}

impl FileConfig {
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("openf1")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".openf1")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load `path`, or the default location; a missing file is an empty config
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            if path.is_some() {
                anyhow::bail!("Config file not found: {:?}", config_path);
            }
            debug!("No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        Self::parse(&content).with_context(|| format!("Failed to parse config file: {:?}", config_path))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Overlay the present fields onto `builder`
    pub fn apply(&self, mut builder: ClientConfigBuilder) -> Result<ClientConfigBuilder> {
        if let Some(url) = &self.base_url {
            builder = builder.base_url(url);
        }
        if let Some(url) = &self.token_url {
            builder = builder.token_url(url);
        }
        if let Some(username) = &self.username {
            builder = builder.username(username);
        }
        if let Some(password) = &self.password {
            builder = builder.password(password);
        }
        if let Some(token) = &self.access_token {
            builder = builder.access_token(token);
        }
        match (self.connect_timeout, self.timeout) {
            (Some(connect), Some(read)) => builder = builder.timeout(Timeout::split_secs_f64(connect, read)?),
            (None, Some(total)) => builder = builder.timeout(Timeout::from_secs_f64(total)?),
            (Some(_), None) => anyhow::bail!("connect_timeout requires timeout"),
            (None, None) => {}
        }
        if let Some(retries) = self.max_retries {
            builder = builder.max_retries(parse_retries(&retries.to_string())?);
        }
        if let Some(format) = &self.format {
            builder = builder.default_format(format.parse()?);
        }
        if let Some(verify) = self.verify_ssl {
            builder = builder.verify_ssl(verify);
        }
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent);
        }
        if let Some(statuses) = &self.retry_on_status {
            builder = builder.retry_on_status(statuses.iter().copied());
        }
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }

        Ok(builder)
    }
}
