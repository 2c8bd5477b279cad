//! Authentication strategies
//!
//! Every strategy implements [`AuthProvider`]. [`AuthProvider::get_token`]
//! never fails: an unavailable token is reported as `None`.
//! [`AuthProvider::authenticate`] is the only operation that surfaces errors.

use super::token::TokenInfo;
use crate::api::http::FormFields;
use crate::api::transport::Transport;
use crate::error::{ApiError, NO_STATUS, OpenF1Error, Result};
use async_trait::async_trait;
use log::{debug, error};
use std::fmt;

#[async_trait]
pub trait AuthProvider: Send + Sync + fmt::Debug {
    /// Current access token, if one can be produced
    async fn get_token(&mut self) -> Option<String>;

    /// Obtain a token, failing with an auth error
    async fn authenticate(&mut self) -> Result<TokenInfo>;

    fn is_authenticated(&self) -> bool;

    /// Reset to the unauthenticated state; idempotent
    fn clear(&mut self);
}

/// Anonymous access
#[derive(Debug, Clone, Default)]
pub struct NoAuthProvider;

#[async_trait]
impl AuthProvider for NoAuthProvider {
    async fn get_token(&mut self) -> Option<String> {
        None
    }

    async fn authenticate(&mut self) -> Result<TokenInfo> {
        Err(OpenF1Error::auth("No authentication configured"))
    }

    fn is_authenticated(&self) -> bool {
        false
    }

    fn clear(&mut self) {}
}

/// A caller-supplied token, used as-is
#[derive(Clone)]
pub struct TokenAuthProvider {
    access_token: String,
}

impl TokenAuthProvider {
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        let access_token = access_token.into();
        if access_token.is_empty() {
            return Err(OpenF1Error::config("Access token cannot be empty"));
        }
        Ok(Self { access_token })
    }

    /// Replace the wrapped token
    pub fn set_token(&mut self, access_token: impl Into<String>) {
        self.access_token = access_token.into();
    }
}

#[async_trait]
impl AuthProvider for TokenAuthProvider {
    async fn get_token(&mut self) -> Option<String> {
        Some(self.access_token.clone())
    }

    async fn authenticate(&mut self) -> Result<TokenInfo> {
        Ok(TokenInfo::new(self.access_token.clone()))
    }

    fn is_authenticated(&self) -> bool {
        true
    }

    /// Leaves an empty token behind: `get_token` then yields `Some("")`,
    /// which tells "cleared" apart from "never configured".
    fn clear(&mut self) {
        self.access_token.clear();
    }
}

impl fmt::Debug for TokenAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuthProvider")
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// OAuth2 password grant against the token endpoint
pub struct PasswordAuthProvider {
    username: String,
    password: String,
    token_url: String,
    transport: Transport,
    token_info: Option<TokenInfo>,
}

impl PasswordAuthProvider {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        token_url: impl Into<String>,
        transport: Transport,
    ) -> Result<Self> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() {
            return Err(OpenF1Error::config("Username cannot be empty"));
        }
        if password.is_empty() {
            return Err(OpenF1Error::config("Password cannot be empty"));
        }

        Ok(Self {
            username,
            password,
            token_url: token_url.into(),
            transport,
            token_info: None,
        })
    }

    pub fn token_info(&self) -> Option<&TokenInfo> {
        self.token_info.as_ref()
    }

    fn grant_form(&self) -> FormFields {
        let mut form = FormFields::new();
        form.insert("grant_type".to_string(), "password".to_string());
        form.insert("username".to_string(), self.username.clone());
        form.insert("password".to_string(), self.password.clone());
        form
    }

    async fn exchange(&self) -> Result<TokenInfo> {
        let payload = self.transport.post_form(&self.token_url, &self.grant_form()).await?;
        TokenInfo::from_response(&payload)
    }
}

#[async_trait]
impl AuthProvider for PasswordAuthProvider {
    async fn get_token(&mut self) -> Option<String> {
        let needs_refresh = self.token_info.as_ref().is_none_or(TokenInfo::is_expired);
        if needs_refresh {
            if let Err(e) = self.authenticate().await {
                debug!("Token unavailable: {}", e);
                return None;
            }
        }
        self.token_info.as_ref().map(|t| t.access_token.clone())
    }

    async fn authenticate(&mut self) -> Result<TokenInfo> {
        debug!("Authenticating with password grant to {}", self.token_url);

        match self.exchange().await {
            Ok(token) => {
                debug!("Authentication successful, token obtained");
                self.token_info = Some(token.clone());
                Ok(token)
            }
            Err(e) => {
                error!("Authentication failed: {}", e);
                match e {
                    OpenF1Error::Auth(_) => Err(e),
                    other => Err(OpenF1Error::Auth(ApiError::new(
                        format!("Authentication failed: {}", other),
                        NO_STATUS,
                    ))),
                }
            }
        }
    }

    fn is_authenticated(&self) -> bool {
        self.token_info.as_ref().is_some_and(|t| !t.is_expired())
    }

    fn clear(&mut self) {
        self.token_info = None;
    }
}

impl fmt::Debug for PasswordAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordAuthProvider")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("token_url", &self.token_url)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
