use super::provider::AuthProvider;
use super::token::TokenInfo;
use crate::error::Result;

/// Owns exactly one authentication strategy and forwards to it
#[derive(Debug)]
pub struct AuthManager {
    provider: Box<dyn AuthProvider>,
}

impl AuthManager {
    pub fn new(provider: impl AuthProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
        }
    }

    pub fn from_boxed(provider: Box<dyn AuthProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &dyn AuthProvider {
        self.provider.as_ref()
    }

    pub async fn get_token(&mut self) -> Option<String> {
        self.provider.get_token().await
    }

    pub async fn authenticate(&mut self) -> Result<TokenInfo> {
        self.provider.authenticate().await
    }

    pub fn is_authenticated(&self) -> bool {
        self.provider.is_authenticated()
    }

    pub fn clear(&mut self) {
        self.provider.clear();
    }

    /// Current token, authenticating first when there is none
    pub async fn ensure_authenticated(&mut self) -> Result<String> {
        if let Some(token) = self.provider.get_token().await {
            return Ok(token);
        }
        let info = self.provider.authenticate().await?;
        Ok(info.access_token)
    }
}
