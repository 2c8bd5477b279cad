//! OAuth2 token model

use crate::api::constants::TOKEN_EXPIRY_MARGIN_SECS;
use crate::error::{ApiError, NO_STATUS, OpenF1Error, ResponseBody, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An access token and its lifetime, as issued by the token endpoint.
///
/// Immutable once built; a later authentication replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: Option<i64>,
    pub expires_at: Option<DateTime<Utc>>,
    pub scope: Option<String>,
    pub refresh_token: Option<String>,
}

impl TokenInfo {
    /// Token with no known lifetime; never expires
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "bearer".to_string(),
            expires_in: None,
            expires_at: None,
            scope: None,
            refresh_token: None,
        }
    }

    /// Build from a token endpoint payload, with expiry relative to now
    pub fn from_response(payload: &Value) -> Result<Self> {
        Self::from_response_at(payload, Utc::now())
    }

    /// Build from a token endpoint payload, with expiry relative to `now`
    pub fn from_response_at(payload: &Value, now: DateTime<Utc>) -> Result<Self> {
        let access_token = payload
            .get("access_token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                OpenF1Error::Auth(
                    ApiError::new("Token response missing access_token", NO_STATUS)
                        .with_body(ResponseBody::Json(payload.clone())),
                )
            })?;

        let expires_in = payload.get("expires_in").and_then(|v| {
            v.as_i64()
                .or_else(|| v.as_f64().map(|f| f as i64))
                .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
        });

        Ok(Self {
            access_token: access_token.to_string(),
            token_type: string_field(payload, "token_type").unwrap_or_else(|| "bearer".to_string()),
            expires_in,
            expires_at: expires_in.and_then(|secs| expires_at(now, secs)),
            scope: string_field(payload, "scope"),
            refresh_token: string_field(payload, "refresh_token"),
        })
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Expired once `now` passes the point 60 seconds ahead of the real expiry
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at
                .checked_sub_signed(Duration::seconds(TOKEN_EXPIRY_MARGIN_SECS))
                .is_none_or(|deadline| now > deadline),
            None => false,
        }
    }
}

// Lifetimes beyond chrono's range leave the expiry unknown
fn expires_at(now: DateTime<Utc>, secs: i64) -> Option<DateTime<Utc>> {
    now.checked_add_signed(Duration::try_seconds(secs)?)
}

fn string_field(payload: &Value, key: &str) -> Option<String> {
    payload.get(key).and_then(Value::as_str).map(str::to_string)
}
