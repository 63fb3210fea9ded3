//! OAuth connection domain models.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};

/// OAuth scopes requested when sending a user through the consent flow.
pub const AUTHORIZATION_SCOPES: [&str; 3] = [
    "https://www.googleapis.com/auth/adwords",
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/userinfo.profile",
];

/// One Google identity linked to a user.
///
/// Tokens are plaintext here; the storage layer encrypts them at rest and
/// decrypts on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleConnection {
    pub id: String,
    pub user_id: String,
    pub google_email: String,
    /// Google's id for the external account; unique across connections.
    pub google_user_id: String,
    pub access_token: String,
    pub refresh_token: String,
    pub token_expires_at: NaiveDateTime,
    pub scopes: Vec<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input for creating or re-authorizing a connection.
///
/// `refresh_token` is optional because Google omits it on repeat consent;
/// an upsert must keep the stored refresh token in that case rather than
/// discarding it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoogleConnection {
    pub user_id: String,
    pub google_email: String,
    pub google_user_id: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_expires_at: NaiveDateTime,
    pub scopes: Vec<String>,
}

impl NewGoogleConnection {
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(ValidationError::MissingField("userId".to_string()).into());
        }
        if self.google_user_id.trim().is_empty() {
            return Err(ValidationError::MissingField("googleUserId".to_string()).into());
        }
        if self.google_email.trim().is_empty() {
            return Err(ValidationError::MissingField("googleEmail".to_string()).into());
        }
        if self.access_token.is_empty() {
            return Err(ValidationError::MissingField("accessToken".to_string()).into());
        }
        if self.scopes.is_empty() {
            return Err(ValidationError::MissingField("scopes".to_string()).into());
        }
        Ok(())
    }
}

/// Tokens returned by the OAuth code or refresh exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub scopes: Vec<String>,
}

/// Profile of the Google account that granted access.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleProfile {
    /// Google's stable account id.
    pub id: String,
    pub email: String,
    pub name: Option<String>,
}

/// Result of a completed OAuth callback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OauthCallbackOutcome {
    pub connection: GoogleConnection,
    /// Number of advertiser accounts resolved and registered for the
    /// connection.
    pub accounts_connected: usize,
}
