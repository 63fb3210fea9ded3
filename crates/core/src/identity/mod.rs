//! Identity-provider capability.
//!
//! End-user authentication lives in an external identity provider; the core
//! only needs an existence check before it links external credentials to a
//! user id. The trait is implemented by the host against its provider.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Minimal profile returned by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// User existence check against the external identity provider.
#[async_trait]
pub trait IdentityProviderTrait: Send + Sync {
    /// Returns the user's profile, or `Error::NotFound` when the id is
    /// unknown to the provider.
    async fn validate_user(&self, user_id: &str) -> Result<UserProfile>;
}
