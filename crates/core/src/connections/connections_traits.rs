//! Connection repository, service, and OAuth-exchange traits.

use async_trait::async_trait;

use super::connections_model::{
    GoogleConnection, GoogleProfile, NewGoogleConnection, OauthCallbackOutcome, TokenSet,
};
use crate::errors::Result;

/// Persistence contract for OAuth connections.
///
/// Implementations encrypt tokens at rest and enforce the natural key
/// (user id, google user id) with an atomic insert-or-update.
#[async_trait]
pub trait ConnectionRepositoryTrait: Send + Sync {
    /// Creates or refreshes the connection for (user, google account).
    ///
    /// On update, tokens are overwritten and the row is reactivated; a
    /// missing refresh token in the input keeps the stored one. An insert
    /// with no refresh token at all is a validation error.
    async fn upsert(&self, new_connection: NewGoogleConnection) -> Result<GoogleConnection>;

    /// Most recently updated active connection for the user, if any.
    fn get_latest_active_by_user(&self, user_id: &str) -> Result<Option<GoogleConnection>>;

    fn list_active_by_user(&self, user_id: &str) -> Result<Vec<GoogleConnection>>;

    /// Soft-deactivates a connection. Rows are never hard-deleted.
    async fn deactivate(&self, user_id: &str, connection_id: &str) -> Result<usize>;
}

/// OAuth2 code/refresh exchange against the ads-platform identity service.
///
/// External collaborator; implemented by the host.
#[async_trait]
pub trait OauthExchangeTrait: Send + Sync {
    /// Trades an authorization code for tokens plus the granting profile.
    async fn exchange_code(&self, code: &str) -> Result<(TokenSet, GoogleProfile)>;

    /// Trades a refresh token for a fresh token set.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenSet>;
}

/// Connection lifecycle operations.
#[async_trait]
pub trait ConnectionServiceTrait: Send + Sync {
    /// Completes the OAuth callback: validates the user, exchanges the
    /// code, upserts the connection, and registers the resolvable
    /// advertiser accounts.
    async fn handle_oauth_callback(&self, code: &str, user_id: &str)
        -> Result<OauthCallbackOutcome>;

    /// Validates the user and upserts a connection from an already
    /// completed exchange.
    async fn upsert_connection(
        &self,
        new_connection: NewGoogleConnection,
    ) -> Result<GoogleConnection>;

    fn get_latest_active_connection(&self, user_id: &str) -> Result<Option<GoogleConnection>>;

    fn list_connections(&self, user_id: &str) -> Result<Vec<GoogleConnection>>;

    async fn disconnect(&self, user_id: &str, connection_id: &str) -> Result<()>;
}
