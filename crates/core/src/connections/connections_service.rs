//! Connection lifecycle service.

use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};

use super::connections_model::{
    GoogleConnection, NewGoogleConnection, OauthCallbackOutcome,
};
use super::connections_traits::{
    ConnectionRepositoryTrait, ConnectionServiceTrait, OauthExchangeTrait,
};
use crate::customers::CustomerServiceTrait;
use crate::errors::Result;
use crate::identity::IdentityProviderTrait;
use adsight_gads::AccountResolverTrait;

/// Service managing OAuth connections and the callback flow.
pub struct ConnectionService {
    repository: Arc<dyn ConnectionRepositoryTrait>,
    identity: Arc<dyn IdentityProviderTrait>,
    oauth: Arc<dyn OauthExchangeTrait>,
    resolver: Arc<dyn AccountResolverTrait>,
    customers: Arc<dyn CustomerServiceTrait>,
}

impl ConnectionService {
    pub fn new(
        repository: Arc<dyn ConnectionRepositoryTrait>,
        identity: Arc<dyn IdentityProviderTrait>,
        oauth: Arc<dyn OauthExchangeTrait>,
        resolver: Arc<dyn AccountResolverTrait>,
        customers: Arc<dyn CustomerServiceTrait>,
    ) -> Self {
        Self {
            repository,
            identity,
            oauth,
            resolver,
            customers,
        }
    }
}

#[async_trait]
impl ConnectionServiceTrait for ConnectionService {
    async fn handle_oauth_callback(
        &self,
        code: &str,
        user_id: &str,
    ) -> Result<OauthCallbackOutcome> {
        self.identity.validate_user(user_id).await?;

        let (tokens, profile) = self.oauth.exchange_code(code).await?;

        let connection = self
            .repository
            .upsert(NewGoogleConnection {
                user_id: user_id.to_string(),
                google_email: profile.email,
                google_user_id: profile.id,
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
                token_expires_at: tokens.expires_at.naive_utc(),
                scopes: tokens.scopes,
            })
            .await?;

        info!(
            "Linked Google account {} for user {}",
            connection.google_email, user_id
        );

        // First resolution for a fresh connection also seeds the customer
        // registry. A resolution failure leaves the connection usable; the
        // registry fills in lazily on the next account listing or sync.
        let accounts_connected = match self
            .resolver
            .get_accessible_accounts_full(&connection.refresh_token)
            .await
        {
            Ok(accounts) => {
                let mut registered = 0;
                for account in &accounts {
                    match self.customers.ensure_customer(&connection.id, account).await {
                        Ok(_) => registered += 1,
                        Err(err) => {
                            warn!(
                                "Failed to register customer {} on connect: {}",
                                account.customer_id, err
                            );
                        }
                    }
                }
                registered
            }
            Err(err) => {
                warn!(
                    "Account resolution failed right after connect for user {}: {}",
                    user_id, err
                );
                0
            }
        };

        Ok(OauthCallbackOutcome {
            connection,
            accounts_connected,
        })
    }

    async fn upsert_connection(
        &self,
        new_connection: NewGoogleConnection,
    ) -> Result<GoogleConnection> {
        self.identity.validate_user(&new_connection.user_id).await?;
        new_connection.validate()?;
        self.repository.upsert(new_connection).await
    }

    fn get_latest_active_connection(&self, user_id: &str) -> Result<Option<GoogleConnection>> {
        self.repository.get_latest_active_by_user(user_id)
    }

    fn list_connections(&self, user_id: &str) -> Result<Vec<GoogleConnection>> {
        self.repository.list_active_by_user(user_id)
    }

    async fn disconnect(&self, user_id: &str, connection_id: &str) -> Result<()> {
        let deactivated = self.repository.deactivate(user_id, connection_id).await?;
        if deactivated == 0 {
            return Err(crate::errors::Error::NotFound(format!(
                "Connection {} not found for user {}",
                connection_id, user_id
            )));
        }
        info!("Deactivated connection {} for user {}", connection_id, user_id);
        Ok(())
    }
}
