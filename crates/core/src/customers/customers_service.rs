//! Customer registry service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use log::{debug, info};

use super::customers_model::{AdsCustomer, NewAdsCustomer};
use super::customers_traits::{CustomerRepositoryTrait, CustomerServiceTrait};
use crate::connections::ConnectionRepositoryTrait;
use crate::errors::{Error, Result};
use adsight_gads::queries::normalize_customer_id;
use adsight_gads::{AccountInfo, AccountResolverTrait};

/// Maps external advertiser-account ids to local rows, creating them lazily
/// on first sight.
pub struct CustomerService {
    repository: Arc<dyn CustomerRepositoryTrait>,
    connections: Arc<dyn ConnectionRepositoryTrait>,
    resolver: Arc<dyn AccountResolverTrait>,
}

impl CustomerService {
    pub fn new(
        repository: Arc<dyn CustomerRepositoryTrait>,
        connections: Arc<dyn ConnectionRepositoryTrait>,
        resolver: Arc<dyn AccountResolverTrait>,
    ) -> Self {
        Self {
            repository,
            connections,
            resolver,
        }
    }
}

#[async_trait]
impl CustomerServiceTrait for CustomerService {
    async fn ensure_customer(
        &self,
        connection_id: &str,
        account: &AccountInfo,
    ) -> Result<AdsCustomer> {
        self.repository
            .upsert(NewAdsCustomer::from_account(connection_id, account))
            .await
    }

    async fn get_or_fetch_customer(
        &self,
        user_id: &str,
        customer_id: &str,
    ) -> Result<AdsCustomer> {
        let customer_id = normalize_customer_id(customer_id);

        let connection = self
            .connections
            .get_latest_active_by_user(user_id)?
            .ok_or_else(|| {
                Error::Unauthorized("No active Google connection found".to_string())
            })?;

        if let Some(existing) = self
            .repository
            .get_by_customer_id(&connection.id, &customer_id)?
        {
            debug!("Customer {} already registered", customer_id);
            return Ok(existing);
        }

        info!("Fetching metadata for new customer {}", customer_id);

        let accounts = self
            .resolver
            .get_accessible_accounts_full(&connection.refresh_token)
            .await?;

        let account = accounts
            .iter()
            .find(|a| a.customer_id == customer_id)
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "Customer {} not found in accessible accounts",
                    customer_id
                ))
            })?;

        let customer = self.ensure_customer(&connection.id, account).await?;
        info!("Registered customer {}", customer_id);
        Ok(customer)
    }

    fn get_local_customer(
        &self,
        user_id: &str,
        customer_id: &str,
    ) -> Result<Option<AdsCustomer>> {
        let customer_id = normalize_customer_id(customer_id);

        let connection = self
            .connections
            .get_latest_active_by_user(user_id)?
            .ok_or_else(|| {
                Error::Unauthorized("No active Google connection found".to_string())
            })?;

        self.repository
            .get_by_customer_id(&connection.id, &customer_id)
    }

    fn list_customers(&self, user_id: &str) -> Result<Vec<AdsCustomer>> {
        self.repository.list_by_user(user_id)
    }

    async fn touch_last_synced(&self, customer_row_id: &str, at: NaiveDateTime) -> Result<()> {
        self.repository.touch_last_synced(customer_row_id, at).await
    }
}
