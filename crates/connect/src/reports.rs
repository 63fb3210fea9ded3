//! Live read-through report operations.
//!
//! These resolve the caller's active connection and delegate straight to
//! the Google Ads client: same validation and normalization as the sync
//! path, but no job tracking and no persistence.

use std::sync::Arc;

use async_trait::async_trait;
use log::warn;

use adsight_core::connections::{ConnectionRepositoryTrait, GoogleConnection};
use adsight_core::customers::CustomerServiceTrait;
use adsight_core::errors::{Error, Result};
use adsight_gads::{
    AccountInfo, AccountResolverTrait, AdGroupRow, CampaignRow, CustomerContext, KeywordRow,
    ReportClientTrait, SearchTermRow,
};

const NOT_CONNECTED: &str =
    "Google Ads account not connected. Please connect your Google Ads account first.";

/// Live (non-persisted) report operations.
#[async_trait]
pub trait LiveReportServiceTrait: Send + Sync {
    /// Resolves the caller's accessible accounts (hierarchy included) and
    /// registers each in the customer registry.
    async fn list_accessible_accounts(&self, user_id: &str) -> Result<Vec<AccountInfo>>;

    /// Client roster of one manager account.
    async fn list_managed_accounts(
        &self,
        user_id: &str,
        mcc_customer_id: &str,
    ) -> Result<Vec<AccountInfo>>;

    async fn fetch_search_terms(
        &self,
        user_id: &str,
        customer_id: &str,
        start_date: &str,
        end_date: &str,
        campaign_id: Option<&str>,
        ad_group_id: Option<&str>,
    ) -> Result<Vec<SearchTermRow>>;

    async fn fetch_campaigns(
        &self,
        user_id: &str,
        customer_id: &str,
        date_range: Option<(&str, &str)>,
    ) -> Result<Vec<CampaignRow>>;

    async fn fetch_ad_groups(
        &self,
        user_id: &str,
        customer_id: &str,
        campaign_id: Option<&str>,
    ) -> Result<Vec<AdGroupRow>>;

    async fn fetch_keywords(
        &self,
        user_id: &str,
        customer_id: &str,
        ad_group_id: &str,
        campaign_id: Option<&str>,
    ) -> Result<Vec<KeywordRow>>;
}

pub struct LiveReportService {
    connections: Arc<dyn ConnectionRepositoryTrait>,
    customers: Arc<dyn CustomerServiceTrait>,
    resolver: Arc<dyn AccountResolverTrait>,
    reports: Arc<dyn ReportClientTrait>,
}

impl LiveReportService {
    pub fn new(
        connections: Arc<dyn ConnectionRepositoryTrait>,
        customers: Arc<dyn CustomerServiceTrait>,
        resolver: Arc<dyn AccountResolverTrait>,
        reports: Arc<dyn ReportClientTrait>,
    ) -> Self {
        Self {
            connections,
            customers,
            resolver,
            reports,
        }
    }

    fn active_connection(&self, user_id: &str) -> Result<GoogleConnection> {
        self.connections
            .get_latest_active_by_user(user_id)?
            .ok_or_else(|| Error::Unauthorized(NOT_CONNECTED.to_string()))
    }

    /// Resolves the query context through the registry so delegation uses
    /// the stored login-customer-id, registering the customer on first
    /// sight.
    async fn context_for(&self, user_id: &str, customer_id: &str) -> Result<CustomerContext> {
        let connection = self.active_connection(user_id)?;
        let customer = self
            .customers
            .get_or_fetch_customer(user_id, customer_id)
            .await?;

        Ok(CustomerContext::new(
            customer.customer_id,
            customer.login_customer_id,
            connection.refresh_token,
        ))
    }
}

#[async_trait]
impl LiveReportServiceTrait for LiveReportService {
    async fn list_accessible_accounts(&self, user_id: &str) -> Result<Vec<AccountInfo>> {
        let connection = self.active_connection(user_id)?;

        let accounts = self
            .resolver
            .get_accessible_accounts_full(&connection.refresh_token)
            .await?;

        // First sight of an account registers it.
        for account in &accounts {
            if let Err(err) = self.customers.ensure_customer(&connection.id, account).await {
                warn!(
                    "Failed to register customer {} while listing accounts: {}",
                    account.customer_id, err
                );
            }
        }

        Ok(accounts)
    }

    async fn list_managed_accounts(
        &self,
        user_id: &str,
        mcc_customer_id: &str,
    ) -> Result<Vec<AccountInfo>> {
        let connection = self.active_connection(user_id)?;
        Ok(self
            .resolver
            .get_managed_accounts(mcc_customer_id, &connection.refresh_token)
            .await?)
    }

    async fn fetch_search_terms(
        &self,
        user_id: &str,
        customer_id: &str,
        start_date: &str,
        end_date: &str,
        campaign_id: Option<&str>,
        ad_group_id: Option<&str>,
    ) -> Result<Vec<SearchTermRow>> {
        let context = self.context_for(user_id, customer_id).await?;
        let batch = self
            .reports
            .fetch_search_terms(&context, start_date, end_date, campaign_id, ad_group_id)
            .await?;
        Ok(batch.rows)
    }

    async fn fetch_campaigns(
        &self,
        user_id: &str,
        customer_id: &str,
        date_range: Option<(&str, &str)>,
    ) -> Result<Vec<CampaignRow>> {
        let context = self.context_for(user_id, customer_id).await?;
        Ok(self.reports.fetch_campaigns(&context, date_range).await?)
    }

    async fn fetch_ad_groups(
        &self,
        user_id: &str,
        customer_id: &str,
        campaign_id: Option<&str>,
    ) -> Result<Vec<AdGroupRow>> {
        let context = self.context_for(user_id, customer_id).await?;
        Ok(self.reports.fetch_ad_groups(&context, campaign_id).await?)
    }

    async fn fetch_keywords(
        &self,
        user_id: &str,
        customer_id: &str,
        ad_group_id: &str,
        campaign_id: Option<&str>,
    ) -> Result<Vec<KeywordRow>> {
        let context = self.context_for(user_id, customer_id).await?;
        Ok(self
            .reports
            .fetch_keywords(&context, ad_group_id, campaign_id)
            .await?)
    }
}
