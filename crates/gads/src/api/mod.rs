//! Transport layer: the `GoogleAdsApi` trait and its REST implementation.

pub(crate) mod raw;
mod rest;

pub use raw::{
    RawAdGroup, RawAdGroupCriterion, RawCampaign, RawCampaignBudget, RawCustomer,
    RawCustomerClient, RawKeywordInfo, RawMetrics, RawQualityInfo, RawSearchTermView, SearchRow,
};
pub use rest::GoogleAdsRestClient;

use async_trait::async_trait;

use crate::errors::GoogleAdsError;

/// The account a query executes against, with its delegation context.
#[derive(Debug, Clone)]
pub struct CustomerContext {
    /// The target account being queried.
    pub customer_id: String,
    /// The account to authenticate as (the manager id for managed accounts).
    pub login_customer_id: String,
    /// OAuth refresh token of the connection.
    pub refresh_token: String,
}

impl CustomerContext {
    pub fn new(
        customer_id: impl Into<String>,
        login_customer_id: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            login_customer_id: login_customer_id.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

/// Raw query execution against the Google Ads API.
///
/// Everything above this trait (resolver, report fetchers) is transport
/// agnostic; tests swap in an in-memory implementation.
#[async_trait]
pub trait GoogleAdsApi: Send + Sync {
    /// Lists the customer resource names (`customers/<id>`) directly
    /// accessible to the credential.
    async fn list_accessible_customers(
        &self,
        refresh_token: &str,
    ) -> Result<Vec<String>, GoogleAdsError>;

    /// Executes a GAQL query for the given customer context, returning all
    /// result rows.
    async fn search(
        &self,
        context: &CustomerContext,
        query: &str,
    ) -> Result<Vec<SearchRow>, GoogleAdsError>;
}
