//! Full-structure sync: campaigns, ad groups, and keywords in one walk.
//!
//! Not job-tracked and not transactional: every entity is upserted by
//! natural key as the walk proceeds, and a failure partway aborts the
//! remainder while keeping what was already written. Re-running the sync
//! refreshes the same rows.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::info;

use adsight_core::connections::ConnectionRepositoryTrait;
use adsight_core::customers::CustomerServiceTrait;
use adsight_core::errors::{Error, Result};
use adsight_core::structure::{
    AdGroupRepositoryTrait, CampaignRepositoryTrait, KeywordRepositoryTrait, NewAdGroup,
    NewCampaign, NewKeyword,
};
use adsight_core::sync::StructureSyncTotals;
use adsight_gads::{CustomerContext, ReportClientTrait};

/// Account-structure snapshot operations.
#[async_trait]
pub trait StructureSyncServiceTrait: Send + Sync {
    /// Snapshots the campaign → ad-group → keyword structure of an already
    /// registered customer, optionally attaching performance metrics for a
    /// date range. Returns running totals of the rows upserted.
    async fn sync_account_structure(
        &self,
        user_id: &str,
        customer_id: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<StructureSyncTotals>;
}

pub struct StructureSyncService {
    connections: Arc<dyn ConnectionRepositoryTrait>,
    customers: Arc<dyn CustomerServiceTrait>,
    reports: Arc<dyn ReportClientTrait>,
    campaigns: Arc<dyn CampaignRepositoryTrait>,
    ad_groups: Arc<dyn AdGroupRepositoryTrait>,
    keywords: Arc<dyn KeywordRepositoryTrait>,
}

impl StructureSyncService {
    pub fn new(
        connections: Arc<dyn ConnectionRepositoryTrait>,
        customers: Arc<dyn CustomerServiceTrait>,
        reports: Arc<dyn ReportClientTrait>,
        campaigns: Arc<dyn CampaignRepositoryTrait>,
        ad_groups: Arc<dyn AdGroupRepositoryTrait>,
        keywords: Arc<dyn KeywordRepositoryTrait>,
    ) -> Self {
        Self {
            connections,
            customers,
            reports,
            campaigns,
            ad_groups,
            keywords,
        }
    }
}

#[async_trait]
impl StructureSyncServiceTrait for StructureSyncService {
    async fn sync_account_structure(
        &self,
        user_id: &str,
        customer_id: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<StructureSyncTotals> {
        let connection = self
            .connections
            .get_latest_active_by_user(user_id)?
            .ok_or_else(|| {
                Error::Unauthorized("No active Google connection found".to_string())
            })?;

        // No implicit registration here; the customer must already exist.
        let customer = self
            .customers
            .get_local_customer(user_id, customer_id)?
            .ok_or_else(|| {
                Error::NotFound(format!("Customer {} not found in database", customer_id))
            })?;

        info!("Starting full sync for customer {}", customer.customer_id);

        let context = CustomerContext::new(
            customer.customer_id.clone(),
            customer.login_customer_id.clone(),
            connection.refresh_token.clone(),
        );

        let date_range = match (start_date, end_date) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        };

        let campaigns = self
            .reports
            .fetch_campaigns_with_ad_groups(&context, date_range, true)
            .await
            .map_err(Error::from)?;

        let fetched_at = Utc::now().naive_utc();
        let mut totals = StructureSyncTotals::default();

        for campaign in &campaigns {
            let saved_campaign = self
                .campaigns
                .upsert(NewCampaign::from_row(
                    &customer.id,
                    campaign,
                    date_range,
                    fetched_at,
                ))
                .await?;
            totals.total_campaigns += 1;

            for ad_group in &campaign.ad_groups {
                let saved_ad_group = self
                    .ad_groups
                    .upsert(NewAdGroup::from_row(&saved_campaign.id, ad_group, fetched_at))
                    .await?;
                totals.total_ad_groups += 1;

                let keyword_rows: Vec<NewKeyword> = ad_group
                    .keywords
                    .iter()
                    .map(|keyword| {
                        NewKeyword::from_row(&saved_ad_group.id, keyword, fetched_at)
                    })
                    .collect();

                totals.total_keywords += self.keywords.bulk_upsert(keyword_rows).await?;
            }
        }

        info!(
            "Full sync completed: {} campaigns, {} ad groups, {} keywords",
            totals.total_campaigns, totals.total_ad_groups, totals.total_keywords
        );

        Ok(totals)
    }
}
