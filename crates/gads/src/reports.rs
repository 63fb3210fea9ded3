//! Report fetchers: GAQL execution plus row validation and normalization.
//!
//! Upstream occasionally returns partial rows; a row missing a field the
//! local schema requires is skipped with a warning instead of failing the
//! whole fetch. Missing numeric fields default to zero so aggregate
//! arithmetic stays well-defined.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::api::raw::{int_field, opt_int_field};
use crate::api::{CustomerContext, GoogleAdsApi, SearchRow};
use crate::dates::validate_date_range;
use crate::errors::GoogleAdsError;
use crate::models::{
    decimal_from_micros, decimal_from_micros_f64, AdGroupRow, CampaignMetrics, CampaignRow,
    KeywordRow, SearchTermBatch, SearchTermMetrics, SearchTermRow,
};
use crate::queries;

const UNKNOWN_CAMPAIGN: &str = "Unknown Campaign";
const UNKNOWN_AD_GROUP: &str = "Unknown Ad Group";
const UNKNOWN: &str = "UNKNOWN";

/// Live report fetching for one category of upstream data at a time.
#[async_trait]
pub trait ReportClientTrait: Send + Sync {
    /// Search-term report for an inclusive date range, enabled campaigns
    /// and ad groups only, highest-traffic terms first, capped at
    /// [`queries::MAX_REPORT_ROWS`]. The batch carries the raw fetched
    /// count next to the validated rows.
    async fn fetch_search_terms(
        &self,
        context: &CustomerContext,
        start_date: &str,
        end_date: &str,
        campaign_id: Option<&str>,
        ad_group_id: Option<&str>,
    ) -> Result<SearchTermBatch, GoogleAdsError>;

    /// Campaign listing; metadata only without a date range, performance
    /// metrics included with one.
    async fn fetch_campaigns(
        &self,
        context: &CustomerContext,
        date_range: Option<(&str, &str)>,
    ) -> Result<Vec<CampaignRow>, GoogleAdsError>;

    /// Ad groups, optionally scoped to one campaign.
    async fn fetch_ad_groups(
        &self,
        context: &CustomerContext,
        campaign_id: Option<&str>,
    ) -> Result<Vec<AdGroupRow>, GoogleAdsError>;

    /// Keyword criteria of one ad group.
    async fn fetch_keywords(
        &self,
        context: &CustomerContext,
        ad_group_id: &str,
        campaign_id: Option<&str>,
    ) -> Result<Vec<KeywordRow>, GoogleAdsError>;

    /// Campaigns with their ad groups nested; with `deep` set, each ad
    /// group additionally carries its keywords. One query per campaign and
    /// per ad group: the upstream query language cannot join across these
    /// report views, and hierarchy depth is bounded by account size.
    async fn fetch_campaigns_with_ad_groups(
        &self,
        context: &CustomerContext,
        date_range: Option<(&str, &str)>,
        deep: bool,
    ) -> Result<Vec<CampaignRow>, GoogleAdsError>;
}

/// Report fetchers over a [`GoogleAdsApi`] transport.
pub struct ReportClient {
    api: Arc<dyn GoogleAdsApi>,
}

impl ReportClient {
    pub fn new(api: Arc<dyn GoogleAdsApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ReportClientTrait for ReportClient {
    async fn fetch_search_terms(
        &self,
        context: &CustomerContext,
        start_date: &str,
        end_date: &str,
        campaign_id: Option<&str>,
        ad_group_id: Option<&str>,
    ) -> Result<SearchTermBatch, GoogleAdsError> {
        validate_date_range(start_date, end_date)?;

        let query = queries::search_terms(start_date, end_date, campaign_id, ad_group_id);
        let rows = self.api.search(context, &query).await?;
        let records_fetched = rows.len();

        let mut terms = Vec::new();
        for row in rows {
            match map_search_term(row) {
                Some(term) => terms.push(term),
                None => {
                    warn!(
                        customer_id = %context.customer_id,
                        "skipping search-term row with missing required fields"
                    );
                }
            }
        }

        info!(
            customer_id = %context.customer_id,
            fetched = records_fetched,
            valid = terms.len(),
            %start_date,
            %end_date,
            "fetched search terms"
        );

        Ok(SearchTermBatch {
            rows: terms,
            records_fetched,
        })
    }

    async fn fetch_campaigns(
        &self,
        context: &CustomerContext,
        date_range: Option<(&str, &str)>,
    ) -> Result<Vec<CampaignRow>, GoogleAdsError> {
        if let Some((start, end)) = date_range {
            validate_date_range(start, end)?;
        }

        let rows = self
            .api
            .search(context, &queries::campaigns(date_range))
            .await?;

        let mut campaigns = Vec::new();
        for row in rows {
            match map_campaign(row) {
                Some(campaign) => campaigns.push(campaign),
                None => {
                    warn!(
                        customer_id = %context.customer_id,
                        "skipping campaign row with missing required fields"
                    );
                }
            }
        }

        info!(
            customer_id = %context.customer_id,
            campaigns = campaigns.len(),
            with_metrics = date_range.is_some(),
            "fetched campaigns"
        );

        Ok(campaigns)
    }

    async fn fetch_ad_groups(
        &self,
        context: &CustomerContext,
        campaign_id: Option<&str>,
    ) -> Result<Vec<AdGroupRow>, GoogleAdsError> {
        let rows = self
            .api
            .search(context, &queries::ad_groups(campaign_id))
            .await?;

        let mut ad_groups = Vec::new();
        for row in rows {
            match map_ad_group(row) {
                Some(ad_group) => ad_groups.push(ad_group),
                None => {
                    warn!(
                        customer_id = %context.customer_id,
                        "skipping ad-group row with missing required fields"
                    );
                }
            }
        }

        info!(
            customer_id = %context.customer_id,
            ad_groups = ad_groups.len(),
            "fetched ad groups"
        );

        Ok(ad_groups)
    }

    async fn fetch_keywords(
        &self,
        context: &CustomerContext,
        ad_group_id: &str,
        campaign_id: Option<&str>,
    ) -> Result<Vec<KeywordRow>, GoogleAdsError> {
        let rows = self
            .api
            .search(context, &queries::keywords(ad_group_id, campaign_id))
            .await?;

        let mut keywords = Vec::new();
        for row in rows {
            match map_keyword(row) {
                Some(keyword) => keywords.push(keyword),
                None => {
                    warn!(
                        customer_id = %context.customer_id,
                        %ad_group_id,
                        "skipping keyword row with missing required fields"
                    );
                }
            }
        }

        info!(
            customer_id = %context.customer_id,
            %ad_group_id,
            keywords = keywords.len(),
            "fetched keywords"
        );

        Ok(keywords)
    }

    async fn fetch_campaigns_with_ad_groups(
        &self,
        context: &CustomerContext,
        date_range: Option<(&str, &str)>,
        deep: bool,
    ) -> Result<Vec<CampaignRow>, GoogleAdsError> {
        let mut campaigns = self.fetch_campaigns(context, date_range).await?;

        for campaign in &mut campaigns {
            let mut ad_groups = self
                .fetch_ad_groups(context, Some(campaign.campaign_id.as_str()))
                .await?;

            if deep {
                // Sibling keyword fetches run concurrently; one ad group
                // failing leaves that roster empty instead of aborting the
                // whole walk.
                let rosters = join_all(ad_groups.iter().map(|ad_group| {
                    self.fetch_keywords(
                        context,
                        ad_group.ad_group_id.as_str(),
                        Some(campaign.campaign_id.as_str()),
                    )
                }))
                .await;

                for (ad_group, roster) in ad_groups.iter_mut().zip(rosters) {
                    match roster {
                        Ok(keywords) => ad_group.keywords = keywords,
                        Err(err) => {
                            warn!(
                                customer_id = %context.customer_id,
                                ad_group_id = %ad_group.ad_group_id,
                                error = %err,
                                "keyword fetch failed, leaving roster empty"
                            );
                        }
                    }
                }
            }

            campaign.ad_groups = ad_groups;
        }

        Ok(campaigns)
    }
}

fn map_search_term(row: SearchRow) -> Option<SearchTermRow> {
    let campaign = row.campaign?;
    let campaign_id = campaign.id.filter(|id| !id.is_empty())?;
    let ad_group = row.ad_group?;
    let ad_group_id = ad_group.id.filter(|id| !id.is_empty())?;
    let search_term = row
        .search_term_view?
        .search_term
        .filter(|term| !term.is_empty())?;

    let keyword_info = row.ad_group_criterion.and_then(|c| c.keyword);
    let metrics = row.metrics.unwrap_or_default();

    Some(SearchTermRow {
        campaign_id,
        campaign_name: campaign
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_CAMPAIGN.to_string()),
        ad_group_id,
        ad_group_name: ad_group
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_AD_GROUP.to_string()),
        search_term,
        keyword: keyword_info
            .as_ref()
            .and_then(|k| k.text.clone())
            .unwrap_or_default(),
        match_type: keyword_info
            .and_then(|k| k.match_type)
            .unwrap_or_default(),
        metrics: SearchTermMetrics {
            impressions: int_field(&metrics.impressions),
            clicks: int_field(&metrics.clicks),
            cost: decimal_from_micros(int_field(&metrics.cost_micros)),
            conversions: Decimal::from_f64(metrics.conversions.unwrap_or(0.0))
                .unwrap_or_default(),
            conversions_value: Decimal::from_f64(metrics.conversions_value.unwrap_or(0.0))
                .unwrap_or_default(),
        },
    })
}

fn map_campaign(row: SearchRow) -> Option<CampaignRow> {
    let campaign = row.campaign?;
    let campaign_id = campaign.id.filter(|id| !id.is_empty())?;

    let budget_micros = row
        .campaign_budget
        .map(|b| int_field(&b.amount_micros))
        .unwrap_or(0);
    let metrics = row.metrics.unwrap_or_default();

    Some(CampaignRow {
        campaign_id,
        campaign_name: campaign
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_CAMPAIGN.to_string()),
        status: campaign.status.unwrap_or_else(|| UNKNOWN.to_string()),
        bidding_strategy_type: campaign
            .bidding_strategy_type
            .unwrap_or_else(|| UNKNOWN.to_string()),
        advertising_channel_type: campaign
            .advertising_channel_type
            .unwrap_or_else(|| UNKNOWN.to_string()),
        budget_amount_micros: budget_micros,
        budget_amount: decimal_from_micros(budget_micros),
        currency_code: row
            .customer
            .and_then(|c| c.currency_code)
            .unwrap_or_else(|| "USD".to_string()),
        start_date: campaign.start_date.unwrap_or_default(),
        end_date: campaign.end_date.filter(|d| !d.is_empty()),
        metrics: CampaignMetrics {
            impressions: int_field(&metrics.impressions),
            clicks: int_field(&metrics.clicks),
            cost: decimal_from_micros(int_field(&metrics.cost_micros)),
            conversions: Decimal::from_f64(metrics.conversions.unwrap_or(0.0))
                .unwrap_or_default(),
            conversions_value: Decimal::from_f64(metrics.conversions_value.unwrap_or(0.0))
                .unwrap_or_default(),
            ctr: Decimal::from_f64(metrics.ctr.unwrap_or(0.0)).unwrap_or_default(),
            average_cpc: decimal_from_micros_f64(metrics.average_cpc.unwrap_or(0.0)),
            average_cpm: decimal_from_micros_f64(metrics.average_cpm.unwrap_or(0.0)),
        },
        ad_groups: Vec::new(),
    })
}

fn map_ad_group(row: SearchRow) -> Option<AdGroupRow> {
    let campaign = row.campaign?;
    let campaign_id = campaign.id.filter(|id| !id.is_empty())?;
    let ad_group = row.ad_group?;
    let ad_group_id = ad_group.id.filter(|id| !id.is_empty())?;

    let cpc_bid_micros = int_field(&ad_group.cpc_bid_micros);
    let target_cpa_micros = opt_int_field(&ad_group.target_cpa_micros);

    Some(AdGroupRow {
        ad_group_id,
        ad_group_name: ad_group
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_AD_GROUP.to_string()),
        campaign_id,
        campaign_name: campaign
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_CAMPAIGN.to_string()),
        status: ad_group.status.unwrap_or_else(|| UNKNOWN.to_string()),
        ad_group_type: ad_group.ad_group_type.unwrap_or_else(|| UNKNOWN.to_string()),
        cpc_bid_micros,
        cpc_bid: decimal_from_micros(cpc_bid_micros),
        target_cpa_micros,
        target_cpa: target_cpa_micros.map(decimal_from_micros),
        keywords: Vec::new(),
    })
}

fn map_keyword(row: SearchRow) -> Option<KeywordRow> {
    let campaign = row.campaign?;
    let campaign_id = campaign.id.filter(|id| !id.is_empty())?;
    let ad_group = row.ad_group?;
    let ad_group_id = ad_group.id.filter(|id| !id.is_empty())?;
    let criterion = row.ad_group_criterion?;
    let keyword_id = criterion.criterion_id.filter(|id| !id.is_empty())?;

    let cpc_bid_micros = int_field(&criterion.cpc_bid_micros);

    Some(KeywordRow {
        keyword_id,
        ad_group_id,
        ad_group_name: ad_group
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_AD_GROUP.to_string()),
        campaign_id,
        campaign_name: campaign
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_CAMPAIGN.to_string()),
        keyword_text: criterion
            .keyword
            .as_ref()
            .and_then(|k| k.text.clone())
            .unwrap_or_default(),
        match_type: criterion
            .keyword
            .and_then(|k| k.match_type)
            .unwrap_or_else(|| UNKNOWN.to_string()),
        status: criterion.status.unwrap_or_else(|| UNKNOWN.to_string()),
        final_urls: criterion.final_urls,
        cpc_bid_micros,
        cpc_bid: decimal_from_micros(cpc_bid_micros),
        quality_score: criterion.quality_info.and_then(|q| q.quality_score),
    })
}
