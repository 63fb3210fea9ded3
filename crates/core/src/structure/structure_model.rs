//! Stored account-structure models: campaigns, ad groups, keywords.
//!
//! Ownership chain: Keyword -> AdGroup -> Campaign -> AdsCustomer. Each row
//! carries both its parent's local row id and the external ids, plus a
//! `last_fetched_at` watermark for when it was last refreshed from
//! upstream.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use adsight_gads::{AdGroupRow, CampaignRow, KeywordRow};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub ads_customer_id: String,
    pub campaign_id: String,
    pub campaign_name: String,
    pub status: String,
    pub bidding_strategy_type: Option<String>,
    pub advertising_channel_type: Option<String>,
    pub budget_amount_micros: i64,
    pub currency_code: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub impressions: i64,
    pub clicks: i64,
    pub cost: Decimal,
    pub conversions: Decimal,
    pub conversions_value: Decimal,
    pub ctr: Decimal,
    pub average_cpc: Decimal,
    pub average_cpm: Decimal,
    /// Date range the metric snapshot covers, when one was requested.
    pub metrics_start_date: Option<String>,
    pub metrics_end_date: Option<String>,
    pub is_active: bool,
    pub last_fetched_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCampaign {
    pub ads_customer_id: String,
    pub campaign_id: String,
    pub campaign_name: String,
    pub status: String,
    pub bidding_strategy_type: Option<String>,
    pub advertising_channel_type: Option<String>,
    pub budget_amount_micros: i64,
    pub currency_code: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub impressions: i64,
    pub clicks: i64,
    pub cost: Decimal,
    pub conversions: Decimal,
    pub conversions_value: Decimal,
    pub ctr: Decimal,
    pub average_cpc: Decimal,
    pub average_cpm: Decimal,
    pub metrics_start_date: Option<String>,
    pub metrics_end_date: Option<String>,
    pub last_fetched_at: NaiveDateTime,
}

impl NewCampaign {
    pub fn from_row(
        ads_customer_id: &str,
        row: &CampaignRow,
        metrics_range: Option<(&str, &str)>,
        last_fetched_at: NaiveDateTime,
    ) -> Self {
        Self {
            ads_customer_id: ads_customer_id.to_string(),
            campaign_id: row.campaign_id.clone(),
            campaign_name: row.campaign_name.clone(),
            status: row.status.clone(),
            bidding_strategy_type: Some(row.bidding_strategy_type.clone()),
            advertising_channel_type: Some(row.advertising_channel_type.clone()),
            budget_amount_micros: row.budget_amount_micros,
            currency_code: Some(row.currency_code.clone()),
            start_date: if row.start_date.is_empty() {
                None
            } else {
                Some(row.start_date.clone())
            },
            end_date: row.end_date.clone(),
            impressions: row.metrics.impressions,
            clicks: row.metrics.clicks,
            cost: row.metrics.cost,
            conversions: row.metrics.conversions,
            conversions_value: row.metrics.conversions_value,
            ctr: row.metrics.ctr,
            average_cpc: row.metrics.average_cpc,
            average_cpm: row.metrics.average_cpm,
            metrics_start_date: metrics_range.map(|(start, _)| start.to_string()),
            metrics_end_date: metrics_range.map(|(_, end)| end.to_string()),
            last_fetched_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdGroup {
    pub id: String,
    /// Local row id of the owning campaign.
    pub campaign_row_id: String,
    pub campaign_id: String,
    pub ad_group_id: String,
    pub ad_group_name: String,
    pub status: String,
    pub ad_group_type: Option<String>,
    pub cpc_bid_micros: i64,
    pub target_cpa_micros: Option<i64>,
    pub is_active: bool,
    pub last_fetched_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAdGroup {
    pub campaign_row_id: String,
    pub campaign_id: String,
    pub ad_group_id: String,
    pub ad_group_name: String,
    pub status: String,
    pub ad_group_type: Option<String>,
    pub cpc_bid_micros: i64,
    pub target_cpa_micros: Option<i64>,
    pub last_fetched_at: NaiveDateTime,
}

impl NewAdGroup {
    pub fn from_row(
        campaign_row_id: &str,
        row: &AdGroupRow,
        last_fetched_at: NaiveDateTime,
    ) -> Self {
        Self {
            campaign_row_id: campaign_row_id.to_string(),
            campaign_id: row.campaign_id.clone(),
            ad_group_id: row.ad_group_id.clone(),
            ad_group_name: row.ad_group_name.clone(),
            status: row.status.clone(),
            ad_group_type: Some(row.ad_group_type.clone()),
            cpc_bid_micros: row.cpc_bid_micros,
            target_cpa_micros: row.target_cpa_micros,
            last_fetched_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyword {
    pub id: String,
    /// Local row id of the owning ad group.
    pub ad_group_row_id: String,
    pub ad_group_id: String,
    pub keyword_id: String,
    pub keyword_text: String,
    pub match_type: String,
    pub status: String,
    pub final_urls: Vec<String>,
    pub cpc_bid_micros: i64,
    pub quality_score: Option<i32>,
    pub is_active: bool,
    pub last_fetched_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewKeyword {
    pub ad_group_row_id: String,
    pub ad_group_id: String,
    pub keyword_id: String,
    pub keyword_text: String,
    pub match_type: String,
    pub status: String,
    pub final_urls: Vec<String>,
    pub cpc_bid_micros: i64,
    pub quality_score: Option<i32>,
    pub last_fetched_at: NaiveDateTime,
}

impl NewKeyword {
    pub fn from_row(
        ad_group_row_id: &str,
        row: &KeywordRow,
        last_fetched_at: NaiveDateTime,
    ) -> Self {
        Self {
            ad_group_row_id: ad_group_row_id.to_string(),
            ad_group_id: row.ad_group_id.clone(),
            keyword_id: row.keyword_id.clone(),
            keyword_text: row.keyword_text.clone(),
            match_type: row.match_type.clone(),
            status: row.status.clone(),
            final_urls: row.final_urls.clone(),
            cpc_bid_micros: row.cpc_bid_micros,
            quality_score: row.quality_score,
            last_fetched_at,
        }
    }
}
