//! Stored search-term models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use adsight_gads::SearchTermRow;

/// One persisted search-term report row.
///
/// `fetched_at` records when the row was pulled from upstream and is shared
/// by every row of a batch; `created_at`/`updated_at` are storage
/// bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTerm {
    pub id: String,
    pub ads_customer_id: String,
    pub campaign_id: String,
    pub campaign_name: String,
    pub ad_group_id: String,
    pub ad_group_name: String,
    pub search_term: String,
    pub keyword: String,
    pub match_type: String,
    pub impressions: i64,
    pub clicks: i64,
    pub cost: Decimal,
    pub conversions: Decimal,
    pub conversions_value: Decimal,
    pub fetched_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertion shape for one fetched search term.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSearchTerm {
    pub ads_customer_id: String,
    pub campaign_id: String,
    pub campaign_name: String,
    pub ad_group_id: String,
    pub ad_group_name: String,
    pub search_term: String,
    pub keyword: String,
    pub match_type: String,
    pub impressions: i64,
    pub clicks: i64,
    pub cost: Decimal,
    pub conversions: Decimal,
    pub conversions_value: Decimal,
    pub fetched_at: NaiveDateTime,
}

impl NewSearchTerm {
    /// Maps a fetched row into the insertion shape, stamping the batch's
    /// shared fetch instant.
    pub fn from_row(ads_customer_id: &str, row: &SearchTermRow, fetched_at: NaiveDateTime) -> Self {
        Self {
            ads_customer_id: ads_customer_id.to_string(),
            campaign_id: row.campaign_id.clone(),
            campaign_name: row.campaign_name.clone(),
            ad_group_id: row.ad_group_id.clone(),
            ad_group_name: row.ad_group_name.clone(),
            search_term: row.search_term.clone(),
            keyword: row.keyword.clone(),
            match_type: row.match_type.clone(),
            impressions: row.metrics.impressions,
            clicks: row.metrics.clicks,
            cost: row.metrics.cost,
            conversions: row.metrics.conversions,
            conversions_value: row.metrics.conversions_value,
            fetched_at,
        }
    }
}
