//! Wire shapes for `googleAds:search` result rows.
//!
//! The REST API maps proto int64 fields to JSON strings, so id and micros
//! fields deserialize as `Option<String>` and are parsed by the helpers at
//! the bottom. Every field is optional; the report layer decides which
//! absences make a row unusable.

use serde::Deserialize;

/// One result row from a `googleAds:search` call. Which sections are
/// populated depends on the FROM clause of the query.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRow {
    pub customer: Option<RawCustomer>,
    pub customer_client: Option<RawCustomerClient>,
    pub campaign: Option<RawCampaign>,
    pub campaign_budget: Option<RawCampaignBudget>,
    pub ad_group: Option<RawAdGroup>,
    pub ad_group_criterion: Option<RawAdGroupCriterion>,
    pub search_term_view: Option<RawSearchTermView>,
    pub metrics: Option<RawMetrics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCustomer {
    pub id: Option<String>,
    pub descriptive_name: Option<String>,
    pub currency_code: Option<String>,
    pub time_zone: Option<String>,
    pub manager: Option<bool>,
    pub test_account: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCustomerClient {
    pub id: Option<String>,
    pub descriptive_name: Option<String>,
    pub currency_code: Option<String>,
    pub time_zone: Option<String>,
    pub manager: Option<bool>,
    pub level: Option<String>,
    pub status: Option<String>,
    pub hidden: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCampaign {
    pub id: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub bidding_strategy_type: Option<String>,
    pub advertising_channel_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCampaignBudget {
    pub amount_micros: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAdGroup {
    pub id: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub ad_group_type: Option<String>,
    pub cpc_bid_micros: Option<String>,
    pub target_cpa_micros: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAdGroupCriterion {
    pub criterion_id: Option<String>,
    pub status: Option<String>,
    pub keyword: Option<RawKeywordInfo>,
    pub final_urls: Vec<String>,
    pub cpc_bid_micros: Option<String>,
    pub quality_info: Option<RawQualityInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawKeywordInfo {
    pub text: Option<String>,
    pub match_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawQualityInfo {
    pub quality_score: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSearchTermView {
    pub search_term: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawMetrics {
    pub impressions: Option<String>,
    pub clicks: Option<String>,
    pub cost_micros: Option<String>,
    pub conversions: Option<f64>,
    pub conversions_value: Option<f64>,
    pub ctr: Option<f64>,
    pub average_cpc: Option<f64>,
    pub average_cpm: Option<f64>,
}

/// Parses an int64-as-string field, defaulting missing or malformed values
/// to zero so aggregate arithmetic stays well-defined.
pub(crate) fn int_field(value: &Option<String>) -> i64 {
    value.as_deref().and_then(|s| s.parse().ok()).unwrap_or(0)
}

/// Parses an int64-as-string field, preserving absence.
pub(crate) fn opt_int_field(value: &Option<String>) -> Option<i64> {
    value.as_deref().and_then(|s| s.parse().ok())
}
