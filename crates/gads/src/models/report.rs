//! Normalized report rows.
//!
//! Upstream money values arrive as integer micro-units (1,000,000 micros =
//! 1 unit of currency). Rows keep both the raw micros and the exact decimal
//! conversion so storage never re-derives one from the other.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const MICROS_PER_UNIT: i64 = 1_000_000;

/// Exact micros → currency conversion.
pub fn decimal_from_micros(micros: i64) -> Decimal {
    Decimal::new(micros, 6)
}

/// Conversion for metrics the API reports as floating-point micros
/// (average CPC/CPM). Non-finite values collapse to zero.
pub fn decimal_from_micros_f64(micros: f64) -> Decimal {
    Decimal::from_f64(micros)
        .map(|d| d / Decimal::from(MICROS_PER_UNIT))
        .unwrap_or_default()
}

/// Performance metrics attached to a search-term row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTermMetrics {
    pub impressions: i64,
    pub clicks: i64,
    pub cost: Decimal,
    pub conversions: Decimal,
    pub conversions_value: Decimal,
}

/// Result of one search-term fetch.
///
/// `records_fetched` counts the raw rows upstream returned, including rows
/// dropped by validation, so callers can report fetched vs stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTermBatch {
    pub rows: Vec<SearchTermRow>,
    pub records_fetched: usize,
}

/// One search-term report row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTermRow {
    pub campaign_id: String,
    pub campaign_name: String,
    pub ad_group_id: String,
    pub ad_group_name: String,
    /// The literal query the user typed.
    pub search_term: String,
    /// The configured keyword that matched, when the API reports one.
    pub keyword: String,
    pub match_type: String,
    pub metrics: SearchTermMetrics,
}

/// Performance metrics attached to a campaign row. All zero when the
/// campaign was fetched without a date range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignMetrics {
    pub impressions: i64,
    pub clicks: i64,
    pub cost: Decimal,
    pub conversions: Decimal,
    pub conversions_value: Decimal,
    pub ctr: Decimal,
    pub average_cpc: Decimal,
    pub average_cpm: Decimal,
}

/// One campaign row, optionally carrying its ad groups after a deep fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRow {
    pub campaign_id: String,
    pub campaign_name: String,
    pub status: String,
    pub bidding_strategy_type: String,
    pub advertising_channel_type: String,
    pub budget_amount_micros: i64,
    pub budget_amount: Decimal,
    pub currency_code: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub metrics: CampaignMetrics,
    #[serde(default)]
    pub ad_groups: Vec<AdGroupRow>,
}

/// One ad-group row, optionally carrying its keywords after a deep fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdGroupRow {
    pub ad_group_id: String,
    pub ad_group_name: String,
    pub campaign_id: String,
    pub campaign_name: String,
    pub status: String,
    pub ad_group_type: String,
    pub cpc_bid_micros: i64,
    pub cpc_bid: Decimal,
    pub target_cpa_micros: Option<i64>,
    pub target_cpa: Option<Decimal>,
    #[serde(default)]
    pub keywords: Vec<KeywordRow>,
}

/// One keyword criterion row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordRow {
    pub keyword_id: String,
    pub ad_group_id: String,
    pub ad_group_name: String,
    pub campaign_id: String,
    pub campaign_name: String,
    pub keyword_text: String,
    pub match_type: String,
    pub status: String,
    pub final_urls: Vec<String>,
    pub cpc_bid_micros: i64,
    pub cpc_bid: Decimal,
    pub quality_score: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn micros_conversion_is_exact() {
        assert_eq!(decimal_from_micros(0), dec!(0));
        assert_eq!(decimal_from_micros(1), dec!(0.000001));
        assert_eq!(decimal_from_micros(1_500_000), dec!(1.5));
        assert_eq!(decimal_from_micros(123_456_789), dec!(123.456789));
    }

    #[test]
    fn micros_conversion_matches_division_across_range() {
        let divisor = Decimal::from(1_000_000i64);
        for m in [0i64, 1, 999_999, 1_000_000, 987_654_321, 1_000_000_000_000] {
            assert_eq!(decimal_from_micros(m), Decimal::from(m) / divisor);
        }
    }

    #[test]
    fn float_micros_conversion() {
        assert_eq!(decimal_from_micros_f64(0.0), dec!(0));
        assert_eq!(decimal_from_micros_f64(2_500_000.0), dec!(2.5));
        assert_eq!(decimal_from_micros_f64(f64::NAN), dec!(0));
    }
}
