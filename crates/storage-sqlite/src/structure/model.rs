//! Database models for the account-structure entities.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use adsight_core::structure::{
    AdGroup, Campaign, Keyword, NewAdGroup, NewCampaign, NewKeyword,
};

fn decimal(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap_or_default()
}

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::campaigns)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CampaignDB {
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
    pub cost: String,
    pub conversions: String,
    pub conversions_value: String,
    pub ctr: String,
    pub average_cpc: String,
    pub average_cpm: String,
    pub metrics_start_date: Option<String>,
    pub metrics_end_date: Option<String>,
    pub is_active: bool,
    pub last_fetched_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<CampaignDB> for Campaign {
    fn from(db: CampaignDB) -> Self {
        Self {
            cost: decimal(&db.cost),
            conversions: decimal(&db.conversions),
            conversions_value: decimal(&db.conversions_value),
            ctr: decimal(&db.ctr),
            average_cpc: decimal(&db.average_cpc),
            average_cpm: decimal(&db.average_cpm),
            id: db.id,
            ads_customer_id: db.ads_customer_id,
            campaign_id: db.campaign_id,
            campaign_name: db.campaign_name,
            status: db.status,
            bidding_strategy_type: db.bidding_strategy_type,
            advertising_channel_type: db.advertising_channel_type,
            budget_amount_micros: db.budget_amount_micros,
            currency_code: db.currency_code,
            start_date: db.start_date,
            end_date: db.end_date,
            impressions: db.impressions,
            clicks: db.clicks,
            metrics_start_date: db.metrics_start_date,
            metrics_end_date: db.metrics_end_date,
            is_active: db.is_active,
            last_fetched_at: db.last_fetched_at,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewCampaign> for CampaignDB {
    fn from(domain: NewCampaign) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            ads_customer_id: domain.ads_customer_id,
            campaign_id: domain.campaign_id,
            campaign_name: domain.campaign_name,
            status: domain.status,
            bidding_strategy_type: domain.bidding_strategy_type,
            advertising_channel_type: domain.advertising_channel_type,
            budget_amount_micros: domain.budget_amount_micros,
            currency_code: domain.currency_code,
            start_date: domain.start_date,
            end_date: domain.end_date,
            impressions: domain.impressions,
            clicks: domain.clicks,
            cost: domain.cost.to_string(),
            conversions: domain.conversions.to_string(),
            conversions_value: domain.conversions_value.to_string(),
            ctr: domain.ctr.to_string(),
            average_cpc: domain.average_cpc.to_string(),
            average_cpm: domain.average_cpm.to_string(),
            metrics_start_date: domain.metrics_start_date,
            metrics_end_date: domain.metrics_end_date,
            is_active: true,
            last_fetched_at: domain.last_fetched_at,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::ad_groups)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AdGroupDB {
    pub id: String,
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

impl From<AdGroupDB> for AdGroup {
    fn from(db: AdGroupDB) -> Self {
        Self {
            id: db.id,
            campaign_row_id: db.campaign_row_id,
            campaign_id: db.campaign_id,
            ad_group_id: db.ad_group_id,
            ad_group_name: db.ad_group_name,
            status: db.status,
            ad_group_type: db.ad_group_type,
            cpc_bid_micros: db.cpc_bid_micros,
            target_cpa_micros: db.target_cpa_micros,
            is_active: db.is_active,
            last_fetched_at: db.last_fetched_at,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewAdGroup> for AdGroupDB {
    fn from(domain: NewAdGroup) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            campaign_row_id: domain.campaign_row_id,
            campaign_id: domain.campaign_id,
            ad_group_id: domain.ad_group_id,
            ad_group_name: domain.ad_group_name,
            status: domain.status,
            ad_group_type: domain.ad_group_type,
            cpc_bid_micros: domain.cpc_bid_micros,
            target_cpa_micros: domain.target_cpa_micros,
            is_active: true,
            last_fetched_at: domain.last_fetched_at,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::keywords)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct KeywordDB {
    pub id: String,
    pub ad_group_row_id: String,
    pub ad_group_id: String,
    pub keyword_id: String,
    pub keyword_text: String,
    pub match_type: String,
    pub status: String,
    /// JSON array of final URLs.
    pub final_urls: String,
    pub cpc_bid_micros: i64,
    pub quality_score: Option<i32>,
    pub is_active: bool,
    pub last_fetched_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<KeywordDB> for Keyword {
    fn from(db: KeywordDB) -> Self {
        Self {
            final_urls: serde_json::from_str(&db.final_urls).unwrap_or_default(),
            id: db.id,
            ad_group_row_id: db.ad_group_row_id,
            ad_group_id: db.ad_group_id,
            keyword_id: db.keyword_id,
            keyword_text: db.keyword_text,
            match_type: db.match_type,
            status: db.status,
            cpc_bid_micros: db.cpc_bid_micros,
            quality_score: db.quality_score,
            is_active: db.is_active,
            last_fetched_at: db.last_fetched_at,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewKeyword> for KeywordDB {
    fn from(domain: NewKeyword) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            ad_group_row_id: domain.ad_group_row_id,
            ad_group_id: domain.ad_group_id,
            keyword_id: domain.keyword_id,
            keyword_text: domain.keyword_text,
            match_type: domain.match_type,
            status: domain.status,
            final_urls: serde_json::to_string(&domain.final_urls)
                .unwrap_or_else(|_| "[]".to_string()),
            cpc_bid_micros: domain.cpc_bid_micros,
            quality_score: domain.quality_score,
            is_active: true,
            last_fetched_at: domain.last_fetched_at,
            created_at: now,
            updated_at: now,
        }
    }
}
