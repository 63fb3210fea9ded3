//! Database model for stored search terms.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use adsight_core::search_terms::{NewSearchTerm, SearchTerm};

/// Row shape of `search_terms`. Decimal metrics are stored as text to keep
/// their exact value.
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::search_terms)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SearchTermDB {
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
    pub cost: String,
    pub conversions: String,
    pub conversions_value: String,
    pub fetched_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

fn decimal(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap_or_default()
}

impl From<SearchTermDB> for SearchTerm {
    fn from(db: SearchTermDB) -> Self {
        Self {
            cost: decimal(&db.cost),
            conversions: decimal(&db.conversions),
            conversions_value: decimal(&db.conversions_value),
            id: db.id,
            ads_customer_id: db.ads_customer_id,
            campaign_id: db.campaign_id,
            campaign_name: db.campaign_name,
            ad_group_id: db.ad_group_id,
            ad_group_name: db.ad_group_name,
            search_term: db.search_term,
            keyword: db.keyword,
            match_type: db.match_type,
            impressions: db.impressions,
            clicks: db.clicks,
            fetched_at: db.fetched_at,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewSearchTerm> for SearchTermDB {
    fn from(domain: NewSearchTerm) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            ads_customer_id: domain.ads_customer_id,
            campaign_id: domain.campaign_id,
            campaign_name: domain.campaign_name,
            ad_group_id: domain.ad_group_id,
            ad_group_name: domain.ad_group_name,
            search_term: domain.search_term,
            keyword: domain.keyword,
            match_type: domain.match_type,
            impressions: domain.impressions,
            clicks: domain.clicks,
            cost: domain.cost.to_string(),
            conversions: domain.conversions.to_string(),
            conversions_value: domain.conversions_value.to_string(),
            fetched_at: domain.fetched_at,
            created_at: now,
            updated_at: now,
        }
    }
}
