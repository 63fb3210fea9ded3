//! Repositories for campaigns, ad groups, and keywords.
//!
//! All three upsert by natural key with an atomic
//! `INSERT ... ON CONFLICT ... DO UPDATE`, so re-running a structure sync
//! refreshes rows in place instead of duplicating them.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use log::debug;
use std::sync::Arc;

use adsight_core::errors::Result;
use adsight_core::structure::{
    AdGroup, AdGroupRepositoryTrait, Campaign, CampaignRepositoryTrait, Keyword,
    KeywordRepositoryTrait, NewAdGroup, NewCampaign, NewKeyword,
};

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{ad_groups, campaigns, keywords};

use super::model::{AdGroupDB, CampaignDB, KeywordDB};

pub struct CampaignRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl CampaignRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl CampaignRepositoryTrait for CampaignRepository {
    async fn upsert(&self, new_campaign: NewCampaign) -> Result<Campaign> {
        self.writer
            .exec(move |conn| {
                let row: CampaignDB = new_campaign.into();
                let now = chrono::Utc::now().naive_utc();

                diesel::insert_into(campaigns::table)
                    .values(&row)
                    .on_conflict((campaigns::ads_customer_id, campaigns::campaign_id))
                    .do_update()
                    .set((
                        campaigns::campaign_name.eq(excluded(campaigns::campaign_name)),
                        campaigns::status.eq(excluded(campaigns::status)),
                        campaigns::bidding_strategy_type
                            .eq(excluded(campaigns::bidding_strategy_type)),
                        campaigns::advertising_channel_type
                            .eq(excluded(campaigns::advertising_channel_type)),
                        campaigns::budget_amount_micros
                            .eq(excluded(campaigns::budget_amount_micros)),
                        campaigns::currency_code.eq(excluded(campaigns::currency_code)),
                        campaigns::start_date.eq(excluded(campaigns::start_date)),
                        campaigns::end_date.eq(excluded(campaigns::end_date)),
                        campaigns::impressions.eq(excluded(campaigns::impressions)),
                        campaigns::clicks.eq(excluded(campaigns::clicks)),
                        campaigns::cost.eq(excluded(campaigns::cost)),
                        campaigns::conversions.eq(excluded(campaigns::conversions)),
                        campaigns::conversions_value.eq(excluded(campaigns::conversions_value)),
                        campaigns::ctr.eq(excluded(campaigns::ctr)),
                        campaigns::average_cpc.eq(excluded(campaigns::average_cpc)),
                        campaigns::average_cpm.eq(excluded(campaigns::average_cpm)),
                        campaigns::metrics_start_date.eq(excluded(campaigns::metrics_start_date)),
                        campaigns::metrics_end_date.eq(excluded(campaigns::metrics_end_date)),
                        campaigns::is_active.eq(excluded(campaigns::is_active)),
                        campaigns::last_fetched_at.eq(excluded(campaigns::last_fetched_at)),
                        campaigns::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .into_core()?;

                let current = campaigns::table
                    .filter(campaigns::ads_customer_id.eq(&row.ads_customer_id))
                    .filter(campaigns::campaign_id.eq(&row.campaign_id))
                    .select(CampaignDB::as_select())
                    .first::<CampaignDB>(conn)
                    .into_core()?;

                Ok(Campaign::from(current))
            })
            .await
    }

    fn list_by_customer(&self, ads_customer_id: &str) -> Result<Vec<Campaign>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = campaigns::table
            .filter(campaigns::ads_customer_id.eq(ads_customer_id))
            .order(campaigns::campaign_name.asc())
            .select(CampaignDB::as_select())
            .load::<CampaignDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(Campaign::from).collect())
    }
}

pub struct AdGroupRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AdGroupRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl AdGroupRepositoryTrait for AdGroupRepository {
    async fn upsert(&self, new_ad_group: NewAdGroup) -> Result<AdGroup> {
        self.writer
            .exec(move |conn| {
                let row: AdGroupDB = new_ad_group.into();
                let now = chrono::Utc::now().naive_utc();

                diesel::insert_into(ad_groups::table)
                    .values(&row)
                    .on_conflict((ad_groups::campaign_row_id, ad_groups::ad_group_id))
                    .do_update()
                    .set((
                        ad_groups::ad_group_name.eq(excluded(ad_groups::ad_group_name)),
                        ad_groups::status.eq(excluded(ad_groups::status)),
                        ad_groups::ad_group_type.eq(excluded(ad_groups::ad_group_type)),
                        ad_groups::cpc_bid_micros.eq(excluded(ad_groups::cpc_bid_micros)),
                        ad_groups::target_cpa_micros.eq(excluded(ad_groups::target_cpa_micros)),
                        ad_groups::is_active.eq(excluded(ad_groups::is_active)),
                        ad_groups::last_fetched_at.eq(excluded(ad_groups::last_fetched_at)),
                        ad_groups::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .into_core()?;

                let current = ad_groups::table
                    .filter(ad_groups::campaign_row_id.eq(&row.campaign_row_id))
                    .filter(ad_groups::ad_group_id.eq(&row.ad_group_id))
                    .select(AdGroupDB::as_select())
                    .first::<AdGroupDB>(conn)
                    .into_core()?;

                Ok(AdGroup::from(current))
            })
            .await
    }

    fn list_by_campaign(&self, campaign_row_id: &str) -> Result<Vec<AdGroup>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = ad_groups::table
            .filter(ad_groups::campaign_row_id.eq(campaign_row_id))
            .order(ad_groups::ad_group_name.asc())
            .select(AdGroupDB::as_select())
            .load::<AdGroupDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(AdGroup::from).collect())
    }
}

pub struct KeywordRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl KeywordRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl KeywordRepositoryTrait for KeywordRepository {
    async fn bulk_upsert(&self, new_keywords: Vec<NewKeyword>) -> Result<usize> {
        if new_keywords.is_empty() {
            return Ok(0);
        }

        let upserted = self
            .writer
            .exec(move |conn| {
                let now = chrono::Utc::now().naive_utc();
                let mut upserted = 0;

                for new_keyword in new_keywords {
                    let row: KeywordDB = new_keyword.into();

                    upserted += diesel::insert_into(keywords::table)
                        .values(&row)
                        .on_conflict((keywords::ad_group_row_id, keywords::keyword_id))
                        .do_update()
                        .set((
                            keywords::keyword_text.eq(excluded(keywords::keyword_text)),
                            keywords::match_type.eq(excluded(keywords::match_type)),
                            keywords::status.eq(excluded(keywords::status)),
                            keywords::final_urls.eq(excluded(keywords::final_urls)),
                            keywords::cpc_bid_micros.eq(excluded(keywords::cpc_bid_micros)),
                            keywords::quality_score.eq(excluded(keywords::quality_score)),
                            keywords::is_active.eq(excluded(keywords::is_active)),
                            keywords::last_fetched_at.eq(excluded(keywords::last_fetched_at)),
                            keywords::updated_at.eq(now),
                        ))
                        .execute(conn)
                        .into_core()?;
                }

                Ok(upserted)
            })
            .await?;

        debug!("Upserted {} keywords", upserted);
        Ok(upserted)
    }

    fn list_by_ad_group(&self, ad_group_row_id: &str) -> Result<Vec<Keyword>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = keywords::table
            .filter(keywords::ad_group_row_id.eq(ad_group_row_id))
            .order(keywords::keyword_text.asc())
            .select(KeywordDB::as_select())
            .load::<KeywordDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(Keyword::from).collect())
    }
}
