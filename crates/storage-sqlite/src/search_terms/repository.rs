//! Repository for stored search terms.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use log::{debug, warn};
use std::sync::Arc;

use adsight_core::errors::Result;
use adsight_core::search_terms::{NewSearchTerm, SearchTerm, SearchTermRepositoryTrait};

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::search_terms;

use super::model::SearchTermDB;

pub struct SearchTermRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SearchTermRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl SearchTermRepositoryTrait for SearchTermRepository {
    async fn bulk_insert(&self, terms: Vec<NewSearchTerm>) -> Result<usize> {
        if terms.is_empty() {
            warn!("No search terms to insert");
            return Ok(0);
        }

        let inserted = self
            .writer
            .exec(move |conn| {
                let rows: Vec<SearchTermDB> = terms.into_iter().map(SearchTermDB::from).collect();

                diesel::insert_into(search_terms::table)
                    .values(&rows)
                    .execute(conn)
                    .into_core()
            })
            .await?;

        debug!("Bulk inserted {} search terms", inserted);
        Ok(inserted)
    }

    fn list_for_customer(
        &self,
        ads_customer_id: &str,
        fetched_after: Option<NaiveDateTime>,
        fetched_before: Option<NaiveDateTime>,
        limit: i64,
    ) -> Result<Vec<SearchTerm>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = search_terms::table
            .filter(search_terms::ads_customer_id.eq(ads_customer_id))
            .into_boxed();

        if let Some(after) = fetched_after {
            query = query.filter(search_terms::fetched_at.ge(after));
        }

        if let Some(before) = fetched_before {
            query = query.filter(search_terms::fetched_at.le(before));
        }

        let rows = query
            .order(search_terms::fetched_at.desc())
            .limit(limit)
            .select(SearchTermDB::as_select())
            .load::<SearchTermDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(SearchTerm::from).collect())
    }
}
