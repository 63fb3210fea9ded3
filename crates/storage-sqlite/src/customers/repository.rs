//! Repository for the advertiser-customer registry.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use std::sync::Arc;

use adsight_core::customers::{AdsCustomer, CustomerRepositoryTrait, NewAdsCustomer};
use adsight_core::errors::Result;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{ads_customers, google_oauth_connections};

use super::model::CustomerDB;

pub struct CustomerRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl CustomerRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl CustomerRepositoryTrait for CustomerRepository {
    async fn upsert(&self, new_customer: NewAdsCustomer) -> Result<AdsCustomer> {
        self.writer
            .exec(move |conn| {
                use diesel::upsert::excluded;

                let row: CustomerDB = new_customer.into();
                let now = chrono::Utc::now().naive_utc();

                // Atomic insert-or-update on the natural key; concurrent
                // calls for the same key cannot create a second row.
                diesel::insert_into(ads_customers::table)
                    .values(&row)
                    .on_conflict((ads_customers::connection_id, ads_customers::customer_id))
                    .do_update()
                    .set((
                        ads_customers::customer_name.eq(excluded(ads_customers::customer_name)),
                        ads_customers::descriptive_name
                            .eq(excluded(ads_customers::descriptive_name)),
                        ads_customers::login_customer_id
                            .eq(excluded(ads_customers::login_customer_id)),
                        ads_customers::is_manager_account
                            .eq(excluded(ads_customers::is_manager_account)),
                        ads_customers::manager_customer_id
                            .eq(excluded(ads_customers::manager_customer_id)),
                        ads_customers::currency_code.eq(excluded(ads_customers::currency_code)),
                        ads_customers::time_zone.eq(excluded(ads_customers::time_zone)),
                        ads_customers::is_active.eq(excluded(ads_customers::is_active)),
                        ads_customers::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .into_core()?;

                let current = ads_customers::table
                    .filter(ads_customers::connection_id.eq(&row.connection_id))
                    .filter(ads_customers::customer_id.eq(&row.customer_id))
                    .select(CustomerDB::as_select())
                    .first::<CustomerDB>(conn)
                    .into_core()?;

                Ok(AdsCustomer::from(current))
            })
            .await
    }

    fn get_by_customer_id(
        &self,
        connection_id: &str,
        customer_id: &str,
    ) -> Result<Option<AdsCustomer>> {
        let mut conn = get_connection(&self.pool)?;

        let row: Option<CustomerDB> = ads_customers::table
            .filter(ads_customers::connection_id.eq(connection_id))
            .filter(ads_customers::customer_id.eq(customer_id))
            .select(CustomerDB::as_select())
            .first::<CustomerDB>(&mut conn)
            .optional()
            .into_core()?;

        Ok(row.map(AdsCustomer::from))
    }

    fn list_by_connection(&self, connection_id: &str) -> Result<Vec<AdsCustomer>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = ads_customers::table
            .filter(ads_customers::connection_id.eq(connection_id))
            .order(ads_customers::customer_id.asc())
            .select(CustomerDB::as_select())
            .load::<CustomerDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(AdsCustomer::from).collect())
    }

    fn list_by_user(&self, user_id: &str) -> Result<Vec<AdsCustomer>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = ads_customers::table
            .inner_join(google_oauth_connections::table)
            .filter(google_oauth_connections::user_id.eq(user_id))
            .filter(google_oauth_connections::is_active.eq(true))
            .filter(ads_customers::is_active.eq(true))
            .order(ads_customers::customer_id.asc())
            .select(CustomerDB::as_select())
            .load::<CustomerDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(AdsCustomer::from).collect())
    }

    async fn touch_last_synced(&self, customer_row_id: &str, at: NaiveDateTime) -> Result<()> {
        let id_owned = customer_row_id.to_string();

        self.writer
            .exec(move |conn| {
                diesel::update(ads_customers::table.find(&id_owned))
                    .set((
                        ads_customers::last_synced_at.eq(at),
                        ads_customers::updated_at.eq(chrono::Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await
    }
}
