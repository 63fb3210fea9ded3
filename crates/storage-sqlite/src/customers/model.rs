//! Database model for registry customers.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use adsight_core::customers::{AdsCustomer, NewAdsCustomer};

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::ads_customers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CustomerDB {
    pub id: String,
    pub connection_id: String,
    pub customer_id: String,
    pub customer_name: Option<String>,
    pub descriptive_name: Option<String>,
    pub login_customer_id: String,
    pub is_manager_account: bool,
    pub manager_customer_id: Option<String>,
    pub currency_code: Option<String>,
    pub time_zone: Option<String>,
    pub is_active: bool,
    pub last_synced_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<CustomerDB> for AdsCustomer {
    fn from(db: CustomerDB) -> Self {
        Self {
            id: db.id,
            connection_id: db.connection_id,
            customer_id: db.customer_id,
            customer_name: db.customer_name,
            descriptive_name: db.descriptive_name,
            login_customer_id: db.login_customer_id,
            is_manager_account: db.is_manager_account,
            manager_customer_id: db.manager_customer_id,
            currency_code: db.currency_code,
            time_zone: db.time_zone,
            is_active: db.is_active,
            last_synced_at: db.last_synced_at,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewAdsCustomer> for CustomerDB {
    fn from(domain: NewAdsCustomer) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            connection_id: domain.connection_id,
            customer_id: domain.customer_id,
            customer_name: domain.customer_name,
            descriptive_name: domain.descriptive_name,
            login_customer_id: domain.login_customer_id,
            is_manager_account: domain.is_manager_account,
            manager_customer_id: domain.manager_customer_id,
            currency_code: domain.currency_code,
            time_zone: domain.time_zone,
            is_active: domain.is_active,
            last_synced_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
