//! Advertiser customer registry models.

use adsight_gads::AccountInfo;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One advertiser account as known to a specific connection.
///
/// `(connection_id, customer_id)` is the natural key: one row per
/// advertiser account per connection. `last_synced_at` advances only when a
/// sync completes successfully.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdsCustomer {
    pub id: String,
    pub connection_id: String,
    /// External customer id, digits only.
    pub customer_id: String,
    pub customer_name: Option<String>,
    pub descriptive_name: Option<String>,
    /// The id used for API delegation when querying this account.
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

/// Input for materializing or refreshing a customer row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAdsCustomer {
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
}

impl NewAdsCustomer {
    /// Builds the registry row for a resolved account.
    pub fn from_account(connection_id: &str, account: &AccountInfo) -> Self {
        Self {
            connection_id: connection_id.to_string(),
            customer_id: account.customer_id.clone(),
            customer_name: Some(account.customer_name.clone()),
            descriptive_name: Some(account.descriptive_name.clone()),
            login_customer_id: account.login_customer_id.clone(),
            is_manager_account: account.is_manager_account,
            manager_customer_id: account.manager_customer_id.clone(),
            currency_code: Some(account.currency_code.clone()),
            time_zone: Some(account.time_zone.clone()),
            is_active: true,
        }
    }
}
