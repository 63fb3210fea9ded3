//! Customer registry repository and service traits.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::customers_model::{AdsCustomer, NewAdsCustomer};
use crate::errors::Result;
use adsight_gads::AccountInfo;

/// Persistence contract for the customer registry.
#[async_trait]
pub trait CustomerRepositoryTrait: Send + Sync {
    /// Atomic upsert by the natural key (connection id, customer id);
    /// concurrent calls for the same key must never create two rows.
    async fn upsert(&self, new_customer: NewAdsCustomer) -> Result<AdsCustomer>;

    fn get_by_customer_id(
        &self,
        connection_id: &str,
        customer_id: &str,
    ) -> Result<Option<AdsCustomer>>;

    fn list_by_connection(&self, connection_id: &str) -> Result<Vec<AdsCustomer>>;

    /// All customers across the user's active connections.
    fn list_by_user(&self, user_id: &str) -> Result<Vec<AdsCustomer>>;

    /// Advances `last_synced_at`; called only on successful sync completion.
    async fn touch_last_synced(&self, customer_row_id: &str, at: NaiveDateTime) -> Result<()>;
}

/// Customer registry operations.
#[async_trait]
pub trait CustomerServiceTrait: Send + Sync {
    /// Idempotent materialization of a resolved account: updates the row in
    /// place when the natural key exists, inserts it otherwise.
    async fn ensure_customer(
        &self,
        connection_id: &str,
        account: &AccountInfo,
    ) -> Result<AdsCustomer>;

    /// Local row for the user's active connection when one exists,
    /// otherwise resolves the account list upstream and materializes the
    /// match. `NotFound` when the id is not among the resolved accounts.
    async fn get_or_fetch_customer(&self, user_id: &str, customer_id: &str)
        -> Result<AdsCustomer>;

    /// Local-only lookup: the registered row for the user's active
    /// connection, never consulting the upstream resolver.
    fn get_local_customer(&self, user_id: &str, customer_id: &str)
        -> Result<Option<AdsCustomer>>;

    fn list_customers(&self, user_id: &str) -> Result<Vec<AdsCustomer>>;

    async fn touch_last_synced(&self, customer_row_id: &str, at: NaiveDateTime) -> Result<()>;
}
