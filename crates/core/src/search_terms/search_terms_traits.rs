//! Search-term persistence trait.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::search_terms_model::{NewSearchTerm, SearchTerm};
use crate::errors::Result;

/// Persistence contract for stored search terms.
#[async_trait]
pub trait SearchTermRepositoryTrait: Send + Sync {
    /// Bulk-inserts a batch, returning the number of rows actually written.
    async fn bulk_insert(&self, terms: Vec<NewSearchTerm>) -> Result<usize>;

    /// Stored terms for a customer, newest fetch first, optionally bounded
    /// by a fetched-at window, capped at `limit`.
    fn list_for_customer(
        &self,
        ads_customer_id: &str,
        fetched_after: Option<NaiveDateTime>,
        fetched_before: Option<NaiveDateTime>,
        limit: i64,
    ) -> Result<Vec<SearchTerm>>;
}
