//! Persistence traits for the account-structure entities.

use async_trait::async_trait;

use super::structure_model::{
    AdGroup, Campaign, Keyword, NewAdGroup, NewCampaign, NewKeyword,
};
use crate::errors::Result;

/// Campaign persistence; natural key (ads customer row, campaign id).
#[async_trait]
pub trait CampaignRepositoryTrait: Send + Sync {
    /// Atomic upsert by natural key, returning the current row.
    async fn upsert(&self, new_campaign: NewCampaign) -> Result<Campaign>;

    fn list_by_customer(&self, ads_customer_id: &str) -> Result<Vec<Campaign>>;
}

/// Ad-group persistence; natural key (campaign row, ad group id).
#[async_trait]
pub trait AdGroupRepositoryTrait: Send + Sync {
    async fn upsert(&self, new_ad_group: NewAdGroup) -> Result<AdGroup>;

    fn list_by_campaign(&self, campaign_row_id: &str) -> Result<Vec<AdGroup>>;
}

/// Keyword persistence; natural key (ad group row, keyword id).
#[async_trait]
pub trait KeywordRepositoryTrait: Send + Sync {
    /// Upserts a batch, returning the number of rows written.
    async fn bulk_upsert(&self, keywords: Vec<NewKeyword>) -> Result<usize>;

    fn list_by_ad_group(&self, ad_group_row_id: &str) -> Result<Vec<Keyword>>;
}
