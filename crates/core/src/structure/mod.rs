//! Structure module - stored campaign/ad-group/keyword entities.

mod structure_model;
mod structure_traits;

pub use structure_model::{
    AdGroup, Campaign, Keyword, NewAdGroup, NewCampaign, NewKeyword,
};
pub use structure_traits::{
    AdGroupRepositoryTrait, CampaignRepositoryTrait, KeywordRepositoryTrait,
};
