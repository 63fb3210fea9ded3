//! Google Ads API client layer.
//!
//! This crate owns everything that talks to the Google Ads reporting API:
//! - A transport trait ([`api::GoogleAdsApi`]) with a reqwest-based REST
//!   implementation ([`api::GoogleAdsRestClient`])
//! - GAQL query construction ([`queries`])
//! - Account discovery and manager (MCC) delegation ([`resolver`])
//! - Report fetchers that validate rows and normalize micro-unit money
//!   values into decimals ([`reports`])
//!
//! Nothing in this crate touches storage; callers hand in a refresh token
//! and get normalized rows back.

pub mod api;
pub mod config;
pub mod dates;
pub mod errors;
pub mod models;
pub mod queries;
pub mod reports;
pub mod resolver;

pub use api::{CustomerContext, GoogleAdsApi, GoogleAdsRestClient};
pub use config::GoogleAdsConfig;
pub use errors::GoogleAdsError;
pub use models::{
    AccountInfo, AdGroupRow, CampaignMetrics, CampaignRow, KeywordRow, SearchTermBatch,
    SearchTermMetrics, SearchTermRow,
};
pub use reports::{ReportClient, ReportClientTrait};
pub use resolver::{AccountResolver, AccountResolverTrait};
