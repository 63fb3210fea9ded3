//! Service wiring.
//!
//! Builds the full service graph over SQLite storage and the REST client.
//! The two external collaborators (identity provider, OAuth code exchange)
//! stay behind traits and are supplied by the host.

use std::sync::Arc;

use adsight_core::connections::{
    ConnectionService, ConnectionServiceTrait, OauthExchangeTrait,
};
use adsight_core::customers::{CustomerService, CustomerServiceTrait};
use adsight_core::errors::Result;
use adsight_core::identity::IdentityProviderTrait;
use adsight_gads::{
    AccountResolver, GoogleAdsApi, GoogleAdsConfig, GoogleAdsRestClient, ReportClient,
};
use adsight_storage_sqlite::connections::ConnectionRepository;
use adsight_storage_sqlite::customers::CustomerRepository;
use adsight_storage_sqlite::search_terms::SearchTermRepository;
use adsight_storage_sqlite::structure::{
    AdGroupRepository, CampaignRepository, KeywordRepository,
};
use adsight_storage_sqlite::sync_jobs::SyncJobRepository;
use adsight_storage_sqlite::TokenCipher;

use crate::reports::{LiveReportService, LiveReportServiceTrait};
use crate::sync::{
    SearchTermSyncService, SearchTermSyncServiceTrait, StructureSyncService,
    StructureSyncServiceTrait,
};

/// Host-supplied configuration.
pub struct BootstrapConfig {
    /// Path of the SQLite database file.
    pub database_url: String,
    /// 32-byte key for the token cipher.
    pub encryption_key: [u8; 32],
    /// Google Ads API credentials and endpoints.
    pub ads: GoogleAdsConfig,
}

/// The wired service graph handed to the HTTP layer.
pub struct Services {
    pub connections: Arc<dyn ConnectionServiceTrait>,
    pub customers: Arc<dyn CustomerServiceTrait>,
    pub search_term_sync: Arc<dyn SearchTermSyncServiceTrait>,
    pub structure_sync: Arc<dyn StructureSyncServiceTrait>,
    pub live_reports: Arc<dyn LiveReportServiceTrait>,
}

/// Builds the pool, migrates the schema, and wires every service.
///
/// Must run inside a Tokio runtime (storage spawns its writer actor).
pub fn build_services(
    config: BootstrapConfig,
    identity: Arc<dyn IdentityProviderTrait>,
    oauth: Arc<dyn OauthExchangeTrait>,
) -> Result<Services> {
    let (pool, writer) = adsight_storage_sqlite::init(&config.database_url)?;
    let cipher = Arc::new(TokenCipher::new(config.encryption_key));

    let connection_repository = Arc::new(ConnectionRepository::new(
        pool.clone(),
        writer.clone(),
        cipher,
    ));
    let customer_repository = Arc::new(CustomerRepository::new(pool.clone(), writer.clone()));
    let job_repository = Arc::new(SyncJobRepository::new(pool.clone(), writer.clone()));
    let term_repository = Arc::new(SearchTermRepository::new(pool.clone(), writer.clone()));
    let campaign_repository = Arc::new(CampaignRepository::new(pool.clone(), writer.clone()));
    let ad_group_repository = Arc::new(AdGroupRepository::new(pool.clone(), writer.clone()));
    let keyword_repository = Arc::new(KeywordRepository::new(pool, writer));

    let api: Arc<dyn GoogleAdsApi> = Arc::new(GoogleAdsRestClient::new(config.ads));
    let resolver = Arc::new(AccountResolver::new(api.clone()));
    let report_client = Arc::new(ReportClient::new(api));

    let customers = Arc::new(CustomerService::new(
        customer_repository,
        connection_repository.clone(),
        resolver.clone(),
    ));

    let connections = Arc::new(ConnectionService::new(
        connection_repository.clone(),
        identity,
        oauth,
        resolver.clone(),
        customers.clone(),
    ));

    let search_term_sync = Arc::new(SearchTermSyncService::new(
        connection_repository.clone(),
        customers.clone(),
        job_repository,
        term_repository,
        report_client.clone(),
    ));

    let structure_sync = Arc::new(StructureSyncService::new(
        connection_repository.clone(),
        customers.clone(),
        report_client.clone(),
        campaign_repository,
        ad_group_repository,
        keyword_repository,
    ));

    let live_reports = Arc::new(LiveReportService::new(
        connection_repository,
        customers.clone(),
        resolver,
        report_client,
    ));

    Ok(Services {
        connections,
        customers,
        search_term_sync,
        structure_sync,
        live_reports,
    })
}
