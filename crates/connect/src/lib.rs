//! Sync orchestration for Adsight.
//!
//! Composes the domain services from `adsight-core`, the Google Ads client
//! from `adsight-gads`, and the repositories from `adsight-storage-sqlite`
//! into the operations the (external) HTTP layer exposes:
//! - the tracked search-term sync ([`sync::SearchTermSyncService`])
//! - the best-effort full-structure sync ([`sync::StructureSyncService`])
//! - live read-through report fetching ([`reports::LiveReportService`])
//! - service wiring ([`bootstrap::build_services`])

pub mod bootstrap;
pub mod reports;
pub mod sync;

pub use bootstrap::{build_services, BootstrapConfig, Services};
pub use reports::{LiveReportService, LiveReportServiceTrait};
pub use sync::{
    SearchTermSyncService, SearchTermSyncServiceTrait, StructureSyncService,
    StructureSyncServiceTrait,
};
