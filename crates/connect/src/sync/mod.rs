//! Sync orchestration services.

mod service;
mod structure;

mod service_tests;

pub use service::{SearchTermSyncService, SearchTermSyncServiceTrait};
pub use structure::{StructureSyncService, StructureSyncServiceTrait};
