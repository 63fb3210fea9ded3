//! Sync module - job models and persistence traits.

mod sync_model;
mod sync_traits;

pub use sync_model::{
    NewSyncJob, StructureSyncTotals, SyncJob, SyncJobStatus, SyncResult, SyncType,
};
pub use sync_traits::SyncJobRepositoryTrait;
