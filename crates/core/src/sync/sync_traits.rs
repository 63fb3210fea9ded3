//! Sync job persistence trait.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::sync_model::{NewSyncJob, SyncJob};
use crate::errors::Result;

/// Persistence contract for sync jobs.
///
/// Transition order is strict: the `pending` insert completes before
/// `mark_running` is issued, and a terminal transition is the last write for
/// a job id. Terminal rows are never transitioned again.
#[async_trait]
pub trait SyncJobRepositoryTrait: Send + Sync {
    /// Inserts a job in `pending`.
    async fn create(&self, new_job: NewSyncJob) -> Result<SyncJob>;

    async fn mark_running(&self, job_id: &str, started_at: NaiveDateTime) -> Result<SyncJob>;

    async fn mark_completed(
        &self,
        job_id: &str,
        completed_at: NaiveDateTime,
        records_processed: i64,
    ) -> Result<SyncJob>;

    async fn mark_failed(
        &self,
        job_id: &str,
        completed_at: NaiveDateTime,
        error_message: &str,
        error_details: serde_json::Value,
    ) -> Result<SyncJob>;

    /// Jobs for a customer, newest first, capped at `limit`.
    fn list_for_customer(&self, ads_customer_id: &str, limit: i64) -> Result<Vec<SyncJob>>;
}
