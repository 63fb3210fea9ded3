//! Sync job domain models.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Lifecycle of one sync job: `pending -> running -> {completed, failed}`.
/// Terminal states are final; retries are new job rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncJobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl SyncJobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncJobStatus::Pending => "pending",
            SyncJobStatus::Running => "running",
            SyncJobStatus::Completed => "completed",
            SyncJobStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(SyncJobStatus::Pending),
            "running" => Some(SyncJobStatus::Running),
            "completed" => Some(SyncJobStatus::Completed),
            "failed" => Some(SyncJobStatus::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SyncJobStatus::Completed | SyncJobStatus::Failed)
    }
}

/// Why a sync was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncType {
    #[default]
    Manual,
    Initial,
    Incremental,
    Backfill,
}

impl SyncType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncType::Manual => "manual",
            SyncType::Initial => "initial",
            SyncType::Incremental => "incremental",
            SyncType::Backfill => "backfill",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "manual" => Some(SyncType::Manual),
            "initial" => Some(SyncType::Initial),
            "incremental" => Some(SyncType::Incremental),
            "backfill" => Some(SyncType::Backfill),
            _ => None,
        }
    }
}

/// One tracked attempt to synchronize a date range for a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncJob {
    pub id: String,
    pub ads_customer_id: String,
    pub status: SyncJobStatus,
    pub sync_type: SyncType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub started_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
    pub records_processed: i64,
    pub error_message: Option<String>,
    /// Structured failure detail: at minimum a classification and
    /// diagnostic text.
    pub error_details: Option<serde_json::Value>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input for opening a job. Jobs are created in `pending`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSyncJob {
    pub ads_customer_id: String,
    pub sync_type: SyncType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Outcome of one search-term sync, returned to the caller.
///
/// `records_fetched` counts rows the upstream returned; `records_stored`
/// counts rows that survived validation and were persisted. Stored being
/// lower than fetched is a legal outcome (partial rows are skipped).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub job_id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub status: SyncJobStatus,
    pub records_fetched: usize,
    pub records_stored: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Running totals of a full-structure sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureSyncTotals {
    pub total_campaigns: usize,
    pub total_ad_groups: usize,
    pub total_keywords: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            SyncJobStatus::Pending,
            SyncJobStatus::Running,
            SyncJobStatus::Completed,
            SyncJobStatus::Failed,
        ] {
            assert_eq!(SyncJobStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(SyncJobStatus::parse("stuck"), None);
    }

    #[test]
    fn only_completed_and_failed_are_terminal() {
        assert!(!SyncJobStatus::Pending.is_terminal());
        assert!(!SyncJobStatus::Running.is_terminal());
        assert!(SyncJobStatus::Completed.is_terminal());
        assert!(SyncJobStatus::Failed.is_terminal());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SyncJobStatus::Completed).unwrap(),
            "\"completed\""
        );
        assert_eq!(
            serde_json::from_str::<SyncJobStatus>("\"failed\"").unwrap(),
            SyncJobStatus::Failed
        );
    }

    #[test]
    fn sync_type_defaults_to_manual() {
        assert_eq!(SyncType::default(), SyncType::Manual);
        assert_eq!(SyncType::parse("backfill"), Some(SyncType::Backfill));
    }
}
