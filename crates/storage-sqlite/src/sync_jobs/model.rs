//! Database model for sync jobs.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use adsight_core::errors::{DatabaseError, Result};
use adsight_core::sync::{NewSyncJob, SyncJob, SyncJobStatus, SyncType};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::sync_jobs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SyncJobDB {
    pub id: String,
    pub ads_customer_id: String,
    pub status: String,
    pub sync_type: String,
    pub start_date: String,
    pub end_date: String,
    pub started_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
    pub records_processed: i64,
    pub error_message: Option<String>,
    pub error_details: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| DatabaseError::Internal(format!("malformed job date: {}", value)).into())
}

impl SyncJobDB {
    pub fn into_domain(self) -> Result<SyncJob> {
        let status = SyncJobStatus::parse(&self.status).ok_or_else(|| {
            DatabaseError::Internal(format!("unknown sync job status: {}", self.status))
        })?;
        let sync_type = SyncType::parse(&self.sync_type).ok_or_else(|| {
            DatabaseError::Internal(format!("unknown sync type: {}", self.sync_type))
        })?;

        Ok(SyncJob {
            status,
            sync_type,
            start_date: parse_date(&self.start_date)?,
            end_date: parse_date(&self.end_date)?,
            id: self.id,
            ads_customer_id: self.ads_customer_id,
            started_at: self.started_at,
            completed_at: self.completed_at,
            records_processed: self.records_processed,
            error_message: self.error_message,
            error_details: self
                .error_details
                .as_deref()
                .and_then(|details| serde_json::from_str(details).ok()),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl From<NewSyncJob> for SyncJobDB {
    fn from(domain: NewSyncJob) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            ads_customer_id: domain.ads_customer_id,
            status: SyncJobStatus::Pending.as_str().to_string(),
            sync_type: domain.sync_type.as_str().to_string(),
            start_date: domain.start_date.format(DATE_FORMAT).to_string(),
            end_date: domain.end_date.format(DATE_FORMAT).to_string(),
            started_at: None,
            completed_at: None,
            records_processed: 0,
            error_message: None,
            error_details: None,
            created_at: now,
            updated_at: now,
        }
    }
}
