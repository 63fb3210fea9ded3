//! Repository for sync jobs.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use std::sync::Arc;

use adsight_core::errors::Result;
use adsight_core::sync::{NewSyncJob, SyncJob, SyncJobRepositoryTrait, SyncJobStatus};

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::sync_jobs;

use super::model::SyncJobDB;

pub struct SyncJobRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SyncJobRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    async fn reload(&self, job_id: String) -> Result<SyncJob> {
        self.writer
            .exec(move |conn| {
                sync_jobs::table
                    .find(&job_id)
                    .select(SyncJobDB::as_select())
                    .first::<SyncJobDB>(conn)
                    .into_core()?
                    .into_domain()
            })
            .await
    }
}

#[async_trait]
impl SyncJobRepositoryTrait for SyncJobRepository {
    async fn create(&self, new_job: NewSyncJob) -> Result<SyncJob> {
        self.writer
            .exec(move |conn| {
                let row: SyncJobDB = new_job.into();

                diesel::insert_into(sync_jobs::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;

                row.into_domain()
            })
            .await
    }

    async fn mark_running(&self, job_id: &str, started_at: NaiveDateTime) -> Result<SyncJob> {
        let id_owned = job_id.to_string();

        self.writer
            .exec(move |conn| {
                diesel::update(sync_jobs::table.find(&id_owned))
                    .set((
                        sync_jobs::status.eq(SyncJobStatus::Running.as_str()),
                        sync_jobs::started_at.eq(started_at),
                        sync_jobs::updated_at.eq(chrono::Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await?;

        self.reload(job_id.to_string()).await
    }

    async fn mark_completed(
        &self,
        job_id: &str,
        completed_at: NaiveDateTime,
        records_processed: i64,
    ) -> Result<SyncJob> {
        let id_owned = job_id.to_string();

        self.writer
            .exec(move |conn| {
                diesel::update(sync_jobs::table.find(&id_owned))
                    .set((
                        sync_jobs::status.eq(SyncJobStatus::Completed.as_str()),
                        sync_jobs::completed_at.eq(completed_at),
                        sync_jobs::records_processed.eq(records_processed),
                        sync_jobs::updated_at.eq(chrono::Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await?;

        self.reload(job_id.to_string()).await
    }

    async fn mark_failed(
        &self,
        job_id: &str,
        completed_at: NaiveDateTime,
        error_message: &str,
        error_details: serde_json::Value,
    ) -> Result<SyncJob> {
        let id_owned = job_id.to_string();
        let message_owned = error_message.to_string();

        self.writer
            .exec(move |conn| {
                let details = serde_json::to_string(&error_details).unwrap_or_default();

                diesel::update(sync_jobs::table.find(&id_owned))
                    .set((
                        sync_jobs::status.eq(SyncJobStatus::Failed.as_str()),
                        sync_jobs::completed_at.eq(completed_at),
                        sync_jobs::error_message.eq(&message_owned),
                        sync_jobs::error_details.eq(&details),
                        sync_jobs::updated_at.eq(chrono::Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await?;

        self.reload(job_id.to_string()).await
    }

    fn list_for_customer(&self, ads_customer_id: &str, limit: i64) -> Result<Vec<SyncJob>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = sync_jobs::table
            .filter(sync_jobs::ads_customer_id.eq(ads_customer_id))
            .order(sync_jobs::created_at.desc())
            .limit(limit)
            .select(SyncJobDB::as_select())
            .load::<SyncJobDB>(&mut conn)
            .into_core()?;

        rows.into_iter().map(SyncJobDB::into_domain).collect()
    }
}
