//! The tracked search-term sync: one job row per attempt.
//!
//! Job rows are the durability boundary. Authorization and validation
//! failures happen before a row exists and propagate to the caller; once a
//! row exists, every failure is recorded on it and surfaced as a
//! `failed`-status result instead of an error. A crash mid-sync leaves a
//! `running` row as the observable artifact; retries are new rows, never
//! in-place resumes.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use log::{error, info, warn};

use adsight_core::connections::ConnectionRepositoryTrait;
use adsight_core::constants::{STORED_SEARCH_TERMS_LIMIT, SYNC_JOB_LIST_LIMIT};
use adsight_core::customers::{AdsCustomer, CustomerServiceTrait};
use adsight_core::errors::{Error, Result};
use adsight_core::search_terms::{NewSearchTerm, SearchTerm, SearchTermRepositoryTrait};
use adsight_core::sync::{
    NewSyncJob, SyncJob, SyncJobRepositoryTrait, SyncJobStatus, SyncResult, SyncType,
};
use adsight_gads::dates::parse_date_range;
use adsight_gads::{CustomerContext, ReportClientTrait};

const MISSING_CUSTOMER_NAME: &str = "No Customer Name";

/// Search-term sync operations and the stored-data queries that hang off
/// the same customer resolution.
#[async_trait]
pub trait SearchTermSyncServiceTrait: Send + Sync {
    /// Fetches search terms for the date range and persists them under one
    /// tracked job. Returns the terminal outcome; never errors once the
    /// job row exists.
    async fn sync_search_terms(
        &self,
        user_id: &str,
        customer_id: &str,
        start_date: &str,
        end_date: &str,
        sync_type: SyncType,
    ) -> Result<SyncResult>;

    /// Sync jobs for a registered customer, newest first, capped at 50.
    fn list_jobs_for_customer(&self, user_id: &str, customer_id: &str) -> Result<Vec<SyncJob>>;

    /// Stored search terms for a registered customer, newest fetch first,
    /// optionally bounded by a fetched-at window, capped at 10,000.
    fn get_stored_search_terms(
        &self,
        user_id: &str,
        customer_id: &str,
        fetched_after: Option<NaiveDateTime>,
        fetched_before: Option<NaiveDateTime>,
    ) -> Result<Vec<SearchTerm>>;
}

pub struct SearchTermSyncService {
    connections: Arc<dyn ConnectionRepositoryTrait>,
    customers: Arc<dyn CustomerServiceTrait>,
    jobs: Arc<dyn SyncJobRepositoryTrait>,
    terms: Arc<dyn SearchTermRepositoryTrait>,
    reports: Arc<dyn ReportClientTrait>,
}

impl SearchTermSyncService {
    pub fn new(
        connections: Arc<dyn ConnectionRepositoryTrait>,
        customers: Arc<dyn CustomerServiceTrait>,
        jobs: Arc<dyn SyncJobRepositoryTrait>,
        terms: Arc<dyn SearchTermRepositoryTrait>,
        reports: Arc<dyn ReportClientTrait>,
    ) -> Self {
        Self {
            connections,
            customers,
            jobs,
            terms,
            reports,
        }
    }

    fn resolve_registered_customer(
        &self,
        user_id: &str,
        customer_id: &str,
    ) -> Result<AdsCustomer> {
        self.customers
            .get_local_customer(user_id, customer_id)?
            .ok_or_else(|| {
                Error::NotFound(format!("Customer {} is not registered", customer_id))
            })
    }

    /// The always-executed failure path: records the failure on the job
    /// row and folds it into a `failed` result. A failure to record is
    /// logged; the original error still wins.
    async fn record_failure(
        &self,
        job_id: &str,
        customer: &AdsCustomer,
        customer_name: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        records_fetched: usize,
        err: Error,
    ) -> SyncResult {
        error!("Sync job {} failed: {}", job_id, err);

        let details = serde_json::json!({
            "kind": err.classification(),
            "detail": err.to_string(),
        });

        if let Err(update_err) = self
            .jobs
            .mark_failed(job_id, Utc::now().naive_utc(), &err.to_string(), details)
            .await
        {
            error!(
                "Failed to record failure on job {}: {}",
                job_id, update_err
            );
        }

        SyncResult {
            job_id: job_id.to_string(),
            customer_id: customer.customer_id.clone(),
            customer_name,
            status: SyncJobStatus::Failed,
            records_fetched,
            records_stored: 0,
            start_date,
            end_date,
            error_message: Some(err.to_string()),
        }
    }
}

#[async_trait]
impl SearchTermSyncServiceTrait for SearchTermSyncService {
    async fn sync_search_terms(
        &self,
        user_id: &str,
        customer_id: &str,
        start_date: &str,
        end_date: &str,
        sync_type: SyncType,
    ) -> Result<SyncResult> {
        let connection = self
            .connections
            .get_latest_active_by_user(user_id)?
            .ok_or_else(|| {
                Error::Unauthorized("No active Google connection found".to_string())
            })?;

        let customer = self
            .customers
            .get_or_fetch_customer(user_id, customer_id)
            .await?;

        // Rejected before any job row exists.
        let (start, end) = parse_date_range(start_date, end_date).map_err(Error::from)?;

        let job = self
            .jobs
            .create(NewSyncJob {
                ads_customer_id: customer.id.clone(),
                sync_type,
                start_date: start,
                end_date: end,
            })
            .await?;

        let customer_name = customer
            .customer_name
            .clone()
            .unwrap_or_else(|| MISSING_CUSTOMER_NAME.to_string());

        // From here on the job row exists, so every failure is recorded on
        // it instead of propagating.
        let job = match self.jobs.mark_running(&job.id, Utc::now().naive_utc()).await {
            Ok(job) => job,
            Err(err) => {
                return Ok(self
                    .record_failure(&job.id, &customer, customer_name, start, end, 0, err)
                    .await);
            }
        };

        info!(
            "Sync job {} running for customer {} ({} to {})",
            job.id, customer.customer_id, start_date, end_date
        );

        let context = CustomerContext::new(
            customer.customer_id.clone(),
            customer.login_customer_id.clone(),
            connection.refresh_token.clone(),
        );

        let mut records_fetched = 0;
        let stored = match self
            .reports
            .fetch_search_terms(&context, start_date, end_date, None, None)
            .await
        {
            Ok(batch) => {
                records_fetched = batch.records_fetched;

                // One shared fetch instant for the whole batch.
                let fetched_at = Utc::now().naive_utc();
                let rows: Vec<NewSearchTerm> = batch
                    .rows
                    .iter()
                    .map(|row| NewSearchTerm::from_row(&customer.id, row, fetched_at))
                    .collect();

                self.terms.bulk_insert(rows).await
            }
            Err(err) => Err(Error::from(err)),
        };

        let records_stored = match stored {
            Ok(count) => count,
            Err(err) => {
                return Ok(self
                    .record_failure(
                        &job.id,
                        &customer,
                        customer_name,
                        start,
                        end,
                        records_fetched,
                        err,
                    )
                    .await);
            }
        };

        let finished_at = Utc::now().naive_utc();
        if let Err(err) = self
            .jobs
            .mark_completed(&job.id, finished_at, records_stored as i64)
            .await
        {
            return Ok(self
                .record_failure(
                    &job.id,
                    &customer,
                    customer_name,
                    start,
                    end,
                    records_fetched,
                    err,
                )
                .await);
        }

        if let Err(err) = self.customers.touch_last_synced(&customer.id, finished_at).await {
            warn!(
                "Failed to advance lastSyncedAt for customer {}: {}",
                customer.id, err
            );
        }

        info!(
            "Sync job {} completed: {} fetched, {} stored",
            job.id, records_fetched, records_stored
        );

        Ok(SyncResult {
            job_id: job.id,
            customer_id: customer.customer_id,
            customer_name,
            status: SyncJobStatus::Completed,
            records_fetched,
            records_stored,
            start_date: start,
            end_date: end,
            error_message: None,
        })
    }

    fn list_jobs_for_customer(&self, user_id: &str, customer_id: &str) -> Result<Vec<SyncJob>> {
        let customer = self.resolve_registered_customer(user_id, customer_id)?;
        self.jobs.list_for_customer(&customer.id, SYNC_JOB_LIST_LIMIT)
    }

    fn get_stored_search_terms(
        &self,
        user_id: &str,
        customer_id: &str,
        fetched_after: Option<NaiveDateTime>,
        fetched_before: Option<NaiveDateTime>,
    ) -> Result<Vec<SearchTerm>> {
        let customer = self.resolve_registered_customer(user_id, customer_id)?;
        self.terms.list_for_customer(
            &customer.id,
            fetched_after,
            fetched_before,
            STORED_SEARCH_TERMS_LIMIT,
        )
    }
}
