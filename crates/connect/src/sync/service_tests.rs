#[cfg(test)]
mod tests {
    use crate::sync::{SearchTermSyncService, SearchTermSyncServiceTrait};
    use adsight_core::connections::{
        ConnectionRepositoryTrait, GoogleConnection, NewGoogleConnection,
    };
    use adsight_core::customers::{AdsCustomer, CustomerServiceTrait};
    use adsight_core::errors::{Error, Result};
    use adsight_core::search_terms::{NewSearchTerm, SearchTerm, SearchTermRepositoryTrait};
    use adsight_core::sync::{
        NewSyncJob, SyncJob, SyncJobRepositoryTrait, SyncJobStatus, SyncType,
    };
    use adsight_gads::{
        AccountInfo, AdGroupRow, CampaignRow, CustomerContext, GoogleAdsError, KeywordRow,
        ReportClientTrait, SearchTermBatch, SearchTermMetrics, SearchTermRow,
    };
    use async_trait::async_trait;
    use chrono::{NaiveDateTime, Utc};
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    fn now() -> NaiveDateTime {
        Utc::now().naive_utc()
    }

    fn connection(user_id: &str) -> GoogleConnection {
        GoogleConnection {
            id: "conn-1".to_string(),
            user_id: user_id.to_string(),
            google_email: "ads@example.com".to_string(),
            google_user_id: "google-1".to_string(),
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            token_expires_at: now(),
            scopes: vec!["https://www.googleapis.com/auth/adwords".to_string()],
            is_active: true,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn customer() -> AdsCustomer {
        AdsCustomer {
            id: "cust-row-1".to_string(),
            connection_id: "conn-1".to_string(),
            customer_id: "1234567890".to_string(),
            customer_name: Some("Demo Shop".to_string()),
            descriptive_name: Some("Demo Shop".to_string()),
            login_customer_id: "100".to_string(),
            is_manager_account: false,
            manager_customer_id: Some("100".to_string()),
            currency_code: Some("USD".to_string()),
            time_zone: Some("UTC".to_string()),
            is_active: true,
            last_synced_at: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn term_row(term: &str) -> SearchTermRow {
        SearchTermRow {
            campaign_id: "111".to_string(),
            campaign_name: "Brand".to_string(),
            ad_group_id: "222".to_string(),
            ad_group_name: "Exact".to_string(),
            search_term: term.to_string(),
            keyword: "shoes".to_string(),
            match_type: "EXACT".to_string(),
            metrics: SearchTermMetrics {
                impressions: 100,
                clicks: 10,
                cost: dec!(4.5),
                conversions: dec!(1),
                conversions_value: dec!(30),
            },
        }
    }

    // --- Mock ConnectionRepository ---
    struct MockConnectionRepository {
        connection: Option<GoogleConnection>,
    }

    #[async_trait]
    impl ConnectionRepositoryTrait for MockConnectionRepository {
        async fn upsert(&self, _new_connection: NewGoogleConnection) -> Result<GoogleConnection> {
            unimplemented!()
        }

        fn get_latest_active_by_user(&self, _user_id: &str) -> Result<Option<GoogleConnection>> {
            Ok(self.connection.clone())
        }

        fn list_active_by_user(&self, _user_id: &str) -> Result<Vec<GoogleConnection>> {
            Ok(self.connection.clone().into_iter().collect())
        }

        async fn deactivate(&self, _user_id: &str, _connection_id: &str) -> Result<usize> {
            unimplemented!()
        }
    }

    // --- Mock CustomerService ---
    #[derive(Default)]
    struct MockCustomerService {
        customer: Option<AdsCustomer>,
        touches: Mutex<Vec<NaiveDateTime>>,
    }

    #[async_trait]
    impl CustomerServiceTrait for MockCustomerService {
        async fn ensure_customer(
            &self,
            _connection_id: &str,
            _account: &AccountInfo,
        ) -> Result<AdsCustomer> {
            unimplemented!()
        }

        async fn get_or_fetch_customer(
            &self,
            _user_id: &str,
            customer_id: &str,
        ) -> Result<AdsCustomer> {
            self.customer.clone().ok_or_else(|| {
                Error::NotFound(format!(
                    "Customer {} not found in accessible accounts",
                    customer_id
                ))
            })
        }

        fn get_local_customer(
            &self,
            _user_id: &str,
            _customer_id: &str,
        ) -> Result<Option<AdsCustomer>> {
            Ok(self.customer.clone())
        }

        fn list_customers(&self, _user_id: &str) -> Result<Vec<AdsCustomer>> {
            Ok(self.customer.clone().into_iter().collect())
        }

        async fn touch_last_synced(
            &self,
            _customer_row_id: &str,
            at: NaiveDateTime,
        ) -> Result<()> {
            self.touches.lock().unwrap().push(at);
            Ok(())
        }
    }

    // --- Mock SyncJobRepository ---
    #[derive(Default)]
    struct MockJobRepository {
        jobs: Mutex<Vec<SyncJob>>,
    }

    impl MockJobRepository {
        fn rows(&self) -> Vec<SyncJob> {
            self.jobs.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SyncJobRepositoryTrait for MockJobRepository {
        async fn create(&self, new_job: NewSyncJob) -> Result<SyncJob> {
            let mut jobs = self.jobs.lock().unwrap();
            let job = SyncJob {
                id: format!("job-{}", jobs.len() + 1),
                ads_customer_id: new_job.ads_customer_id,
                status: SyncJobStatus::Pending,
                sync_type: new_job.sync_type,
                start_date: new_job.start_date,
                end_date: new_job.end_date,
                started_at: None,
                completed_at: None,
                records_processed: 0,
                error_message: None,
                error_details: None,
                created_at: now(),
                updated_at: now(),
            };
            jobs.push(job.clone());
            Ok(job)
        }

        async fn mark_running(
            &self,
            job_id: &str,
            started_at: NaiveDateTime,
        ) -> Result<SyncJob> {
            let mut jobs = self.jobs.lock().unwrap();
            let job = jobs
                .iter_mut()
                .find(|j| j.id == job_id)
                .expect("unknown job id");
            job.status = SyncJobStatus::Running;
            job.started_at = Some(started_at);
            Ok(job.clone())
        }

        async fn mark_completed(
            &self,
            job_id: &str,
            completed_at: NaiveDateTime,
            records_processed: i64,
        ) -> Result<SyncJob> {
            let mut jobs = self.jobs.lock().unwrap();
            let job = jobs
                .iter_mut()
                .find(|j| j.id == job_id)
                .expect("unknown job id");
            job.status = SyncJobStatus::Completed;
            job.completed_at = Some(completed_at);
            job.records_processed = records_processed;
            Ok(job.clone())
        }

        async fn mark_failed(
            &self,
            job_id: &str,
            completed_at: NaiveDateTime,
            error_message: &str,
            error_details: serde_json::Value,
        ) -> Result<SyncJob> {
            let mut jobs = self.jobs.lock().unwrap();
            let job = jobs
                .iter_mut()
                .find(|j| j.id == job_id)
                .expect("unknown job id");
            job.status = SyncJobStatus::Failed;
            job.completed_at = Some(completed_at);
            job.error_message = Some(error_message.to_string());
            job.error_details = Some(error_details);
            Ok(job.clone())
        }

        fn list_for_customer(&self, ads_customer_id: &str, limit: i64) -> Result<Vec<SyncJob>> {
            let jobs = self.jobs.lock().unwrap();
            Ok(jobs
                .iter()
                .filter(|j| j.ads_customer_id == ads_customer_id)
                .rev()
                .take(limit as usize)
                .cloned()
                .collect())
        }
    }

    // --- Mock SearchTermRepository ---
    #[derive(Default)]
    struct MockTermRepository {
        stored: Mutex<Vec<NewSearchTerm>>,
        fail_insert: bool,
    }

    #[async_trait]
    impl SearchTermRepositoryTrait for MockTermRepository {
        async fn bulk_insert(&self, terms: Vec<NewSearchTerm>) -> Result<usize> {
            if self.fail_insert {
                return Err(Error::Database(
                    adsight_core::errors::DatabaseError::QueryFailed("disk full".to_string()),
                ));
            }
            let count = terms.len();
            self.stored.lock().unwrap().extend(terms);
            Ok(count)
        }

        fn list_for_customer(
            &self,
            _ads_customer_id: &str,
            _fetched_after: Option<NaiveDateTime>,
            _fetched_before: Option<NaiveDateTime>,
            _limit: i64,
        ) -> Result<Vec<SearchTerm>> {
            unimplemented!()
        }
    }

    // --- Mock ReportClient ---
    #[derive(Default)]
    struct MockReportClient {
        batch: Option<SearchTermBatch>,
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl ReportClientTrait for MockReportClient {
        async fn fetch_search_terms(
            &self,
            _context: &CustomerContext,
            start_date: &str,
            end_date: &str,
            _campaign_id: Option<&str>,
            _ad_group_id: Option<&str>,
        ) -> std::result::Result<SearchTermBatch, GoogleAdsError> {
            adsight_gads::dates::validate_date_range(start_date, end_date)?;
            *self.calls.lock().unwrap() += 1;
            self.batch.clone().ok_or_else(|| GoogleAdsError::Query {
                customer_id: "1234567890".to_string(),
                message: "quota exceeded".to_string(),
            })
        }

        async fn fetch_campaigns(
            &self,
            _context: &CustomerContext,
            _date_range: Option<(&str, &str)>,
        ) -> std::result::Result<Vec<CampaignRow>, GoogleAdsError> {
            unimplemented!()
        }

        async fn fetch_ad_groups(
            &self,
            _context: &CustomerContext,
            _campaign_id: Option<&str>,
        ) -> std::result::Result<Vec<AdGroupRow>, GoogleAdsError> {
            unimplemented!()
        }

        async fn fetch_keywords(
            &self,
            _context: &CustomerContext,
            _ad_group_id: &str,
            _campaign_id: Option<&str>,
        ) -> std::result::Result<Vec<KeywordRow>, GoogleAdsError> {
            unimplemented!()
        }

        async fn fetch_campaigns_with_ad_groups(
            &self,
            _context: &CustomerContext,
            _date_range: Option<(&str, &str)>,
            _deep: bool,
        ) -> std::result::Result<Vec<CampaignRow>, GoogleAdsError> {
            unimplemented!()
        }
    }

    struct Fixture {
        service: SearchTermSyncService,
        jobs: Arc<MockJobRepository>,
        terms: Arc<MockTermRepository>,
        customers: Arc<MockCustomerService>,
        reports: Arc<MockReportClient>,
    }

    fn fixture(
        has_connection: bool,
        registered: bool,
        batch: Option<SearchTermBatch>,
        fail_insert: bool,
    ) -> Fixture {
        let jobs = Arc::new(MockJobRepository::default());
        let terms = Arc::new(MockTermRepository {
            fail_insert,
            ..Default::default()
        });
        let customers = Arc::new(MockCustomerService {
            customer: registered.then(customer),
            ..Default::default()
        });
        let reports = Arc::new(MockReportClient {
            batch,
            ..Default::default()
        });

        let service = SearchTermSyncService::new(
            Arc::new(MockConnectionRepository {
                connection: has_connection.then(|| connection("user-1")),
            }),
            customers.clone(),
            jobs.clone(),
            terms.clone(),
            reports.clone(),
        );

        Fixture {
            service,
            jobs,
            terms,
            customers,
            reports,
        }
    }

    fn good_batch() -> SearchTermBatch {
        // Three rows came back from upstream; one was dropped by row
        // validation, so only two survive to be stored.
        SearchTermBatch {
            rows: vec![term_row("red shoes"), term_row("green shoes")],
            records_fetched: 3,
        }
    }

    #[tokio::test]
    async fn completed_sync_tracks_counts_and_touches_customer() {
        let fx = fixture(true, true, Some(good_batch()), false);

        let result = fx
            .service
            .sync_search_terms("user-1", "1234567890", "2024-01-01", "2024-01-31", SyncType::Manual)
            .await
            .unwrap();

        assert_eq!(result.status, SyncJobStatus::Completed);
        assert_eq!(result.records_fetched, 3);
        assert_eq!(result.records_stored, 2);
        assert_eq!(result.customer_name, "Demo Shop");
        assert!(result.error_message.is_none());

        let jobs = fx.jobs.rows();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].status, SyncJobStatus::Completed);
        assert_eq!(jobs[0].records_processed, 2);
        assert!(jobs[0].started_at.is_some());
        assert!(jobs[0].completed_at.is_some());

        // The whole batch shares one fetch instant.
        let stored = fx.terms.stored.lock().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].fetched_at, stored[1].fetched_at);
        assert_eq!(stored[0].ads_customer_id, "cust-row-1");

        assert_eq!(fx.customers.touches.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn invalid_range_rejected_before_any_job_or_fetch() {
        let fx = fixture(true, true, Some(good_batch()), false);

        let result = fx
            .service
            .sync_search_terms("user-1", "1234567890", "2024-02-01", "2024-01-01", SyncType::Manual)
            .await;

        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(fx.jobs.rows().is_empty());
        assert_eq!(*fx.reports.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn future_end_date_rejected() {
        let fx = fixture(true, true, Some(good_batch()), false);
        let future = (Utc::now().date_naive() + chrono::Days::new(3))
            .format("%Y-%m-%d")
            .to_string();

        let result = fx
            .service
            .sync_search_terms("user-1", "1234567890", "2024-01-01", &future, SyncType::Manual)
            .await;

        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(fx.jobs.rows().is_empty());
    }

    #[tokio::test]
    async fn missing_connection_is_unauthorized() {
        let fx = fixture(false, true, Some(good_batch()), false);

        let result = fx
            .service
            .sync_search_terms("user-1", "1234567890", "2024-01-01", "2024-01-31", SyncType::Manual)
            .await;

        assert!(matches!(result, Err(Error::Unauthorized(_))));
        assert!(fx.jobs.rows().is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_is_recorded_not_thrown() {
        let fx = fixture(true, true, None, false);

        let result = fx
            .service
            .sync_search_terms("user-1", "1234567890", "2024-01-01", "2024-01-31", SyncType::Manual)
            .await
            .unwrap();

        assert_eq!(result.status, SyncJobStatus::Failed);
        assert_eq!(result.records_stored, 0);
        assert!(result.error_message.as_deref().unwrap().contains("quota exceeded"));

        let jobs = fx.jobs.rows();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].status, SyncJobStatus::Failed);
        assert!(jobs[0].completed_at.is_some());
        let details = jobs[0].error_details.clone().unwrap();
        assert_eq!(details["kind"], serde_json::json!("query"));

        assert!(fx.customers.touches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn persistence_failure_keeps_fetched_count() {
        let fx = fixture(true, true, Some(good_batch()), true);

        let result = fx
            .service
            .sync_search_terms("user-1", "1234567890", "2024-01-01", "2024-01-31", SyncType::Manual)
            .await
            .unwrap();

        assert_eq!(result.status, SyncJobStatus::Failed);
        assert_eq!(result.records_fetched, 3);
        assert_eq!(result.records_stored, 0);
        assert_eq!(fx.jobs.rows()[0].status, SyncJobStatus::Failed);
    }

    #[tokio::test]
    async fn stored_queries_require_a_registered_customer() {
        let fx = fixture(true, false, None, false);

        assert!(matches!(
            fx.service.list_jobs_for_customer("user-1", "1234567890"),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            fx.service
                .get_stored_search_terms("user-1", "1234567890", None, None),
            Err(Error::NotFound(_))
        ));
    }
}
