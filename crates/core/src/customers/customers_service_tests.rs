#[cfg(test)]
mod tests {
    use crate::connections::{ConnectionRepositoryTrait, GoogleConnection, NewGoogleConnection};
    use crate::customers::{
        AdsCustomer, CustomerRepositoryTrait, CustomerService, CustomerServiceTrait,
        NewAdsCustomer,
    };
    use crate::errors::{Error, Result};
    use adsight_gads::{AccountInfo, AccountResolverTrait, GoogleAdsError};
    use async_trait::async_trait;
    use chrono::NaiveDateTime;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn now() -> NaiveDateTime {
        chrono::Utc::now().naive_utc()
    }

    fn account(customer_id: &str, login: &str) -> AccountInfo {
        AccountInfo {
            customer_id: customer_id.to_string(),
            customer_name: format!("Account {}", customer_id),
            descriptive_name: format!("Account {}", customer_id),
            currency_code: "USD".to_string(),
            time_zone: "UTC".to_string(),
            is_manager_account: false,
            can_manage_clients: false,
            login_customer_id: login.to_string(),
            manager_customer_id: if login == customer_id {
                None
            } else {
                Some(login.to_string())
            },
        }
    }

    fn connection(id: &str, user_id: &str) -> GoogleConnection {
        GoogleConnection {
            id: id.to_string(),
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

    // --- Mock ConnectionRepository ---
    #[derive(Default)]
    struct MockConnectionRepository {
        connections: Mutex<Vec<GoogleConnection>>,
    }

    impl MockConnectionRepository {
        fn with_connection(connection: GoogleConnection) -> Self {
            Self {
                connections: Mutex::new(vec![connection]),
            }
        }
    }

    #[async_trait]
    impl ConnectionRepositoryTrait for MockConnectionRepository {
        async fn upsert(&self, _new_connection: NewGoogleConnection) -> Result<GoogleConnection> {
            unimplemented!()
        }

        fn get_latest_active_by_user(&self, user_id: &str) -> Result<Option<GoogleConnection>> {
            Ok(self
                .connections
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.user_id == user_id && c.is_active)
                .cloned())
        }

        fn list_active_by_user(&self, user_id: &str) -> Result<Vec<GoogleConnection>> {
            Ok(self
                .connections
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.user_id == user_id && c.is_active)
                .cloned()
                .collect())
        }

        async fn deactivate(&self, _user_id: &str, _connection_id: &str) -> Result<usize> {
            unimplemented!()
        }
    }

    // --- Mock CustomerRepository ---
    #[derive(Default)]
    struct MockCustomerRepository {
        customers: Mutex<Vec<AdsCustomer>>,
    }

    impl MockCustomerRepository {
        fn rows(&self) -> Vec<AdsCustomer> {
            self.customers.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CustomerRepositoryTrait for MockCustomerRepository {
        async fn upsert(&self, new_customer: NewAdsCustomer) -> Result<AdsCustomer> {
            let mut customers = self.customers.lock().unwrap();

            if let Some(existing) = customers.iter_mut().find(|c| {
                c.connection_id == new_customer.connection_id
                    && c.customer_id == new_customer.customer_id
            }) {
                existing.customer_name = new_customer.customer_name;
                existing.descriptive_name = new_customer.descriptive_name;
                existing.login_customer_id = new_customer.login_customer_id;
                existing.is_manager_account = new_customer.is_manager_account;
                existing.manager_customer_id = new_customer.manager_customer_id;
                existing.currency_code = new_customer.currency_code;
                existing.time_zone = new_customer.time_zone;
                existing.updated_at = now();
                return Ok(existing.clone());
            }

            let customer = AdsCustomer {
                id: format!("row-{}", customers.len() + 1),
                connection_id: new_customer.connection_id,
                customer_id: new_customer.customer_id,
                customer_name: new_customer.customer_name,
                descriptive_name: new_customer.descriptive_name,
                login_customer_id: new_customer.login_customer_id,
                is_manager_account: new_customer.is_manager_account,
                manager_customer_id: new_customer.manager_customer_id,
                currency_code: new_customer.currency_code,
                time_zone: new_customer.time_zone,
                is_active: new_customer.is_active,
                last_synced_at: None,
                created_at: now(),
                updated_at: now(),
            };
            customers.push(customer.clone());
            Ok(customer)
        }

        fn get_by_customer_id(
            &self,
            connection_id: &str,
            customer_id: &str,
        ) -> Result<Option<AdsCustomer>> {
            Ok(self
                .customers
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.connection_id == connection_id && c.customer_id == customer_id)
                .cloned())
        }

        fn list_by_connection(&self, connection_id: &str) -> Result<Vec<AdsCustomer>> {
            Ok(self
                .customers
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.connection_id == connection_id)
                .cloned()
                .collect())
        }

        fn list_by_user(&self, _user_id: &str) -> Result<Vec<AdsCustomer>> {
            Ok(self.customers.lock().unwrap().clone())
        }

        async fn touch_last_synced(
            &self,
            customer_row_id: &str,
            at: NaiveDateTime,
        ) -> Result<()> {
            let mut customers = self.customers.lock().unwrap();
            if let Some(customer) = customers.iter_mut().find(|c| c.id == customer_row_id) {
                customer.last_synced_at = Some(at);
            }
            Ok(())
        }
    }

    // --- Mock AccountResolver ---
    struct MockResolver {
        accounts: Vec<AccountInfo>,
        calls: AtomicUsize,
    }

    impl MockResolver {
        fn new(accounts: Vec<AccountInfo>) -> Self {
            Self {
                accounts,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AccountResolverTrait for MockResolver {
        async fn get_accessible_accounts(
            &self,
            _refresh_token: &str,
        ) -> std::result::Result<Vec<AccountInfo>, GoogleAdsError> {
            Ok(self.accounts.clone())
        }

        async fn get_accessible_accounts_full(
            &self,
            _refresh_token: &str,
        ) -> std::result::Result<Vec<AccountInfo>, GoogleAdsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.accounts.clone())
        }

        async fn get_managed_accounts(
            &self,
            _mcc_customer_id: &str,
            _refresh_token: &str,
        ) -> std::result::Result<Vec<AccountInfo>, GoogleAdsError> {
            unimplemented!()
        }
    }

    fn service(
        repository: Arc<MockCustomerRepository>,
        connections: Arc<MockConnectionRepository>,
        resolver: Arc<MockResolver>,
    ) -> CustomerService {
        CustomerService::new(repository, connections, resolver)
    }

    #[tokio::test]
    async fn ensure_customer_is_idempotent_and_updates_metadata() {
        let repository = Arc::new(MockCustomerRepository::default());
        let connections = Arc::new(MockConnectionRepository::default());
        let resolver = Arc::new(MockResolver::new(vec![]));
        let service = service(repository.clone(), connections, resolver);

        let first = service
            .ensure_customer("conn-1", &account("1234567890", "100"))
            .await
            .unwrap();

        let mut renamed = account("1234567890", "100");
        renamed.descriptive_name = "Renamed Account".to_string();
        let second = service.ensure_customer("conn-1", &renamed).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(repository.rows().len(), 1);
        assert_eq!(
            repository.rows()[0].descriptive_name.as_deref(),
            Some("Renamed Account")
        );
    }

    #[tokio::test]
    async fn get_or_fetch_returns_local_row_without_resolving() {
        let repository = Arc::new(MockCustomerRepository::default());
        let connections = Arc::new(MockConnectionRepository::with_connection(connection(
            "conn-1", "user-1",
        )));
        let resolver = Arc::new(MockResolver::new(vec![account("1234567890", "100")]));
        let service = service(repository.clone(), connections, resolver.clone());

        service
            .ensure_customer("conn-1", &account("1234567890", "100"))
            .await
            .unwrap();

        let customer = service
            .get_or_fetch_customer("user-1", "1234567890")
            .await
            .unwrap();

        assert_eq!(customer.customer_id, "1234567890");
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn get_or_fetch_materializes_unseen_customer() {
        let repository = Arc::new(MockCustomerRepository::default());
        let connections = Arc::new(MockConnectionRepository::with_connection(connection(
            "conn-1", "user-1",
        )));
        let resolver = Arc::new(MockResolver::new(vec![account("1234567890", "100")]));
        let service = service(repository.clone(), connections, resolver.clone());

        // Dashed input resolves to the same digits-only id.
        let customer = service
            .get_or_fetch_customer("user-1", "123-456-7890")
            .await
            .unwrap();

        assert_eq!(customer.customer_id, "1234567890");
        assert_eq!(customer.login_customer_id, "100");
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
        assert_eq!(repository.rows().len(), 1);
    }

    #[tokio::test]
    async fn get_local_customer_never_resolves_upstream() {
        let repository = Arc::new(MockCustomerRepository::default());
        let connections = Arc::new(MockConnectionRepository::with_connection(connection(
            "conn-1", "user-1",
        )));
        let resolver = Arc::new(MockResolver::new(vec![account("1234567890", "100")]));
        let service = service(repository, connections, resolver.clone());

        let missing = service.get_local_customer("user-1", "1234567890").unwrap();
        assert!(missing.is_none());

        service
            .ensure_customer("conn-1", &account("1234567890", "100"))
            .await
            .unwrap();

        let found = service.get_local_customer("user-1", "123-456-7890").unwrap();
        assert_eq!(found.unwrap().customer_id, "1234567890");
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn get_or_fetch_without_connection_is_unauthorized() {
        let repository = Arc::new(MockCustomerRepository::default());
        let connections = Arc::new(MockConnectionRepository::default());
        let resolver = Arc::new(MockResolver::new(vec![]));
        let service = service(repository, connections, resolver);

        let result = service.get_or_fetch_customer("user-1", "1234567890").await;
        assert!(matches!(result, Err(Error::Unauthorized(_))));
    }

    #[tokio::test]
    async fn get_or_fetch_unknown_account_is_not_found() {
        let repository = Arc::new(MockCustomerRepository::default());
        let connections = Arc::new(MockConnectionRepository::with_connection(connection(
            "conn-1", "user-1",
        )));
        let resolver = Arc::new(MockResolver::new(vec![account("9999999999", "100")]));
        let service = service(repository.clone(), connections, resolver);

        let result = service.get_or_fetch_customer("user-1", "1234567890").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
        assert!(repository.rows().is_empty());
    }
}
