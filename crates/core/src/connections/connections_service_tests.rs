#[cfg(test)]
mod tests {
    use crate::connections::{
        ConnectionRepositoryTrait, ConnectionService, ConnectionServiceTrait, GoogleConnection,
        GoogleProfile, NewGoogleConnection, OauthExchangeTrait, TokenSet,
    };
    use crate::customers::{AdsCustomer, CustomerServiceTrait};
    use crate::errors::{Error, Result};
    use crate::identity::{IdentityProviderTrait, UserProfile};
    use adsight_gads::{AccountInfo, AccountResolverTrait, GoogleAdsError};
    use async_trait::async_trait;
    use chrono::{NaiveDateTime, Utc};
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    fn now() -> NaiveDateTime {
        Utc::now().naive_utc()
    }

    fn account(customer_id: &str) -> AccountInfo {
        AccountInfo {
            customer_id: customer_id.to_string(),
            customer_name: format!("Account {}", customer_id),
            descriptive_name: format!("Account {}", customer_id),
            currency_code: "USD".to_string(),
            time_zone: "UTC".to_string(),
            is_manager_account: false,
            can_manage_clients: false,
            login_customer_id: customer_id.to_string(),
            manager_customer_id: None,
        }
    }

    // --- Mock ConnectionRepository ---
    #[derive(Default)]
    struct MockConnectionRepository {
        connections: Mutex<Vec<GoogleConnection>>,
    }

    impl MockConnectionRepository {
        fn rows(&self) -> Vec<GoogleConnection> {
            self.connections.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ConnectionRepositoryTrait for MockConnectionRepository {
        async fn upsert(&self, new_connection: NewGoogleConnection) -> Result<GoogleConnection> {
            let mut connections = self.connections.lock().unwrap();

            if let Some(existing) = connections.iter_mut().find(|c| {
                c.user_id == new_connection.user_id
                    && c.google_user_id == new_connection.google_user_id
            }) {
                existing.access_token = new_connection.access_token;
                if let Some(refresh_token) = new_connection.refresh_token {
                    existing.refresh_token = refresh_token;
                }
                existing.token_expires_at = new_connection.token_expires_at;
                existing.scopes = new_connection.scopes;
                existing.is_active = true;
                existing.updated_at = now();
                return Ok(existing.clone());
            }

            let refresh_token = new_connection.refresh_token.ok_or_else(|| {
                Error::Validation(crate::errors::ValidationError::MissingField(
                    "refreshToken".to_string(),
                ))
            })?;

            let connection = GoogleConnection {
                id: format!("conn-{}", connections.len() + 1),
                user_id: new_connection.user_id,
                google_email: new_connection.google_email,
                google_user_id: new_connection.google_user_id,
                access_token: new_connection.access_token,
                refresh_token,
                token_expires_at: new_connection.token_expires_at,
                scopes: new_connection.scopes,
                is_active: true,
                created_at: now(),
                updated_at: now(),
            };
            connections.push(connection.clone());
            Ok(connection)
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

        async fn deactivate(&self, user_id: &str, connection_id: &str) -> Result<usize> {
            let mut connections = self.connections.lock().unwrap();
            let mut count = 0;
            for connection in connections.iter_mut() {
                if connection.user_id == user_id && connection.id == connection_id {
                    connection.is_active = false;
                    count += 1;
                }
            }
            Ok(count)
        }
    }

    // --- Mock IdentityProvider ---
    struct MockIdentity {
        known_users: HashSet<String>,
    }

    impl MockIdentity {
        fn knowing(user_ids: &[&str]) -> Self {
            Self {
                known_users: user_ids.iter().map(|id| id.to_string()).collect(),
            }
        }
    }

    #[async_trait]
    impl IdentityProviderTrait for MockIdentity {
        async fn validate_user(&self, user_id: &str) -> Result<UserProfile> {
            if self.known_users.contains(user_id) {
                Ok(UserProfile {
                    id: user_id.to_string(),
                    email: Some("user@example.com".to_string()),
                    created_at: Some(Utc::now()),
                })
            } else {
                Err(Error::NotFound(format!("User {} does not exist", user_id)))
            }
        }
    }

    // --- Mock OauthExchange ---
    struct MockOauth {
        refresh_token: Option<String>,
    }

    #[async_trait]
    impl OauthExchangeTrait for MockOauth {
        async fn exchange_code(&self, _code: &str) -> Result<(TokenSet, GoogleProfile)> {
            Ok((
                TokenSet {
                    access_token: "access-token".to_string(),
                    refresh_token: self.refresh_token.clone(),
                    expires_at: Utc::now() + chrono::Duration::hours(1),
                    scopes: vec!["https://www.googleapis.com/auth/adwords".to_string()],
                },
                GoogleProfile {
                    id: "google-user-1".to_string(),
                    email: "ads@example.com".to_string(),
                    name: Some("Ads Person".to_string()),
                },
            ))
        }

        async fn refresh(&self, _refresh_token: &str) -> Result<TokenSet> {
            unimplemented!()
        }
    }

    // --- Mock AccountResolver ---
    struct MockResolver {
        accounts: Vec<AccountInfo>,
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

    // --- Mock CustomerService ---
    #[derive(Default)]
    struct MockCustomerService {
        registered: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CustomerServiceTrait for MockCustomerService {
        async fn ensure_customer(
            &self,
            connection_id: &str,
            account: &AccountInfo,
        ) -> Result<AdsCustomer> {
            self.registered
                .lock()
                .unwrap()
                .push(account.customer_id.clone());
            Ok(AdsCustomer {
                id: format!("row-{}", account.customer_id),
                connection_id: connection_id.to_string(),
                customer_id: account.customer_id.clone(),
                customer_name: Some(account.customer_name.clone()),
                descriptive_name: Some(account.descriptive_name.clone()),
                login_customer_id: account.login_customer_id.clone(),
                is_manager_account: account.is_manager_account,
                manager_customer_id: account.manager_customer_id.clone(),
                currency_code: Some(account.currency_code.clone()),
                time_zone: Some(account.time_zone.clone()),
                is_active: true,
                last_synced_at: None,
                created_at: now(),
                updated_at: now(),
            })
        }

        async fn get_or_fetch_customer(
            &self,
            _user_id: &str,
            _customer_id: &str,
        ) -> Result<AdsCustomer> {
            unimplemented!()
        }

        fn get_local_customer(
            &self,
            _user_id: &str,
            _customer_id: &str,
        ) -> Result<Option<AdsCustomer>> {
            unimplemented!()
        }

        fn list_customers(&self, _user_id: &str) -> Result<Vec<AdsCustomer>> {
            unimplemented!()
        }

        async fn touch_last_synced(
            &self,
            _customer_row_id: &str,
            _at: NaiveDateTime,
        ) -> Result<()> {
            unimplemented!()
        }
    }

    fn service(
        repository: Arc<MockConnectionRepository>,
        identity: MockIdentity,
        oauth: MockOauth,
        accounts: Vec<AccountInfo>,
        customers: Arc<MockCustomerService>,
    ) -> ConnectionService {
        ConnectionService::new(
            repository,
            Arc::new(identity),
            Arc::new(oauth),
            Arc::new(MockResolver { accounts }),
            customers,
        )
    }

    #[tokio::test]
    async fn callback_links_account_and_registers_customers() {
        let repository = Arc::new(MockConnectionRepository::default());
        let customers = Arc::new(MockCustomerService::default());
        let service = service(
            repository.clone(),
            MockIdentity::knowing(&["user-1"]),
            MockOauth {
                refresh_token: Some("refresh-token".to_string()),
            },
            vec![account("100"), account("200")],
            customers.clone(),
        );

        let outcome = service.handle_oauth_callback("auth-code", "user-1").await.unwrap();

        assert_eq!(outcome.accounts_connected, 2);
        assert_eq!(outcome.connection.google_user_id, "google-user-1");
        assert_eq!(repository.rows().len(), 1);
        assert_eq!(
            customers.registered.lock().unwrap().as_slice(),
            ["100", "200"]
        );
    }

    #[tokio::test]
    async fn callback_for_unknown_user_is_rejected_before_exchange() {
        let repository = Arc::new(MockConnectionRepository::default());
        let service = service(
            repository.clone(),
            MockIdentity::knowing(&[]),
            MockOauth {
                refresh_token: Some("refresh-token".to_string()),
            },
            vec![],
            Arc::new(MockCustomerService::default()),
        );

        let result = service.handle_oauth_callback("auth-code", "ghost").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
        assert!(repository.rows().is_empty());
    }

    #[tokio::test]
    async fn reauthorization_keeps_stored_refresh_token() {
        let repository = Arc::new(MockConnectionRepository::default());
        let customers = Arc::new(MockCustomerService::default());

        // First grant carries a refresh token.
        let first = service(
            repository.clone(),
            MockIdentity::knowing(&["user-1"]),
            MockOauth {
                refresh_token: Some("original-refresh".to_string()),
            },
            vec![],
            customers.clone(),
        );
        first.handle_oauth_callback("code-1", "user-1").await.unwrap();

        // Repeat consent omits the refresh token; the stored one survives.
        let second = service(
            repository.clone(),
            MockIdentity::knowing(&["user-1"]),
            MockOauth {
                refresh_token: None,
            },
            vec![],
            customers,
        );
        second.handle_oauth_callback("code-2", "user-1").await.unwrap();

        let rows = repository.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].refresh_token, "original-refresh");
        assert_eq!(rows[0].access_token, "access-token");
    }

    #[tokio::test]
    async fn disconnect_unknown_connection_is_not_found() {
        let repository = Arc::new(MockConnectionRepository::default());
        let service = service(
            repository,
            MockIdentity::knowing(&["user-1"]),
            MockOauth {
                refresh_token: None,
            },
            vec![],
            Arc::new(MockCustomerService::default()),
        );

        let result = service.disconnect("user-1", "missing").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
