//! Account discovery and manager (MCC) delegation.
//!
//! Resolution turns a bare refresh token into the set of advertiser
//! accounts the credential can act on, each with the `login_customer_id`
//! required to query it:
//! - manager accounts authenticate as themselves,
//! - client accounts authenticate as a manager when one is in scope,
//! - self-service accounts with no manager authenticate as themselves.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, warn};

use crate::api::{CustomerContext, GoogleAdsApi};
use crate::errors::GoogleAdsError;
use crate::models::AccountInfo;
use crate::queries;

const DEFAULT_NAME: &str = "Unnamed";
const DEFAULT_CURRENCY: &str = "USD";
const DEFAULT_TIME_ZONE: &str = "UTC";

/// Account resolution operations.
#[async_trait]
pub trait AccountResolverTrait: Send + Sync {
    /// Accounts directly accessible to the credential, with delegation
    /// resolved. Zero accessible accounts is an empty list, not an error.
    async fn get_accessible_accounts(
        &self,
        refresh_token: &str,
    ) -> Result<Vec<AccountInfo>, GoogleAdsError>;

    /// The directly accessible accounts plus the full client roster of
    /// every discovered manager, deduplicated. A direct-access entry always
    /// wins over a hierarchy entry with the same id.
    async fn get_accessible_accounts_full(
        &self,
        refresh_token: &str,
    ) -> Result<Vec<AccountInfo>, GoogleAdsError>;

    /// The client roster of one manager account, including suspended,
    /// closed and canceled accounts but excluding hidden ones.
    async fn get_managed_accounts(
        &self,
        mcc_customer_id: &str,
        refresh_token: &str,
    ) -> Result<Vec<AccountInfo>, GoogleAdsError>;
}

/// Metadata of one accessible customer before delegation is assigned.
struct CustomerMeta {
    customer_id: String,
    descriptive_name: String,
    currency_code: String,
    time_zone: String,
    is_manager: bool,
}

/// Resolver over a [`GoogleAdsApi`] transport.
pub struct AccountResolver {
    api: Arc<dyn GoogleAdsApi>,
}

impl AccountResolver {
    pub fn new(api: Arc<dyn GoogleAdsApi>) -> Self {
        Self { api }
    }

    /// Fetches display metadata for one accessible customer, querying it
    /// under its own login context (always permitted for metadata).
    async fn fetch_customer_meta(
        &self,
        customer_id: &str,
        refresh_token: &str,
    ) -> Result<Option<CustomerMeta>, GoogleAdsError> {
        let context = CustomerContext::new(customer_id, customer_id, refresh_token);
        let rows = self
            .api
            .search(&context, &queries::customer_metadata(customer_id))
            .await?;

        let customer = match rows.into_iter().next().and_then(|row| row.customer) {
            Some(c) => c,
            None => return Ok(None),
        };

        let id = match customer.id {
            Some(id) if !id.is_empty() => id,
            _ => return Ok(None),
        };

        let name = customer
            .descriptive_name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_NAME.to_string());

        Ok(Some(CustomerMeta {
            customer_id: id,
            descriptive_name: name,
            currency_code: customer
                .currency_code
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            time_zone: customer
                .time_zone
                .unwrap_or_else(|| DEFAULT_TIME_ZONE.to_string()),
            is_manager: customer.manager.unwrap_or(false),
        }))
    }
}

#[async_trait]
impl AccountResolverTrait for AccountResolver {
    async fn get_accessible_accounts(
        &self,
        refresh_token: &str,
    ) -> Result<Vec<AccountInfo>, GoogleAdsError> {
        let resource_names = self.api.list_accessible_customers(refresh_token).await?;
        if resource_names.is_empty() {
            return Ok(Vec::new());
        }

        let customer_ids: Vec<String> = resource_names
            .iter()
            .filter_map(|name| name.rsplit('/').next())
            .map(str::to_string)
            .collect();

        // Pass 1: metadata for every accessible customer, fanned out
        // concurrently. One failed lookup drops that account; every lookup
        // failing escalates.
        let lookups = join_all(
            customer_ids
                .iter()
                .map(|id| self.fetch_customer_meta(id, refresh_token)),
        )
        .await;

        let mut metas: Vec<CustomerMeta> = Vec::new();
        let mut last_error: Option<GoogleAdsError> = None;

        for (customer_id, lookup) in customer_ids.iter().zip(lookups) {
            match lookup {
                Ok(Some(meta)) => metas.push(meta),
                Ok(None) => {
                    warn!(%customer_id, "metadata lookup returned no customer row");
                }
                Err(err) => {
                    warn!(%customer_id, error = %err, "metadata lookup failed");
                    last_error = Some(err);
                }
            }
        }

        if metas.is_empty() {
            if let Some(err) = last_error {
                return Err(err);
            }
            return Ok(Vec::new());
        }

        debug!(
            resolved = metas.len(),
            accessible = customer_ids.len(),
            "resolved customer metadata"
        );

        // Pick a single manager deterministically (first encountered) to
        // act as login context for client accounts with no explicit
        // manager link. Multiple MCCs can be disambiguated by the UI later.
        let fallback_manager_id = metas
            .iter()
            .find(|m| m.is_manager)
            .map(|m| m.customer_id.clone());

        // Pass 2: attach login_customer_id and manager_customer_id.
        Ok(metas
            .into_iter()
            .map(|meta| {
                let login_customer_id = if meta.is_manager {
                    meta.customer_id.clone()
                } else {
                    fallback_manager_id
                        .clone()
                        .unwrap_or_else(|| meta.customer_id.clone())
                };

                let manager_customer_id = if meta.is_manager {
                    None
                } else {
                    fallback_manager_id.clone()
                };

                AccountInfo {
                    customer_id: meta.customer_id,
                    customer_name: meta.descriptive_name.clone(),
                    descriptive_name: meta.descriptive_name,
                    currency_code: meta.currency_code,
                    time_zone: meta.time_zone,
                    is_manager_account: meta.is_manager,
                    can_manage_clients: meta.is_manager,
                    login_customer_id,
                    manager_customer_id,
                }
            })
            .collect())
    }

    async fn get_accessible_accounts_full(
        &self,
        refresh_token: &str,
    ) -> Result<Vec<AccountInfo>, GoogleAdsError> {
        let direct = self.get_accessible_accounts(refresh_token).await?;

        let manager_ids: Vec<String> = direct
            .iter()
            .filter(|a| a.is_manager_account)
            .map(|a| a.customer_id.clone())
            .collect();

        if manager_ids.is_empty() {
            return Ok(direct);
        }

        let rosters = join_all(
            manager_ids
                .iter()
                .map(|mcc| self.get_managed_accounts(mcc, refresh_token)),
        )
        .await;

        let mut seen: HashSet<String> = direct.iter().map(|a| a.customer_id.clone()).collect();
        let mut merged = direct;

        for (mcc, roster) in manager_ids.iter().zip(rosters) {
            match roster {
                Ok(accounts) => {
                    for account in accounts {
                        // Direct-access entries take precedence.
                        if seen.insert(account.customer_id.clone()) {
                            merged.push(account);
                        }
                    }
                }
                Err(err) => {
                    warn!(mcc_customer_id = %mcc, error = %err, "managed-accounts lookup failed");
                }
            }
        }

        Ok(merged)
    }

    async fn get_managed_accounts(
        &self,
        mcc_customer_id: &str,
        refresh_token: &str,
    ) -> Result<Vec<AccountInfo>, GoogleAdsError> {
        let mcc = queries::normalize_customer_id(mcc_customer_id);
        let context = CustomerContext::new(mcc.clone(), mcc.clone(), refresh_token);

        let rows = self.api.search(&context, &queries::managed_clients()).await?;

        let mut accounts = Vec::new();
        for row in rows {
            let client = match row.customer_client {
                Some(c) => c,
                None => continue,
            };

            let customer_id = match client.id {
                Some(id) if !id.is_empty() => id,
                _ => continue,
            };

            // The roster includes the manager itself at level 0.
            if customer_id == mcc {
                continue;
            }

            let is_manager = client.manager.unwrap_or(false);
            let name = client
                .descriptive_name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| DEFAULT_NAME.to_string());

            accounts.push(AccountInfo {
                customer_id: customer_id.clone(),
                customer_name: name.clone(),
                descriptive_name: name,
                currency_code: client
                    .currency_code
                    .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
                time_zone: client
                    .time_zone
                    .unwrap_or_else(|| DEFAULT_TIME_ZONE.to_string()),
                is_manager_account: is_manager,
                can_manage_clients: is_manager,
                login_customer_id: if is_manager { customer_id } else { mcc.clone() },
                manager_customer_id: if is_manager { None } else { Some(mcc.clone()) },
            });
        }

        debug!(
            mcc_customer_id = %mcc,
            clients = accounts.len(),
            "listed managed accounts"
        );

        Ok(accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{RawCustomer, RawCustomerClient, SearchRow};
    use std::collections::HashMap;

    /// In-memory transport: metadata keyed by customer id, rosters keyed by
    /// manager id, and a set of ids whose metadata lookup should fail.
    #[derive(Default)]
    struct MockApi {
        accessible: Vec<String>,
        metas: HashMap<String, RawCustomer>,
        failing: HashSet<String>,
        rosters: HashMap<String, Vec<RawCustomerClient>>,
    }

    impl MockApi {
        fn with_customer(mut self, id: &str, name: &str, manager: bool) -> Self {
            self.accessible.push(format!("customers/{}", id));
            self.metas.insert(
                id.to_string(),
                RawCustomer {
                    id: Some(id.to_string()),
                    descriptive_name: Some(name.to_string()),
                    currency_code: Some("EUR".to_string()),
                    time_zone: Some("Europe/Berlin".to_string()),
                    manager: Some(manager),
                    test_account: Some(false),
                },
            );
            self
        }

        fn with_failing(mut self, id: &str) -> Self {
            self.accessible.push(format!("customers/{}", id));
            self.failing.insert(id.to_string());
            self
        }

        fn with_roster(mut self, mcc: &str, clients: Vec<RawCustomerClient>) -> Self {
            self.rosters.insert(mcc.to_string(), clients);
            self
        }
    }

    fn roster_client(id: &str, status: &str) -> RawCustomerClient {
        RawCustomerClient {
            id: Some(id.to_string()),
            descriptive_name: Some(format!("Client {}", id)),
            currency_code: Some("USD".to_string()),
            time_zone: Some("UTC".to_string()),
            manager: Some(false),
            level: Some("1".to_string()),
            status: Some(status.to_string()),
            hidden: Some(false),
        }
    }

    #[async_trait]
    impl GoogleAdsApi for MockApi {
        async fn list_accessible_customers(
            &self,
            _refresh_token: &str,
        ) -> Result<Vec<String>, GoogleAdsError> {
            Ok(self.accessible.clone())
        }

        async fn search(
            &self,
            context: &CustomerContext,
            query: &str,
        ) -> Result<Vec<SearchRow>, GoogleAdsError> {
            if self.failing.contains(&context.customer_id) {
                return Err(GoogleAdsError::Query {
                    customer_id: context.customer_id.clone(),
                    message: "boom".to_string(),
                });
            }

            if query.contains("FROM customer_client") {
                let clients = self
                    .rosters
                    .get(&context.customer_id)
                    .cloned()
                    .unwrap_or_default();
                return Ok(clients
                    .into_iter()
                    .map(|client| SearchRow {
                        customer_client: Some(client),
                        ..Default::default()
                    })
                    .collect());
            }

            Ok(self
                .metas
                .get(&context.customer_id)
                .cloned()
                .map(|customer| SearchRow {
                    customer: Some(customer),
                    ..Default::default()
                })
                .into_iter()
                .collect())
        }
    }

    fn resolver(api: MockApi) -> AccountResolver {
        AccountResolver::new(Arc::new(api))
    }

    #[tokio::test]
    async fn zero_accessible_accounts_is_empty_not_error() {
        let accounts = resolver(MockApi::default())
            .get_accessible_accounts("token")
            .await
            .unwrap();
        assert!(accounts.is_empty());
    }

    #[tokio::test]
    async fn non_managers_fall_back_to_first_manager() {
        let api = MockApi::default()
            .with_customer("100", "Agency MCC", true)
            .with_customer("200", "Shop A", false)
            .with_customer("300", "Shop B", false);

        let accounts = resolver(api).get_accessible_accounts("token").await.unwrap();
        assert_eq!(accounts.len(), 3);

        let mcc = accounts.iter().find(|a| a.customer_id == "100").unwrap();
        assert!(mcc.is_manager_account);
        assert_eq!(mcc.login_customer_id, "100");
        assert_eq!(mcc.manager_customer_id, None);

        for id in ["200", "300"] {
            let client = accounts.iter().find(|a| a.customer_id == id).unwrap();
            assert_eq!(client.login_customer_id, "100");
            assert_eq!(client.manager_customer_id.as_deref(), Some("100"));
        }
    }

    #[tokio::test]
    async fn self_service_account_logs_in_as_itself() {
        let api = MockApi::default().with_customer("200", "Solo Shop", false);

        let accounts = resolver(api).get_accessible_accounts("token").await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].login_customer_id, "200");
        assert_eq!(accounts[0].manager_customer_id, None);
    }

    #[tokio::test]
    async fn failed_metadata_lookup_drops_only_that_account() {
        let api = MockApi::default()
            .with_customer("200", "Shop A", false)
            .with_failing("300");

        let accounts = resolver(api).get_accessible_accounts("token").await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].customer_id, "200");
    }

    #[tokio::test]
    async fn all_metadata_lookups_failing_escalates() {
        let api = MockApi::default().with_failing("200").with_failing("300");

        let result = resolver(api).get_accessible_accounts("token").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn managed_accounts_include_suspended_and_skip_self() {
        let api = MockApi::default().with_roster(
            "100",
            vec![
                RawCustomerClient {
                    id: Some("100".to_string()),
                    level: Some("0".to_string()),
                    ..Default::default()
                },
                roster_client("400", "ENABLED"),
                roster_client("500", "SUSPENDED"),
            ],
        );

        let accounts = resolver(api)
            .get_managed_accounts("100", "token")
            .await
            .unwrap();

        let ids: Vec<&str> = accounts.iter().map(|a| a.customer_id.as_str()).collect();
        assert_eq!(ids, vec!["400", "500"]);
        for account in &accounts {
            assert_eq!(account.login_customer_id, "100");
            assert_eq!(account.manager_customer_id.as_deref(), Some("100"));
        }
    }

    #[tokio::test]
    async fn full_resolution_prefers_direct_entries_on_overlap() {
        let api = MockApi::default()
            .with_customer("100", "Agency MCC", true)
            .with_customer("400", "Directly Shared Shop", false)
            .with_roster(
                "100",
                vec![roster_client("400", "ENABLED"), roster_client("500", "CLOSED")],
            );

        let accounts = resolver(api)
            .get_accessible_accounts_full("token")
            .await
            .unwrap();

        let ids: Vec<&str> = accounts.iter().map(|a| a.customer_id.as_str()).collect();
        assert_eq!(ids, vec!["100", "400", "500"]);

        // The direct-access version of 400 keeps its own metadata.
        let shared = accounts.iter().find(|a| a.customer_id == "400").unwrap();
        assert_eq!(shared.descriptive_name, "Directly Shared Shop");
        assert_eq!(shared.currency_code, "EUR");

        // 500 is only reachable through the hierarchy.
        let hierarchy_only = accounts.iter().find(|a| a.customer_id == "500").unwrap();
        assert_eq!(hierarchy_only.login_customer_id, "100");
    }
}
