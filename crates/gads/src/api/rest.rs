//! Reqwest-based implementation of [`GoogleAdsApi`].

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::raw::SearchRow;
use super::{CustomerContext, GoogleAdsApi};
use crate::config::GoogleAdsConfig;
use crate::errors::GoogleAdsError;

const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Refresh an access token this many seconds before its reported expiry.
const TOKEN_EXPIRY_SLACK_SECS: i64 = 60;
/// How much of an upstream error body to keep in error messages.
const ERROR_BODY_LIMIT: usize = 512;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ListAccessibleCustomersResponse {
    resource_names: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SearchResponse {
    results: Vec<SearchRow>,
    next_page_token: Option<String>,
}

#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// REST client for the Google Ads API.
///
/// Trades the per-connection refresh token for a short-lived access token
/// (cached until shortly before expiry) and executes GAQL searches with the
/// developer-token and login-customer-id headers the API requires.
pub struct GoogleAdsRestClient {
    http: Client,
    config: GoogleAdsConfig,
    tokens: Mutex<HashMap<String, CachedToken>>,
}

impl GoogleAdsRestClient {
    pub fn new(config: GoogleAdsConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            config,
            tokens: Mutex::new(HashMap::new()),
        }
    }

    /// Returns a valid access token for the refresh token, reusing a cached
    /// one when it has not expired yet.
    async fn access_token(&self, refresh_token: &str) -> Result<String, GoogleAdsError> {
        {
            let cache = self.tokens.lock().await;
            if let Some(cached) = cache.get(refresh_token) {
                if cached.expires_at > Utc::now() {
                    return Ok(cached.access_token.clone());
                }
            }
        }

        debug!("exchanging refresh token for access token");

        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .http
            .post(&self.config.oauth_token_url)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GoogleAdsError::TokenRefresh(truncate(&body)));
        }

        let token: TokenResponse = response.json().await?;
        let ttl = token.expires_in.unwrap_or(3600) - TOKEN_EXPIRY_SLACK_SECS;

        let mut cache = self.tokens.lock().await;
        cache.insert(
            refresh_token.to_string(),
            CachedToken {
                access_token: token.access_token.clone(),
                expires_at: Utc::now() + chrono::Duration::seconds(ttl.max(0)),
            },
        );

        Ok(token.access_token)
    }
}

#[async_trait]
impl GoogleAdsApi for GoogleAdsRestClient {
    async fn list_accessible_customers(
        &self,
        refresh_token: &str,
    ) -> Result<Vec<String>, GoogleAdsError> {
        let access_token = self.access_token(refresh_token).await?;
        let url = format!("{}/customers:listAccessibleCustomers", self.config.api_base);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&access_token)
            .header("developer-token", &self.config.developer_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GoogleAdsError::Api {
                status: status.as_u16(),
                customer_id: String::new(),
                message: truncate(&body),
            });
        }

        let parsed: ListAccessibleCustomersResponse = response.json().await?;
        debug!(count = parsed.resource_names.len(), "listed accessible customers");
        Ok(parsed.resource_names)
    }

    async fn search(
        &self,
        context: &CustomerContext,
        query: &str,
    ) -> Result<Vec<SearchRow>, GoogleAdsError> {
        let access_token = self.access_token(&context.refresh_token).await?;
        let url = format!(
            "{}/customers/{}/googleAds:search",
            self.config.api_base, context.customer_id
        );

        let mut rows = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut body = serde_json::json!({ "query": query });
            if let Some(token) = &page_token {
                body["pageToken"] = serde_json::Value::String(token.clone());
            }

            let response = self
                .http
                .post(&url)
                .bearer_auth(&access_token)
                .header("developer-token", &self.config.developer_token)
                .header("login-customer-id", &context.login_customer_id)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                warn!(
                    customer_id = %context.customer_id,
                    status = status.as_u16(),
                    "search request failed"
                );
                return Err(GoogleAdsError::Api {
                    status: status.as_u16(),
                    customer_id: context.customer_id.clone(),
                    message: truncate(&text),
                });
            }

            let page: SearchResponse = response.json().await?;
            rows.extend(page.results);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(
            customer_id = %context.customer_id,
            rows = rows.len(),
            "search completed"
        );

        Ok(rows)
    }
}

fn truncate(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.len() <= ERROR_BODY_LIMIT {
        trimmed.to_string()
    } else {
        let mut end = ERROR_BODY_LIMIT;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        trimmed[..end].to_string()
    }
}
