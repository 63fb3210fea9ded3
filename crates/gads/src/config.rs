//! Client configuration for the Google Ads REST transport.

/// Credentials and endpoints for the Google Ads API.
///
/// Constructed explicitly by the host and passed to
/// [`crate::GoogleAdsRestClient::new`]; there is no environment-variable or
/// global-state fallback in this crate.
#[derive(Debug, Clone)]
pub struct GoogleAdsConfig {
    /// OAuth client id of the application.
    pub client_id: String,
    /// OAuth client secret of the application.
    pub client_secret: String,
    /// Google Ads developer token.
    pub developer_token: String,
    /// Base URL of the Google Ads API, without trailing slash.
    pub api_base: String,
    /// OAuth token endpoint used to trade refresh tokens for access tokens.
    pub oauth_token_url: String,
}

impl GoogleAdsConfig {
    /// Production endpoints with the given application credentials.
    pub fn new(client_id: String, client_secret: String, developer_token: String) -> Self {
        Self {
            client_id,
            client_secret,
            developer_token,
            api_base: "https://googleads.googleapis.com/v17".to_string(),
            oauth_token_url: "https://oauth2.googleapis.com/token".to_string(),
        }
    }
}
