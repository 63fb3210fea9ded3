//! Error types for the Google Ads client layer.

use thiserror::Error;

/// Errors surfaced by account resolution and report fetching.
///
/// `Query` and `Api` carry the customer id so a failed fetch can be traced
/// back to the account it was issued for.
#[derive(Error, Debug)]
pub enum GoogleAdsError {
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("Refresh token rejected: {0}")]
    TokenRefresh(String),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Google Ads API returned status {status} for customer {customer_id}: {message}")]
    Api {
        status: u16,
        customer_id: String,
        message: String,
    },

    #[error("Query failed for customer {customer_id}: {message}")]
    Query {
        customer_id: String,
        message: String,
    },

    #[error("Unexpected response shape: {0}")]
    InvalidResponse(String),
}

impl GoogleAdsError {
    /// Short classification label, recorded in sync-job error details.
    pub fn kind(&self) -> &'static str {
        match self {
            GoogleAdsError::InvalidDateRange(_) => "invalid_date_range",
            GoogleAdsError::TokenRefresh(_) => "token_refresh",
            GoogleAdsError::Transport(_) => "transport",
            GoogleAdsError::Api { .. } => "api_status",
            GoogleAdsError::Query { .. } => "query",
            GoogleAdsError::InvalidResponse(_) => "invalid_response",
        }
    }
}
