//! Database model for OAuth connections.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use adsight_core::connections::GoogleConnection;
use adsight_core::errors::Result;

use crate::crypto::TokenCipher;

/// Row shape of `google_oauth_connections`. Token columns hold the
/// base64-encoded ciphertext; `scopes` holds a JSON array.
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::google_oauth_connections)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ConnectionDB {
    pub id: String,
    pub user_id: String,
    pub google_email: String,
    pub google_user_id: String,
    pub access_token: String,
    pub refresh_token: String,
    pub token_expires_at: NaiveDateTime,
    pub scopes: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ConnectionDB {
    /// Decrypts the token columns and parses the scope list.
    pub fn into_domain(self, cipher: &TokenCipher) -> Result<GoogleConnection> {
        Ok(GoogleConnection {
            access_token: cipher.decrypt(&self.access_token)?,
            refresh_token: cipher.decrypt(&self.refresh_token)?,
            scopes: serde_json::from_str(&self.scopes).unwrap_or_default(),
            id: self.id,
            user_id: self.user_id,
            google_email: self.google_email,
            google_user_id: self.google_user_id,
            token_expires_at: self.token_expires_at,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
