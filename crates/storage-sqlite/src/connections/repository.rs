//! Repository for OAuth connections.

use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use adsight_core::connections::{
    ConnectionRepositoryTrait, GoogleConnection, NewGoogleConnection,
};
use adsight_core::errors::{Result, ValidationError};

use crate::crypto::TokenCipher;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::google_oauth_connections;

use super::model::ConnectionDB;

/// Persists OAuth connections with tokens encrypted at rest.
///
/// The cipher is injected at construction; nothing in this repository reads
/// key material from the environment.
pub struct ConnectionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
    cipher: Arc<TokenCipher>,
}

impl ConnectionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle, cipher: Arc<TokenCipher>) -> Self {
        Self {
            pool,
            writer,
            cipher,
        }
    }
}

#[async_trait]
impl ConnectionRepositoryTrait for ConnectionRepository {
    async fn upsert(&self, new_connection: NewGoogleConnection) -> Result<GoogleConnection> {
        new_connection.validate()?;

        let encrypted_access = self.cipher.encrypt(&new_connection.access_token)?;
        let encrypted_refresh = new_connection
            .refresh_token
            .as_deref()
            .map(|token| self.cipher.encrypt(token))
            .transpose()?;

        let row = self
            .writer
            .exec(move |conn| {
                use crate::schema::google_oauth_connections::dsl;

                let now = chrono::Utc::now().naive_utc();
                let scopes_json = serde_json::to_string(&new_connection.scopes)
                    .unwrap_or_else(|_| "[]".to_string());

                // The writer actor serializes all writes, so looking up the
                // natural key and branching is race-free here.
                let existing: Option<ConnectionDB> = dsl::google_oauth_connections
                    .filter(dsl::user_id.eq(&new_connection.user_id))
                    .filter(dsl::google_user_id.eq(&new_connection.google_user_id))
                    .select(ConnectionDB::as_select())
                    .first::<ConnectionDB>(conn)
                    .optional()
                    .into_core()?;

                let row_id = match existing {
                    Some(existing_row) => {
                        // Re-authorization overwrites tokens and reactivates
                        // the row; a grant without a refresh token keeps the
                        // stored one.
                        match &encrypted_refresh {
                            Some(refresh) => diesel::update(
                                dsl::google_oauth_connections.find(&existing_row.id),
                            )
                            .set((
                                dsl::access_token.eq(&encrypted_access),
                                dsl::refresh_token.eq(refresh),
                                dsl::token_expires_at.eq(new_connection.token_expires_at),
                                dsl::scopes.eq(&scopes_json),
                                dsl::is_active.eq(true),
                                dsl::updated_at.eq(now),
                            ))
                            .execute(conn)
                            .into_core()?,
                            None => diesel::update(
                                dsl::google_oauth_connections.find(&existing_row.id),
                            )
                            .set((
                                dsl::access_token.eq(&encrypted_access),
                                dsl::token_expires_at.eq(new_connection.token_expires_at),
                                dsl::scopes.eq(&scopes_json),
                                dsl::is_active.eq(true),
                                dsl::updated_at.eq(now),
                            ))
                            .execute(conn)
                            .into_core()?,
                        };
                        existing_row.id
                    }
                    None => {
                        let refresh = encrypted_refresh.clone().ok_or_else(|| {
                            ValidationError::MissingField("refreshToken".to_string())
                        })?;

                        let row = ConnectionDB {
                            id: uuid::Uuid::new_v4().to_string(),
                            user_id: new_connection.user_id.clone(),
                            google_email: new_connection.google_email.clone(),
                            google_user_id: new_connection.google_user_id.clone(),
                            access_token: encrypted_access.clone(),
                            refresh_token: refresh,
                            token_expires_at: new_connection.token_expires_at,
                            scopes: scopes_json,
                            is_active: true,
                            created_at: now,
                            updated_at: now,
                        };

                        diesel::insert_into(google_oauth_connections::table)
                            .values(&row)
                            .execute(conn)
                            .into_core()?;
                        row.id
                    }
                };

                dsl::google_oauth_connections
                    .find(row_id)
                    .select(ConnectionDB::as_select())
                    .first::<ConnectionDB>(conn)
                    .into_core()
            })
            .await?;

        row.into_domain(&self.cipher)
    }

    fn get_latest_active_by_user(&self, user_id_param: &str) -> Result<Option<GoogleConnection>> {
        use crate::schema::google_oauth_connections::dsl;

        let mut conn = get_connection(&self.pool)?;

        let row: Option<ConnectionDB> = dsl::google_oauth_connections
            .filter(dsl::user_id.eq(user_id_param))
            .filter(dsl::is_active.eq(true))
            .order(dsl::updated_at.desc())
            .select(ConnectionDB::as_select())
            .first::<ConnectionDB>(&mut conn)
            .optional()
            .into_core()?;

        row.map(|r| r.into_domain(&self.cipher)).transpose()
    }

    fn list_active_by_user(&self, user_id_param: &str) -> Result<Vec<GoogleConnection>> {
        use crate::schema::google_oauth_connections::dsl;

        let mut conn = get_connection(&self.pool)?;

        let rows = dsl::google_oauth_connections
            .filter(dsl::user_id.eq(user_id_param))
            .filter(dsl::is_active.eq(true))
            .order(dsl::updated_at.desc())
            .select(ConnectionDB::as_select())
            .load::<ConnectionDB>(&mut conn)
            .into_core()?;

        rows.into_iter()
            .map(|row| row.into_domain(&self.cipher))
            .collect()
    }

    async fn deactivate(&self, user_id_param: &str, connection_id: &str) -> Result<usize> {
        let user_id_owned = user_id_param.to_string();
        let connection_id_owned = connection_id.to_string();

        self.writer
            .exec(move |conn| {
                use crate::schema::google_oauth_connections::dsl;

                diesel::update(
                    dsl::google_oauth_connections
                        .filter(dsl::id.eq(&connection_id_owned))
                        .filter(dsl::user_id.eq(&user_id_owned)),
                )
                .set((
                    dsl::is_active.eq(false),
                    dsl::updated_at.eq(chrono::Utc::now().naive_utc()),
                ))
                .execute(conn)
                .into_core()
            })
            .await
    }
}
