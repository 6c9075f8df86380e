//! Access token persistence.

use crate::error::DatabaseError;
use crate::{Error, Result};

use super::{Database, NewToken, TokenRow};

impl Database {
    /// Get the stored token for a credential pair, expired or not
    pub async fn get_access_token(
        &self,
        client_id: &str,
        secret_hash: &str,
    ) -> Result<Option<TokenRow>> {
        let row = sqlx::query_as::<_, TokenRow>(
            r#"
            SELECT client_id, secret_hash, access_token, issued_at_ms, ttl_secs
            FROM access_tokens
            WHERE client_id = ? AND secret_hash = ?
            "#,
        )
        .bind(client_id)
        .bind(secret_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to get access token: {}",
                e
            )))
        })?;

        Ok(row)
    }

    /// Store a freshly issued token, replacing any previous one for the pair
    pub async fn store_access_token(&self, token: NewToken<'_>) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO access_tokens (client_id, secret_hash, access_token, issued_at_ms, ttl_secs)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(client_id, secret_hash) DO UPDATE SET
                access_token = excluded.access_token,
                issued_at_ms = excluded.issued_at_ms,
                ttl_secs = excluded.ttl_secs
            "#,
        )
        .bind(token.client_id)
        .bind(token.secret_hash)
        .bind(token.access_token)
        .bind(token.issued_at_ms)
        .bind(token.ttl_secs)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to store access token: {}",
                e
            )))
        })?;

        Ok(())
    }

    /// Delete the stored token for a credential pair
    ///
    /// Returns true if a row was removed.
    pub async fn delete_access_token(&self, client_id: &str, secret_hash: &str) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM access_tokens WHERE client_id = ? AND secret_hash = ?")
                .bind(client_id)
                .bind(secret_hash)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    Error::Database(DatabaseError::QueryFailed(format!(
                        "Failed to delete access token: {}",
                        e
                    )))
                })?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every token whose lifetime ended before `now_ms`
    ///
    /// Returns the number of rows removed.
    pub async fn delete_expired_tokens(&self, now_ms: i64) -> Result<u64> {
        let result =
            sqlx::query("DELETE FROM access_tokens WHERE issued_at_ms + ttl_secs * 1000 <= ?")
                .bind(now_ms)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    Error::Database(DatabaseError::QueryFailed(format!(
                        "Failed to delete expired tokens: {}",
                        e
                    )))
                })?;

        Ok(result.rows_affected())
    }
}
