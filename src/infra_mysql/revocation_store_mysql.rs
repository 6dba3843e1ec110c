use super::util::is_dup_key;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

/// Blacklist rows keyed by the raw token. The primary key on `token` is what
/// makes `revoke` atomic: the losing insert of a race fails with a duplicate
/// key error and reports `AlreadyRevoked`.
pub struct MySqlRevocationStore {
    pool: MySqlPool,
}

impl MySqlRevocationStore {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlRevocationStore { pool }
    }
}

#[async_trait::async_trait]
impl RevocationStore for MySqlRevocationStore {
    async fn revoke(&self, token: &str, user_id: UserId) -> Result<RevokeOutcome, AuthError> {
        let result = sqlx::query(
            r#"
INSERT INTO revoked_token (token, user_id, revoked_at)
VALUES (?, ?, ?)
"#,
        )
        .bind(token)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(RevokeOutcome::Revoked),
            Err(e) if is_dup_key(&e) => Ok(RevokeOutcome::AlreadyRevoked),
            Err(e) => Err(AuthError::Store(format!("revoke token: {e}"))),
        }
    }

    async fn is_revoked(&self, token: &str) -> Result<bool, AuthError> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(1) FROM revoked_token WHERE token = ?"#)
            .bind(token)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AuthError::Store(format!("query revoked token: {e}")))?;

        Ok(count > 0)
    }

    async fn purge_revoked_before(&self, cutoff: DateTime<Utc>) -> Result<u64, AuthError> {
        let result = sqlx::query("DELETE FROM revoked_token WHERE revoked_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| AuthError::Store(format!("purge revoked tokens: {e}")))?;

        Ok(result.rows_affected())
    }
}
