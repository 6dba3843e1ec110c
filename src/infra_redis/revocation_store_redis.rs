use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, TimeDelta, Utc};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisWrite, ToRedisArgs};
use sha2::{Digest, Sha256};

/// Blacklist entries as `SET NX EX` keys. Redis expires each entry once the
/// longest-lived token it could refer to has expired, so purging is a no-op.
pub struct RedisRevocationStore {
    conn: ConnectionManager,
    prefix: String,
    retention: TimeDelta,
}

impl RedisRevocationStore {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>, retention: TimeDelta) -> Self {
        RedisRevocationStore {
            conn,
            prefix: prefix.into(),
            retention,
        }
    }

    // keyed by digest: tokens are long and the key space is shared
    fn key(&self, token: &str) -> String {
        let digest = Sha256::digest(token.as_bytes());
        format!("{}:{}", self.prefix, hex::encode(digest))
    }

    fn ttl_secs(&self) -> u64 {
        self.retention.num_seconds().max(1) as u64
    }
}

impl ToRedisArgs for UserId {
    fn write_redis_args<W>(&self, out: &mut W)
    where
        W: ?Sized + RedisWrite,
    {
        out.write_arg(self.to_string().as_bytes())
    }
}

#[async_trait::async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn revoke(&self, token: &str, user_id: UserId) -> Result<RevokeOutcome, AuthError> {
        let key = self.key(token);
        let mut conn = self.conn.clone();
        let set: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(&user_id)
            .arg("NX")
            .arg("EX")
            .arg(self.ttl_secs())
            .query_async(&mut conn)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(match set {
            Some(_) => RevokeOutcome::Revoked,
            None => RevokeOutcome::AlreadyRevoked,
        })
    }

    async fn is_revoked(&self, token: &str) -> Result<bool, AuthError> {
        let key = self.key(token);
        let mut conn = self.conn.clone();
        let exists: bool = conn
            .exists(&key)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        Ok(exists)
    }

    async fn purge_revoked_before(&self, _cutoff: DateTime<Utc>) -> Result<u64, AuthError> {
        Ok(0)
    }
}
