use crate::application_port::*;
use crate::domain_model::*;
use chrono::{DateTime, Utc};

/// Durable blacklist of token strings.
///
/// A token present in the store is unusable for the rest of its natural
/// lifetime. `revoke` must be atomic per token string: of several concurrent
/// calls for the same token exactly one observes `RevokeOutcome::Revoked`,
/// and `is_revoked` reports true as soon as any of them has returned.
#[async_trait::async_trait]
pub trait RevocationStore: Send + Sync {
    async fn revoke(&self, token: &str, user_id: UserId) -> Result<RevokeOutcome, AuthError>;

    async fn is_revoked(&self, token: &str) -> Result<bool, AuthError>;

    /// Drop records revoked before `cutoff`. Callers pass a cutoff older than
    /// the longest token lifetime, so only already-expired tokens are
    /// forgotten.
    async fn purge_revoked_before(&self, cutoff: DateTime<Utc>) -> Result<u64, AuthError>;
}
