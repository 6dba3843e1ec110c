//! Shared fixtures for the service unit tests: an in-memory stack wired the
//! same way `Server` wires the real one.

use super::*;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::infra_memory::{MemoryRevocationStore, MemoryUserRepo};
use chrono::{DateTime, Utc};
use jsonwebtoken::Algorithm;
use std::sync::Arc;

pub fn codec() -> Arc<dyn TokenCodec> {
    Arc::new(
        JwtCodec::try_new(JwtConfig {
            issuer: "quillpost.auth".to_string(),
            audience: "quillpost-client".to_string(),
            algorithm: Algorithm::HS256,
            signing_key: b"test-signing-key".to_vec(),
        })
        .unwrap(),
    )
}

pub fn cheap_hasher() -> Arc<dyn CredentialHasher> {
    Arc::new(
        Argon2PasswordHasher::try_new(Argon2Config {
            memory_kib: 256,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap(),
    )
}

pub struct TestStack {
    pub codec: Arc<dyn TokenCodec>,
    pub users: Arc<dyn UserRepo>,
    pub revocations: Arc<dyn RevocationStore>,
    pub issuer: Arc<SessionIssuer>,
    pub authenticator: Arc<Authenticator>,
    pub auth: Arc<RealAuthService>,
}

impl TestStack {
    pub fn new() -> Self {
        Self::with_revocations(Arc::new(MemoryRevocationStore::new()))
    }

    pub fn with_revocations(revocations: Arc<dyn RevocationStore>) -> Self {
        let codec = codec();
        let users: Arc<dyn UserRepo> = Arc::new(MemoryUserRepo::new());
        let issuer = Arc::new(SessionIssuer::new(codec.clone(), SessionPolicy::default()));
        let authenticator = Arc::new(Authenticator::new(
            revocations.clone(),
            codec.clone(),
            users.clone(),
        ));
        let auth = Arc::new(RealAuthService::new(
            users.clone(),
            cheap_hasher(),
            revocations.clone(),
            authenticator.clone(),
            issuer.clone(),
        ));

        TestStack {
            codec,
            users,
            revocations,
            issuer,
            authenticator,
            auth,
        }
    }

    /// Active user with an unusable password hash.
    pub async fn user(&self, email: &str) -> User {
        let user = User {
            id: UserId::new_v4(),
            email: email.to_string(),
            password_hash: "!".to_string(),
            profile: Profile::default(),
            is_active: true,
            created_at: Utc::now(),
        };
        self.users.create(&user).await.unwrap();
        user
    }
}

pub struct FailingRevocationStore;

#[async_trait::async_trait]
impl RevocationStore for FailingRevocationStore {
    async fn revoke(&self, _token: &str, _user_id: UserId) -> Result<RevokeOutcome, AuthError> {
        Err(AuthError::Store("connection refused".to_string()))
    }

    async fn is_revoked(&self, _token: &str) -> Result<bool, AuthError> {
        Err(AuthError::Store("connection refused".to_string()))
    }

    async fn purge_revoked_before(&self, _cutoff: DateTime<Utc>) -> Result<u64, AuthError> {
        Err(AuthError::Store("connection refused".to_string()))
    }
}
