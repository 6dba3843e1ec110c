use crate::domain_model::{TokenClaims, TokenType, User, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("token has been revoked")]
    Revoked,
    #[error("token is malformed or expired")]
    Malformed,
    #[error("wrong token type")]
    WrongTokenType,
    #[error("token subject does not exist")]
    UnknownSubject,
    #[error("account is inactive")]
    InactiveAccount,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("email already registered")]
    EmailTaken,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("store error: {0}")]
    Store(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(Debug, Clone)]
pub struct SignupInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct SigninInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessToken(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshToken(pub String);

#[derive(Debug, Clone, Serialize)]
pub struct AuthTokens {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    pub token_type: &'static str,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token_expires_at: DateTime<Utc>,
}

/// Signs and verifies claim sets. Implementations are pure: no I/O, no clock
/// other than the expiry check at decode time.
pub trait TokenCodec: Send + Sync {
    fn encode(&self, claims: &TokenClaims) -> Result<String, AuthError>;
    fn decode(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

#[async_trait::async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash_password(&self, password: &str) -> Result<String, AuthError>;
    async fn verify_password(&self, password: &str, password_hash: &str)
    -> Result<bool, AuthError>;
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    async fn signup(&self, request: SignupInput) -> Result<AuthTokens, AuthError>;
    async fn signin(&self, request: SigninInput) -> Result<AuthTokens, AuthError>;
    /// The authorization gate for every protected operation.
    async fn resolve(&self, token: &str, required: TokenType) -> Result<User, AuthError>;
    /// Exchanges a refresh token for a new pair. The presented token is
    /// single use.
    async fn rotate(&self, refresh_token: &str) -> Result<AuthTokens, AuthError>;
    async fn logout(&self, token: &str, user_id: UserId) -> Result<(), AuthError>;
}
