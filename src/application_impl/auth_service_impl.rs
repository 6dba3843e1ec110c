use crate::application_impl::{Authenticator, SessionIssuer};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::{RevocationStore, UserRepo};
use crate::logger::*;
use chrono::Utc;
use std::sync::Arc;

pub struct RealAuthService {
    user_repo: Arc<dyn UserRepo>,
    credential_hasher: Arc<dyn CredentialHasher>,
    revocation_store: Arc<dyn RevocationStore>,
    authenticator: Arc<Authenticator>,
    session_issuer: Arc<SessionIssuer>,
    min_password_len: usize,
}

impl RealAuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepo>,
        credential_hasher: Arc<dyn CredentialHasher>,
        revocation_store: Arc<dyn RevocationStore>,
        authenticator: Arc<Authenticator>,
        session_issuer: Arc<SessionIssuer>,
    ) -> Self {
        Self {
            user_repo,
            credential_hasher,
            revocation_store,
            authenticator,
            session_issuer,
            min_password_len: 6,
        }
    }

    fn validate_signup(&self, email: &str, password: &str) -> Result<(), AuthError> {
        if !is_plausible_email(email) {
            return Err(AuthError::InvalidInput("invalid email address".to_string()));
        }
        if password.chars().count() < self.min_password_len {
            return Err(AuthError::InvalidInput(format!(
                "password must be at least {} characters",
                self.min_password_len
            )));
        }
        Ok(())
    }
}

#[inline]
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// local@domain.tld, no whitespace; full RFC 5322 is out of scope
fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[async_trait::async_trait]
impl AuthService for RealAuthService {
    async fn signup(&self, request: SignupInput) -> Result<AuthTokens, AuthError> {
        let email = normalize_email(&request.email);
        self.validate_signup(&email, &request.password)?;

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = self
            .credential_hasher
            .hash_password(&request.password)
            .await?;
        let user = User {
            id: UserId::new_v4(),
            email,
            password_hash,
            profile: Profile::default(),
            is_active: true,
            created_at: Utc::now(),
        };
        // a concurrent signup may still win the unique index; the repo
        // reports that as EmailTaken
        self.user_repo.create(&user).await?;
        info!(user_id = %user.id, "user signed up");

        self.session_issuer.issue(user.id)
    }

    async fn signin(&self, request: SigninInput) -> Result<AuthTokens, AuthError> {
        let email = normalize_email(&request.email);

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let ok = self
            .credential_hasher
            .verify_password(&request.password, &user.password_hash)
            .await?;
        if !ok {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AuthError::InactiveAccount);
        }

        debug!(user_id = %user.id, "user signed in");
        self.session_issuer.issue(user.id)
    }

    async fn resolve(&self, token: &str, required: TokenType) -> Result<User, AuthError> {
        self.authenticator.resolve(token, required).await
    }

    async fn rotate(&self, refresh_token: &str) -> Result<AuthTokens, AuthError> {
        let user = self
            .authenticator
            .resolve(refresh_token, TokenType::Refresh)
            .await?;

        // Revoke before issuing. Losing the race to a concurrent rotation of
        // the same token means it has already been spent.
        match self
            .revocation_store
            .revoke(refresh_token, user.id)
            .await?
        {
            RevokeOutcome::Revoked => {}
            RevokeOutcome::AlreadyRevoked => {
                warn!(
                    user_id = %user.id,
                    token = %fingerprint(refresh_token),
                    "refresh token replayed during rotation"
                );
                return Err(AuthError::Revoked);
            }
        }

        // Access tokens minted from the old refresh token stay valid until
        // they expire.
        self.session_issuer.issue(user.id)
    }

    async fn logout(&self, token: &str, user_id: UserId) -> Result<(), AuthError> {
        let outcome = self.revocation_store.revoke(token, user_id).await?;
        debug!(%user_id, token = %fingerprint(token), ?outcome, "token revoked on logout");
        Ok(())
    }
}
