use crate::application_port::{AuthError, TokenCodec};
use crate::domain_model::{TokenType, User};
use crate::domain_port::{RevocationStore, UserRepo};
use crate::logger::*;
use std::sync::Arc;

/// Resolves a bearer token to a live user.
///
/// Checks run in a fixed order and stop at the first failure:
/// revocation, signature/expiry, token type, subject lookup, account state.
/// A revoked token therefore reports `Revoked` even when it has also
/// expired, and a wrong-type token reports `WrongTokenType` before the
/// subject is looked up.
pub struct Authenticator {
    revocation_store: Arc<dyn RevocationStore>,
    token_codec: Arc<dyn TokenCodec>,
    user_repo: Arc<dyn UserRepo>,
}

impl Authenticator {
    pub fn new(
        revocation_store: Arc<dyn RevocationStore>,
        token_codec: Arc<dyn TokenCodec>,
        user_repo: Arc<dyn UserRepo>,
    ) -> Self {
        Authenticator {
            revocation_store,
            token_codec,
            user_repo,
        }
    }

    pub async fn resolve(&self, token: &str, required: TokenType) -> Result<User, AuthError> {
        if self.revocation_store.is_revoked(token).await? {
            debug!(token = %fingerprint(token), "revoked token presented");
            return Err(AuthError::Revoked);
        }

        let claims = self.token_codec.decode(token)?;

        if claims.token_type != required {
            debug!(
                token = %fingerprint(token),
                presented = %claims.token_type,
                %required,
                "token type mismatch"
            );
            return Err(AuthError::WrongTokenType);
        }

        let user = self
            .user_repo
            .find_by_id(claims.subject)
            .await?
            .ok_or(AuthError::UnknownSubject)?;

        if !user.is_active {
            return Err(AuthError::InactiveAccount);
        }

        Ok(user)
    }
}
