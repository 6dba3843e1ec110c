use crate::application_port::{AccessToken, AuthError, AuthTokens, RefreshToken, TokenCodec};
use crate::domain_model::{TokenClaims, TokenType, UserId};
use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
pub struct SessionPolicy {
    pub access_ttl: TimeDelta,
    pub refresh_ttl: TimeDelta,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        SessionPolicy {
            access_ttl: TimeDelta::minutes(30),
            refresh_ttl: TimeDelta::days(7),
        }
    }
}

impl SessionPolicy {
    /// No token outlives this.
    pub fn max_lifetime(&self) -> TimeDelta {
        self.access_ttl.max(self.refresh_ttl)
    }
}

/// Mints access/refresh pairs. The two tokens share a subject and nothing
/// else; a pair cannot be linked back together after issuance.
pub struct SessionIssuer {
    token_codec: Arc<dyn TokenCodec>,
    policy: SessionPolicy,
}

impl SessionIssuer {
    pub fn new(token_codec: Arc<dyn TokenCodec>, policy: SessionPolicy) -> Self {
        SessionIssuer {
            token_codec,
            policy,
        }
    }

    pub fn issue(&self, user_id: UserId) -> Result<AuthTokens, AuthError> {
        // exp/iat travel as whole seconds
        let now = Utc::now().trunc_subsecs(0);

        let (access_token, access_exp) =
            self.mint(user_id, TokenType::Access, now, self.policy.access_ttl)?;
        let (refresh_token, refresh_exp) =
            self.mint(user_id, TokenType::Refresh, now, self.policy.refresh_ttl)?;

        Ok(AuthTokens {
            access_token: AccessToken(access_token),
            refresh_token: RefreshToken(refresh_token),
            token_type: "bearer",
            access_token_expires_at: access_exp,
            refresh_token_expires_at: refresh_exp,
        })
    }

    fn mint(
        &self,
        user_id: UserId,
        token_type: TokenType,
        now: DateTime<Utc>,
        ttl: TimeDelta,
    ) -> Result<(String, DateTime<Utc>), AuthError> {
        let claims = TokenClaims {
            subject: user_id,
            token_type,
            issued_at: now,
            expires_at: now + ttl,
            token_id: uuid::Uuid::new_v4(),
        };
        let token = self.token_codec.encode(&claims)?;
        Ok((token, claims.expires_at))
    }
}
