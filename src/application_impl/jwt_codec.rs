use crate::application_port::{AuthError, TokenCodec};
use crate::domain_model::{TokenClaims, TokenType, UserId};
use crate::logger::*;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub issuer: String,
    pub audience: String,
    pub algorithm: Algorithm,
    pub signing_key: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: String, // user id as string
    #[serde(rename = "type")]
    typ: TokenType,
    exp: i64,
    iat: i64,
    iss: String,
    aud: String,
    jti: String,
}

/// HMAC-signed JWT codec. The key is fixed for the life of the process;
/// changing it invalidates every outstanding token.
pub struct JwtCodec {
    cfg: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtCodec {
    pub fn try_new(cfg: JwtConfig) -> Result<Self, AuthError> {
        if !matches!(
            cfg.algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(AuthError::InternalError(format!(
                "unsupported signing algorithm {:?}, expected HS256, HS384 or HS512",
                cfg.algorithm
            )));
        }
        if cfg.signing_key.is_empty() {
            return Err(AuthError::InternalError("empty signing key".to_string()));
        }

        let mut validation = Validation::new(cfg.algorithm);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_audience(&[cfg.audience.clone()]);
        validation.set_issuer(&[cfg.issuer.clone()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);

        Ok(JwtCodec {
            encoding_key: EncodingKey::from_secret(&cfg.signing_key),
            decoding_key: DecodingKey::from_secret(&cfg.signing_key),
            validation,
            cfg,
        })
    }

    #[inline]
    fn parse_timestamp(secs: i64) -> Result<DateTime<Utc>, AuthError> {
        DateTime::from_timestamp(secs, 0).ok_or(AuthError::Malformed)
    }
}

impl TokenCodec for JwtCodec {
    fn encode(&self, claims: &TokenClaims) -> Result<String, AuthError> {
        let wire = WireClaims {
            sub: claims.subject.to_string(),
            typ: claims.token_type,
            exp: claims.expires_at.timestamp(),
            iat: claims.issued_at.timestamp(),
            iss: self.cfg.issuer.clone(),
            aud: self.cfg.audience.clone(),
            jti: claims.token_id.to_string(),
        };

        encode(&Header::new(self.cfg.algorithm), &wire, &self.encoding_key)
            .map_err(|e| AuthError::InternalError(e.to_string()))
    }

    fn decode(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let data = decode::<WireClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| {
                debug!(kind = ?e.kind(), "token rejected by codec");
                AuthError::Malformed
            },
        )?;
        let wire = data.claims;

        Ok(TokenClaims {
            subject: wire
                .sub
                .parse::<UserId>()
                .map_err(|_| AuthError::Malformed)?,
            token_type: wire.typ,
            issued_at: Self::parse_timestamp(wire.iat)?,
            expires_at: Self::parse_timestamp(wire.exp)?,
            token_id: wire.jti.parse().map_err(|_| AuthError::Malformed)?,
        })
    }
}
