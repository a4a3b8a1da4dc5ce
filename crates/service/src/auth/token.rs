use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use super::domain::{AccessToken, Claims, PrincipalKind};
use super::errors::AuthError;

/// HS256 token issuer/verifier built once from configuration.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    pub fn from_config(cfg: &configs::AuthConfig) -> Self {
        Self::new(&cfg.jwt_secret, cfg.token_ttl_minutes)
    }

    pub fn issue(&self, kind: PrincipalKind, id: i32) -> Result<AccessToken, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: id.to_string(),
            kind,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenError(e.to_string()))?;
        Ok(AccessToken::bearer(token))
    }

    /// Verify signature, expiry and identity space; return the principal id.
    pub fn verify(&self, token: &str, expected: PrincipalKind) -> Result<i32, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            debug!(error = %e, "token rejected");
            AuthError::Unauthenticated
        })?;
        if data.claims.kind != expected {
            debug!(expected = %expected, got = %data.claims.kind, "token issued for another identity space");
            return Err(AuthError::Unauthenticated);
        }
        data.claims.sub.parse::<i32>().map_err(|_| AuthError::Unauthenticated)
    }
}
