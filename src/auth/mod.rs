use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(id: i64, email: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            id,
            email: email.into(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Issues and verifies the service's signed, time-bound bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(&security.jwt_secret, Duration::minutes(security.jwt_expiry_minutes))
    }

    /// Token lifetime in seconds.
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }

    pub fn issue(&self, user_id: i64, email: &str) -> Result<String, AuthError> {
        self.sign(&Claims::new(user_id, email, self.ttl))
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Check signature and expiry, returning the decoded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Invalid(e.to_string()),
            })
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret", Duration::minutes(20))
    }

    #[test]
    fn issued_token_decodes_to_same_identity() {
        let tokens = service();
        let token = tokens.issue(42, "joao@email.com").unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.id, 42);
        assert_eq!(claims.email, "joao@email.com");
        assert_eq!(claims.exp - claims.iat, 20 * 60);
    }

    #[test]
    fn rejects_expired_token() {
        let tokens = service();
        let now = Utc::now().timestamp();
        let claims = Claims {
            id: 1,
            email: "joao@email.com".into(),
            iat: now - 25 * 60,
            exp: now - 5 * 60,
        };
        let token = tokens.sign(&claims).unwrap();

        assert!(matches!(tokens.verify(&token), Err(AuthError::Expired)));
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let other = TokenService::new("other-secret", Duration::minutes(20));
        let token = other.issue(1, "joao@email.com").unwrap();

        assert!(matches!(service().verify(&token), Err(AuthError::Invalid(_))));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(service().verify("not.a.jwt"), Err(AuthError::Invalid(_))));
    }

    #[test]
    fn ttl_comes_from_config() {
        let mut config = crate::config::AppConfig::development();
        config.security.jwt_expiry_minutes = 5;
        let tokens = TokenService::from_config(&config.security);
        assert_eq!(tokens.ttl_seconds(), 300);
    }
}
