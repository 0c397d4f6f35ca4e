use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;

/// Identity and role claims baked into every issued token.
///
/// Tokens are self-contained: the only revocation mechanism is expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub is_admin: bool,
    pub is_approved: bool,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(
        user_id: Uuid,
        username: String,
        is_admin: bool,
        is_approved: bool,
        ttl_secs: u64,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            username,
            is_admin,
            is_approved,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_secs as i64)).timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("Token generation failed: {0}")]
    TokenGeneration(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

impl From<AuthError> for crate::error::ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken => {
                crate::error::ApiError::unauthorized("Invalid or expired token")
            }
            other => {
                tracing::error!("Auth error: {}", other);
                crate::error::ApiError::internal_server_error("Authentication is unavailable")
            }
        }
    }
}

/// Hash a plaintext password with bcrypt at the configured cost.
pub fn hash_password(plaintext: &str) -> Result<String, AuthError> {
    bcrypt::hash(plaintext, config::config().security.bcrypt_cost)
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Verify a plaintext password against a stored bcrypt hash.
/// Any bcrypt failure (malformed hash included) reads as a mismatch.
pub fn verify_password(plaintext: &str, hash: &str) -> bool {
    bcrypt::verify(plaintext, hash).unwrap_or(false)
}

/// Sign claims into a compact HMAC token.
pub fn issue_token(claims: &Claims) -> Result<String, AuthError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Verify signature and expiry, returning the embedded claims.
///
/// Every failure mode (malformed token, bad signature, expired) collapses
/// into the same `InvalidToken` so callers cannot probe which check failed.
pub fn verify_token(token: &str) -> Result<Claims, AuthError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AuthError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_with_ttl(ttl_secs: u64) -> Claims {
        Claims::new(Uuid::new_v4(), "maya".to_string(), false, true, ttl_secs)
    }

    #[test]
    fn password_round_trip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    #[test]
    fn hash_is_salted() {
        let a = hash_password("same input").unwrap();
        let b = hash_password("same input").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn token_round_trip_preserves_claims() {
        let claims = claims_with_ttl(3600);
        let token = issue_token(&claims).unwrap();
        let decoded = verify_token(&token).unwrap();
        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.username, "maya");
        assert!(!decoded.is_admin);
        assert!(decoded.is_approved);
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut claims = claims_with_ttl(3600);
        claims.exp = (Utc::now() - Duration::seconds(120)).timestamp();
        let token = issue_token(&claims).unwrap();
        assert!(matches!(
            verify_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = issue_token(&claims_with_ttl(3600)).unwrap();
        let mut tampered = token.clone();
        // Flip a character in the signature segment
        let flipped = if tampered.ends_with('a') { 'b' } else { 'a' };
        tampered.pop();
        tampered.push(flipped);
        assert!(verify_token(&tampered).is_err());

        assert!(matches!(
            verify_token("not-a-token"),
            Err(AuthError::InvalidToken)
        ));
    }
}
