use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config;

/// Roles allowed to change content.
pub const EDITOR_ROLES: &[&str] = &["admin", "editor"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: String, role: String) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user_id,
            email,
            role,
            exp,
            iat: now.timestamp(),
        }
    }

    pub fn can_edit(&self) -> bool {
        EDITOR_ROLES.contains(&self.role.as_str())
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("JWT secret not configured")]
    InvalidSecret,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

fn secret() -> Result<&'static str, AuthError> {
    let secret = config::config().security.jwt_secret.as_str();
    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }
    Ok(secret)
}

pub fn generate_jwt(claims: &Claims) -> Result<String, AuthError> {
    let encoding_key = EncodingKey::from_secret(secret()?.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

pub fn validate_jwt(token: &str) -> Result<Claims, AuthError> {
    let decoding_key = DecodingKey::from_secret(secret()?.as_bytes());
    decode::<Claims>(token, &decoding_key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))
}

/// Hash a password with bcrypt at the library's default cost.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// Check a password against a stored bcrypt hash. A malformed hash never
/// matches.
pub fn verify_password(password: &str, stored: &str) -> bool {
    bcrypt::verify(password, stored).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "stored password hash is not a valid bcrypt hash");
        false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_roundtrip() {
        let stored = hash_password("s3cret").unwrap();
        assert!(stored.starts_with("$2b$"));
        assert!(verify_password("s3cret", &stored));
        assert!(!verify_password("S3cret", &stored));
        assert_ne!(hash_password("s3cret").unwrap(), stored, "salts must differ");
    }

    #[test]
    fn malformed_hashes_never_match() {
        assert!(!verify_password("s3cret", "no-separator"));
        assert!(!verify_password("s3cret", ""));
        // salt$sha256 hex from before bcrypt
        assert!(!verify_password("s3cret", "0f1e2d3c$9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"));
    }

    #[test]
    fn jwt_roundtrip() {
        let claims = Claims::new(Uuid::new_v4(), "editor@example.edu".into(), "editor".into());
        let token = generate_jwt(&claims).unwrap();
        let decoded = validate_jwt(&token).unwrap();
        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.role, "editor");
        assert!(decoded.can_edit());
    }

    #[test]
    fn rejects_tampered_tokens() {
        let claims = Claims::new(Uuid::new_v4(), "a@example.edu".into(), "viewer".into());
        let mut token = generate_jwt(&claims).unwrap();
        token.push('x');
        assert!(matches!(validate_jwt(&token), Err(AuthError::InvalidToken(_))));
        assert!(!claims.can_edit());
    }
}
