use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(admin_id: Uuid, role: String) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: admin_id,
            role,
            exp,
            iat: now.timestamp(),
        }
    }
}

/// Identity proven by a validated bearer token. Carries no transport details.
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub admin_id: Uuid,
    pub role: String,
}

impl From<Claims> for AdminIdentity {
    fn from(claims: Claims) -> Self {
        Self {
            admin_id: claims.sub,
            role: claims.role,
        }
    }
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidSecret,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidSecret => write!(f, "Invalid JWT secret"),
        }
    }
}

impl std::error::Error for JwtError {}

#[derive(Debug)]
pub enum AuthError {
    InvalidToken(String),
    SecretNotConfigured,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::InvalidToken(msg) => write!(f, "invalid token: {}", msg),
            AuthError::SecretNotConfigured => write!(f, "JWT secret not configured"),
        }
    }
}

impl std::error::Error for AuthError {}

pub fn issue_token(claims: Claims) -> Result<String, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, &claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Validate a bearer token and extract the admin identity.
///
/// Pure with respect to transport: callers hand in the raw token string,
/// header parsing stays in the middleware.
pub fn authenticate(token: &str) -> Result<AdminIdentity, AuthError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(AuthError::SecretNotConfigured);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    Ok(AdminIdentity::from(token_data.claims))
}
