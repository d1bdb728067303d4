//! Session token signing and verification (HS256 JWT).

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::AuthError;

/// Claims embedded in a session token: the user id and email, plus the
/// standard issue/expiry timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub uid: Uuid,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Sign a session token for the given user, valid for `ttl`.
pub fn sign(user_id: Uuid, email: &str, secret: &str, ttl: Duration) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        uid: user_id,
        sub: email.to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::Token(e.to_string()))
}

/// Decode and validate a session token; expiry is enforced.
pub fn verify(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::Token(e.to_string()))
}
