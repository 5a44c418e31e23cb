//! Bearer tokens for learnloop accounts.
//!
//! `POST /auth/register` and `POST /auth/login` hand out one HS256 token per
//! sign-in. The token carries the account id and its role so
//! [`crate::middleware::rbac`] can gate admin and oversight routes without a
//! database read. There is no refresh flow: a client signs in again once
//! the token lapses.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use learnloop_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token lifetime when `JWT_ACCESS_EXPIRY_MINS` is unset.
const DEFAULT_EXPIRY_MINS: i64 = 60;

/// Payload of a learnloop bearer token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Account id.
    pub sub: DbId,
    /// `student`, `parent`, `teacher` or `admin` at sign-in time.
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    /// Random id so two sign-ins in the same second still differ.
    pub jti: String,
}

/// Signing settings, part of [`crate::config::ServerConfig`].
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required) and `JWT_ACCESS_EXPIRY_MINS`.
    ///
    /// # Panics
    ///
    /// On a missing or empty secret, or an expiry that is not a positive
    /// number of minutes. The server refuses to start rather than sign
    /// tokens it cannot check.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        assert!(!secret.is_empty(), "JWT_SECRET must be set and non-empty");

        let access_token_expiry_mins = match std::env::var("JWT_ACCESS_EXPIRY_MINS") {
            Ok(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|mins| *mins > 0)
                .expect("JWT_ACCESS_EXPIRY_MINS must be a positive number of minutes"),
            Err(_) => DEFAULT_EXPIRY_MINS,
        };

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    /// Lifetime in seconds, as reported in the sign-in response.
    pub fn expires_in_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }
}

/// Sign a token for `user_id` acting as `role`.
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let iat = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp: iat + config.expires_in_secs(),
        iat,
        jti: Uuid::new_v4().to_string(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check signature and expiry and return the claims.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}
