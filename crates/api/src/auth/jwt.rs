//! HS256 access tokens for organizer accounts.
//!
//! Tokens carry the organizer id and email, are issued by `evently` and
//! expire after [`JwtConfig::token_ttl_mins`]. There are no refresh tokens:
//! the dashboard logs in again when a token lapses.

use chrono::Utc;
use evently_core::types::DbId;
use jsonwebtoken::errors::Error as JwtError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ISSUER: &str = "evently";
const DEFAULT_TTL_MINS: i64 = 60;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Organizer (user) id.
    pub sub: DbId,
    pub email: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// A freshly signed token and its lifetime in seconds.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub token_ttl_mins: i64,
}

impl JwtConfig {
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `JWT_SECRET`             | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS` | no       | `60`    |
    ///
    /// # Panics
    ///
    /// Panics when the secret is missing or empty, or the lifetime is not a
    /// positive number of minutes.
    pub fn from_env() -> Self {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(s) if !s.trim().is_empty() => s,
            _ => panic!("JWT_SECRET must be set to a non-empty value"),
        };
        let token_ttl_mins = match std::env::var("JWT_ACCESS_EXPIRY_MINS") {
            Ok(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|m| *m > 0)
                .unwrap_or_else(|| {
                    panic!("JWT_ACCESS_EXPIRY_MINS must be a positive integer, got '{raw}'")
                }),
            Err(_) => DEFAULT_TTL_MINS,
        };
        Self {
            secret,
            token_ttl_mins,
        }
    }

    /// Sign a token for an organizer.
    pub fn issue(&self, user_id: DbId, email: &str) -> Result<IssuedToken, JwtError> {
        let expires_in = self.token_ttl_mins * 60;
        let iat = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iss: ISSUER.to_string(),
            iat,
            exp: iat + expires_in,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        Ok(IssuedToken { token, expires_in })
    }

    /// Check signature, issuer and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )?;
        Ok(data.claims)
    }
}
