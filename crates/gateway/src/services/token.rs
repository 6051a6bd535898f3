//! Session token issuing and validation.
//!
//! Tokens are HS256 JWTs carrying the principal id in `sub` plus `iat` and
//! `exp`. Validation is stateless: there is no revocation list, so a leaked
//! token stays valid until its expiry. Keep lifetimes short.

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use datamart_core::UserId;

use super::auth::AuthError;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Principal id (user UUID).
    sub: Uuid,
    /// Issued-at, seconds since epoch.
    iat: i64,
    /// Expiry, seconds since epoch.
    exp: i64,
}

/// Mints and validates bearer session tokens.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: chrono::Duration,
}

impl TokenIssuer {
    /// Create an issuer from the signing secret and token lifetime.
    #[must_use]
    pub fn new(secret: &SecretString, ttl: chrono::Duration) -> Self {
        let secret_bytes = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret_bytes),
            decoding: DecodingKey::from_secret(secret_bytes),
            validation,
            ttl,
        }
    }

    /// Mint a token for a principal, valid for the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenInvalid` if encoding fails (malformed key).
    pub fn issue(&self, user_id: UserId) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.as_uuid(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|_| AuthError::TokenInvalid)
    }

    /// Validate a token and return the principal id it carries.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenExpired` when past expiry and
    /// `AuthError::TokenInvalid` for a bad signature or malformed token.
    pub fn validate(&self, token: &str) -> Result<UserId, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid,
            }
        })?;

        Ok(UserId::new(data.claims.sub))
    }
}
