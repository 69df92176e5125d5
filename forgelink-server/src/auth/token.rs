//! Bearer-credential verification for WebSocket connects.
//!
//! The platform's auth service issues HS256 access tokens whose `sub` claim is
//! the string-encoded user id. The chat subsystem only verifies them; issuance
//! lives elsewhere. Every failure collapses into one opaque error so callers
//! cannot distinguish an expired token from a forged one.

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid or expired token")]
    Invalid,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
}

/// Verifies (and, for tests and tooling, issues) ForgeLink access tokens.
pub struct TokenVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier").finish()
    }
}

impl TokenVerifier {
    /// Creates a verifier for tokens signed with the given HS256 secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verifies a bearer token and returns the user id it was issued for.
    ///
    /// # Errors
    /// Returns [`TokenError::Invalid`] for any malformed, forged, or expired
    /// token, and for tokens whose subject is not an integer id.
    pub fn verify(&self, token: &str) -> Result<i64, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| TokenError::Invalid)?;
        data.claims.sub.parse().map_err(|_| TokenError::Invalid)
    }

    /// Issues a token for the given user id, valid for `ttl`.
    ///
    /// # Errors
    /// Returns [`TokenError::Invalid`] if signing fails.
    pub fn issue(&self, user_id: i64, ttl: Duration) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (Utc::now() + ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|_| TokenError::Invalid)
    }
}
