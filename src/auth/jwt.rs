//! JWT Token Service
//! Mission: Issue and validate signed, time-bound session tokens

use crate::auth::models::Claims;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

pub const DEFAULT_TTL_HOURS: i64 = 24;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed or its signature does not verify")]
    Malformed,

    #[error("token has expired")]
    Expired,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Stateless token issuer/validator.
///
/// The signing key is fixed at construction and read-only afterwards, so a
/// single instance is shared by every request.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    /// Create a token service with the default 24h lifetime
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, Duration::hours(DEFAULT_TTL_HOURS))
    }

    pub fn with_ttl(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `subject` expiring one TTL from now
    pub fn issue(&self, subject: Uuid) -> Result<String, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(&self, subject: Uuid, now: DateTime<Utc>) -> Result<String, TokenError> {
        let expiration = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::Signing("expiry out of range".to_string()))?;

        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        debug!(subject = %subject, exp = claims.exp, "issuing session token");

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Validate a token and return its subject
    pub fn validate(&self, token: &str) -> Result<Uuid, TokenError> {
        let decoded = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            },
        )?;

        Uuid::parse_str(&decoded.claims.sub).map_err(|_| TokenError::Malformed)
    }
}
