use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, MIN_SECRET_LEN};
use crate::error::AppError;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject of the token: the account's email.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch). The token is valid strictly before it.
    pub exp: i64,
}

/// Issues and checks HS256 session tokens.
///
/// The signing key is fixed at construction and shared read-only by every worker,
/// so a single codec can be wrapped in an `Arc` and used concurrently.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    /// Builds a codec over `secret`. Rejects keys shorter than 32 bytes and a
    /// non-positive `ttl`.
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, ConfigError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::SecretTooShort);
        }
        if ttl <= Duration::zero() {
            return Err(ConfigError::NonPositiveTtl);
        }

        // Expiry is judged by `is_valid` against an explicit clock, so `decode`
        // only checks signature and structure.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "iat", "exp"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }

    /// Configured time-to-live for tokens from `generate_token`.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Signs `{sub: subject, iat: now, exp: now + ttl}`.
    pub fn issue(&self, subject: &str, now: DateTime<Utc>, ttl: Duration) -> Result<String, AppError> {
        let issued_at = now.timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at,
            exp: issued_at + ttl.num_seconds(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Issues a token for `subject` valid from now for the configured ttl.
    pub fn generate_token(&self, subject: &str) -> Result<String, AppError> {
        self.issue(subject, Utc::now(), self.ttl)
    }

    /// Verifies the signature and structure of `token` and returns its claims.
    /// Expiry is not checked here.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("token rejected: {}", e);
                AppError::InvalidToken
            })
    }

    /// True iff `token` decodes, names `expected_subject`, and `now` is before its expiry.
    pub fn is_valid(&self, token: &str, expected_subject: &str, now: DateTime<Utc>) -> bool {
        match self.decode(token) {
            Ok(claims) => claims.sub == expected_subject && now.timestamp() < claims.exp,
            Err(_) => false,
        }
    }
}
