//! Session token utilities using HS256.
//!
//! Session credentials are signed with a shared secret taken from configuration
//! and carry the numeric user id as subject.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Unique token identifier
    pub jti: String,
}

/// A freshly signed session token.
#[derive(Debug, Clone)]
pub struct SignedToken {
    pub token: String,
    pub jti: String,
    pub expires_at: DateTime<Utc>,
}

/// Default leeway in seconds for clock skew tolerance
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Default session lifetime: 30 days.
pub const DEFAULT_SESSION_EXPIRY_HOURS: i64 = 720;

/// Signing configuration for session tokens.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    pub expiry_hours: i64,
    pub leeway_secs: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("expiry_hours", &self.expiry_hours)
            .field("leeway_secs", &self.leeway_secs)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl JwtConfig {
    /// Creates a config from a shared secret with the default leeway.
    pub fn new(secret: &str, expiry_hours: i64) -> Result<Self, JwtError> {
        Self::with_leeway(secret, expiry_hours, DEFAULT_LEEWAY_SECS)
    }

    /// Creates a config from a shared secret with a custom leeway.
    pub fn with_leeway(secret: &str, expiry_hours: i64, leeway_secs: u64) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidKey("secret must not be empty".to_string()));
        }
        if expiry_hours <= 0 {
            return Err(JwtError::InvalidKey(
                "expiry must be a positive number of hours".to_string(),
            ));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
            leeway_secs,
        })
    }

    /// Signs a session token for the given user.
    pub fn generate_session_token(&self, user_id: i64) -> Result<SignedToken, JwtError> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.expiry_hours);
        self.sign(user_id, now, expires_at)
    }

    fn sign(
        &self,
        user_id: i64,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<SignedToken, JwtError> {
        let jti = Uuid::new_v4().to_string();
        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
            jti: jti.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))?;

        // Round to the second precision carried by the token.
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or_else(|| JwtError::EncodingError("expiry out of range".to_string()))?;

        Ok(SignedToken {
            token,
            jti,
            expires_at,
        })
    }

    /// Validates a token and returns its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidToken,
                _ => JwtError::DecodingError(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Validates a token and returns the user id it was issued for.
    pub fn user_id_from_token(&self, token: &str) -> Result<i64, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.sub <= 0 {
            return Err(JwtError::InvalidToken);
        }
        Ok(claims.sub)
    }
}
