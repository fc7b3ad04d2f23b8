//! Session issuing and verification backed by HS256 tokens.

use chrono::{DateTime, Utc};
use domain::ports::SessionIssuer;
use domain::{DomainError, DomainResult};
use shared::jwt::{JwtConfig, JwtError};

use crate::config::SecurityConfig;

#[derive(Debug, Clone)]
pub struct JwtSessionIssuer {
    jwt: JwtConfig,
}

impl JwtSessionIssuer {
    pub fn new(jwt: JwtConfig) -> Self {
        Self { jwt }
    }

    pub fn from_config(config: &SecurityConfig) -> Result<Self, JwtError> {
        JwtConfig::with_leeway(
            &config.jwt_secret,
            config.session_expiry_hours,
            config.leeway_secs,
        )
        .map(Self::new)
    }

    /// Returns the user id a session token was issued for.
    pub fn verify(&self, token: &str) -> Result<i64, JwtError> {
        self.jwt.user_id_from_token(token)
    }
}

impl SessionIssuer for JwtSessionIssuer {
    fn issue(&self, user_id: i64) -> DomainResult<(String, DateTime<Utc>)> {
        let signed = self.jwt.generate_session_token(user_id).map_err(|e| {
            tracing::error!(user_id, error = %e, "Failed to sign session token");
            DomainError::unexpected("could not start session")
        })?;
        Ok((signed.token, signed.expires_at))
    }
}
