//! Error taxonomy shared by every use case.

use thiserror::Error;

/// Error kinds surfaced by use cases and storage ports.
///
/// Messages are safe to show to callers; storage details are logged where
/// they occur and never carried here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A record points at a related record that is missing, deleted or inactive.
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl DomainError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        DomainError::InvalidParameter(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        DomainError::NotFound(msg.into())
    }

    pub fn unexpected(msg: impl Into<String>) -> Self {
        DomainError::Unexpected(msg.into())
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "is invalid".to_string());
                format!("{}: {}", field, message)
            })
            .collect();
        fields.sort();
        DomainError::InvalidParameter(fields.join("; "))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
