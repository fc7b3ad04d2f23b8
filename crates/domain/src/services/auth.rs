//! Authentication use cases: login, registration and profile lookup.
//!
//! These run before a session exists and are not behind the permission layer.

use std::sync::Arc;

use async_trait::async_trait;
use shared::validation::{capitalize_words, fold_accents, normalize_login, strip_document_separators};
use uuid::Uuid;
use validator::Validate;

use crate::error::{DomainError, DomainResult};
use crate::models::{LoginCredentials, NewUser, RegisterUserRequest, Role, Session, User};
use crate::ports::{CredentialVerifier, FileStorage, SessionIssuer, UserRegistry};

/// Outward message for every failed login, whatever the cause.
const LOGIN_FAILED: &str = "invalid login or password";

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AuthUseCase: Send + Sync {
    async fn login(&self, credentials: LoginCredentials) -> DomainResult<Session>;

    /// Creates an account and returns its id.
    async fn register(&self, request: RegisterUserRequest) -> DomainResult<i64>;

    async fn get_user_by_id(&self, id: i64) -> DomainResult<User>;
}

pub struct AuthService {
    credentials: Arc<dyn CredentialVerifier>,
    registry: Arc<dyn UserRegistry>,
    files: Arc<dyn FileStorage>,
    sessions: Arc<dyn SessionIssuer>,
    registration_role: Role,
}

impl AuthService {
    pub fn new(
        credentials: Arc<dyn CredentialVerifier>,
        registry: Arc<dyn UserRegistry>,
        files: Arc<dyn FileStorage>,
        sessions: Arc<dyn SessionIssuer>,
        registration_role: Role,
    ) -> Self {
        Self {
            credentials,
            registry,
            files,
            sessions,
            registration_role,
        }
    }

    fn login_failed() -> DomainError {
        DomainError::Forbidden(LOGIN_FAILED.to_string())
    }
}

#[async_trait]
impl AuthUseCase for AuthService {
    async fn login(&self, credentials: LoginCredentials) -> DomainResult<Session> {
        let login = credentials.login.trim();
        if login.is_empty() {
            return Err(DomainError::invalid("login cannot be empty"));
        }
        if credentials.password.is_empty() {
            return Err(DomainError::invalid("password cannot be empty"));
        }

        let login = normalize_login(login);

        if !self.credentials.user_exists(login.clone()).await? {
            tracing::debug!("Login rejected: unknown login");
            return Err(Self::login_failed());
        }

        let user = self
            .credentials
            .get_by_login(login.clone())
            .await?
            .ok_or_else(Self::login_failed)?;

        let password = fold_accents(&credentials.password);
        if !self
            .credentials
            .compare_password_hash(login, password)
            .await?
        {
            tracing::debug!(user_id = user.id, "Login rejected: wrong password");
            return Err(Self::login_failed());
        }

        let (token, expires_at) = self.sessions.issue(user.id)?;

        tracing::info!(user_id = user.id, "User logged in");
        Ok(Session {
            user,
            token,
            expires_at,
        })
    }

    async fn register(&self, request: RegisterUserRequest) -> DomainResult<i64> {
        request.validate()?;

        let email = request.email.trim().to_lowercase();
        let document = request
            .document
            .as_deref()
            .map(strip_document_separators)
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        if !request.is_foreigner && document.is_none() {
            return Err(DomainError::invalid("document is required"));
        }

        if self.registry.email_exists(email.clone()).await? {
            return Err(DomainError::invalid("email already registered"));
        }
        if let Some(document) = &document {
            if self.registry.document_exists(document.clone()).await? {
                return Err(DomainError::invalid("document already registered"));
            }
        }

        let password_hash = shared::password::hash_password(&fold_accents(&request.password))
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to hash password");
                DomainError::unexpected("could not register user")
            })?;

        let image_url = match request.image_base64.filter(|d| !d.trim().is_empty()) {
            None => None,
            Some(url) if shared::validation::is_http_url(&url) => Some(url),
            Some(data) => {
                let hint = format!("images/users/{}", Uuid::new_v4());
                Some(self.files.save_encoded_image(data, hint).await?)
            }
        };

        let new_user = NewUser {
            name: capitalize_words(request.name.trim()),
            email,
            document,
            is_foreigner: request.is_foreigner,
            password_hash,
            image_url,
            role: self.registration_role,
        };

        let id = self.registry.create(new_user).await?;
        tracing::info!(user_id = id, "User registered");
        Ok(id)
    }

    async fn get_user_by_id(&self, id: i64) -> DomainResult<User> {
        if id <= 0 {
            return Err(DomainError::invalid("id must be positive"));
        }
        self.credentials
            .get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("user {}", id)))
    }
}
