//! User repository: credential lookups and registration.

use async_trait::async_trait;
use domain::models::{NewUser, User};
use domain::ports::{CredentialVerifier, UserRegistry};
use domain::{DomainError, DomainResult};
use sqlx::PgPool;

use super::storage_error;
use crate::entities::user::USER_COLUMNS;
use crate::entities::UserEntity;
use crate::metrics::QueryTimer;

/// A login matches either the email (case-insensitive) or the document.
const LOGIN_MATCH: &str = "(LOWER(email) = LOWER($1) OR document = $1)";

/// Maps a unique-index violation on insert to the duplicate the caller sent.
fn registration_conflict(err: &sqlx::Error) -> Option<&'static str> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    // 23505 = unique_violation
    if db_err.code().as_deref() != Some("23505") {
        return None;
    }
    match db_err.constraint() {
        Some("idx_users_document") => Some("document already registered"),
        _ => Some("email already registered"),
    }
}

/// PostgreSQL-backed user storage.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_by_login(&self, login: &str) -> DomainResult<Option<UserEntity>> {
        let timer = QueryTimer::new("find_user_by_login");
        let sql = format!(
            "SELECT {} FROM users WHERE {} ORDER BY id LIMIT 1",
            USER_COLUMNS, LOGIN_MATCH
        );
        let result = sqlx::query_as::<_, UserEntity>(&sql)
            .bind(login)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result.map_err(storage_error("find_user_by_login"))
    }

    async fn exists(&self, operation: &'static str, sql: &str, value: String) -> DomainResult<bool> {
        let timer = QueryTimer::new(operation);
        let result = sqlx::query_scalar::<_, bool>(sql)
            .bind(value)
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result.map_err(storage_error(operation))
    }
}

#[async_trait]
impl CredentialVerifier for PgUserRepository {
    async fn user_exists(&self, login: String) -> DomainResult<bool> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM users WHERE {})", LOGIN_MATCH);
        self.exists("user_exists", &sql, login).await
    }

    async fn compare_password_hash(&self, login: String, password: String) -> DomainResult<bool> {
        let Some(user) = self.find_by_login(&login).await? else {
            return Ok(false);
        };

        // Argon2 is CPU bound; keep it off the async workers.
        let hash = user.password_hash;
        tokio::task::spawn_blocking(move || shared::password::verify_password(&password, &hash))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Password verification task failed");
                DomainError::unexpected("credential check failed")
            })?
            .map_err(|e| {
                tracing::error!(user_id = user.id, error = %e, "Stored password hash is invalid");
                DomainError::unexpected("credential check failed")
            })
    }

    async fn get_by_login(&self, login: String) -> DomainResult<Option<User>> {
        Ok(self.find_by_login(&login).await?.map(User::from))
    }

    async fn get_by_id(&self, id: i64) -> DomainResult<Option<User>> {
        let timer = QueryTimer::new("find_user_by_id");
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let result = sqlx::query_as::<_, UserEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        Ok(result
            .map_err(storage_error("find_user_by_id"))?
            .map(User::from))
    }
}

#[async_trait]
impl UserRegistry for PgUserRepository {
    async fn email_exists(&self, email: String) -> DomainResult<bool> {
        self.exists(
            "email_exists",
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))",
            email,
        )
        .await
    }

    async fn document_exists(&self, document: String) -> DomainResult<bool> {
        self.exists(
            "document_exists",
            "SELECT EXISTS(SELECT 1 FROM users WHERE document = $1)",
            document,
        )
        .await
    }

    async fn create(&self, user: NewUser) -> DomainResult<i64> {
        let timer = QueryTimer::new("create_user");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (name, email, document, is_foreigner, password_hash, image_url, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(user.name)
        .bind(user.email)
        .bind(user.document)
        .bind(user.is_foreigner)
        .bind(user.password_hash)
        .bind(user.image_url)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await;
        timer.record();

        if let Err(err) = &result {
            if let Some(message) = registration_conflict(err) {
                tracing::info!(conflict = message, "Registration lost a uniqueness race");
                return Err(DomainError::invalid(message));
            }
        }
        result.map_err(storage_error("create_user"))
    }
}
