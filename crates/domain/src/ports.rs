//! Collaborator interfaces the use cases depend on.
//!
//! Implementations live in the persistence and api crates. Every method takes
//! owned arguments so the traits can be mocked in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::DomainResult;
use crate::models::{
    ListQuery, Local, LocalInput, NewUser, PaginatedList, Product, ProductRecord, StatusCode,
    User,
};

/// Storage for products (cameras).
///
/// Reads never return deleted rows, and every owner-scoped call only touches
/// rows whose `user_id` equals `owner_id`.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Inserts the row and stamps `status` in one transaction.
    async fn create(&self, owner_id: i64, record: ProductRecord, status: StatusCode)
        -> DomainResult<i64>;

    async fn set_status_code(&self, owner_id: i64, id: i64, status: StatusCode)
        -> DomainResult<()>;

    /// Ranked, paginated listing following the [`ListQuery`] contract.
    async fn list(&self, query: ListQuery) -> DomainResult<PaginatedList<Product>>;

    async fn get_by_id(&self, owner_id: i64, id: i64) -> DomainResult<Option<Product>>;

    /// Returns `false` when no live row matched.
    async fn edit(&self, owner_id: i64, id: i64, record: ProductRecord) -> DomainResult<bool>;

    async fn soft_delete(&self, owner_id: i64, id: i64) -> DomainResult<()>;

    /// Sets or clears the read flag. Returns `false` when no row matched.
    async fn set_parameter_flag(&self, owner_id: i64, id: i64, flag: bool) -> DomainResult<bool>;

    /// Active, non-deleted products of every owner.
    async fn list_recordable(&self) -> DomainResult<Vec<Product>>;
}

/// Storage for locals (sites).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait LocalRepository: Send + Sync {
    /// Inserts the row and stamps `status` in one transaction.
    async fn create(&self, owner_id: i64, input: LocalInput, status: StatusCode)
        -> DomainResult<i64>;

    async fn set_status_code(&self, owner_id: i64, id: i64, status: StatusCode)
        -> DomainResult<()>;

    async fn list(&self, query: ListQuery) -> DomainResult<PaginatedList<Local>>;

    async fn get_by_id(&self, owner_id: i64, id: i64) -> DomainResult<Option<Local>>;

    /// Returns `false` when no live row matched.
    async fn edit(&self, owner_id: i64, id: i64, input: LocalInput) -> DomainResult<bool>;

    async fn soft_delete(&self, owner_id: i64, id: i64) -> DomainResult<()>;

    /// True when the local exists for the owner, is active and not deleted.
    async fn exists_active(&self, owner_id: i64, id: i64) -> DomainResult<bool>;
}

/// Credential lookups used by login and session resolution.
///
/// `login` is either an email or a normalised document.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn user_exists(&self, login: String) -> DomainResult<bool>;

    async fn compare_password_hash(&self, login: String, password: String) -> DomainResult<bool>;

    async fn get_by_login(&self, login: String) -> DomainResult<Option<User>>;

    async fn get_by_id(&self, id: i64) -> DomainResult<Option<User>>;
}

/// Account creation.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRegistry: Send + Sync {
    async fn email_exists(&self, email: String) -> DomainResult<bool>;

    async fn document_exists(&self, document: String) -> DomainResult<bool>;

    async fn create(&self, user: NewUser) -> DomainResult<i64>;
}

/// Blob store for uploaded images.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Decodes a base64 payload (raw or data URI) and stores it under
    /// `path_hint`, returning the public URL.
    async fn save_encoded_image(&self, data: String, path_hint: String) -> DomainResult<String>;

    /// Removes a previously stored file given its public URL.
    async fn delete(&self, url: String) -> DomainResult<()>;
}

/// Signs session credentials.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait SessionIssuer: Send + Sync {
    fn issue(&self, user_id: i64) -> DomainResult<(String, DateTime<Utc>)>;
}
