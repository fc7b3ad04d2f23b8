//! Repository implementations for database operations.

pub mod listing;
pub mod local;
pub mod product;
pub mod user;

pub use listing::{build_list_statement, BindValue, ListSource, ListStatement};
pub use local::PgLocalRepository;
pub use product::PgProductRepository;
pub use user::PgUserRepository;

use domain::DomainError;

/// Logs a driver error and converts it to the opaque domain kind.
pub(crate) fn storage_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |err| {
        tracing::error!(operation, error = %err, "Database error");
        DomainError::unexpected("storage failure")
    }
}
