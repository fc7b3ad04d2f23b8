//! Use cases and the authorization layer around them.

pub mod auth;
pub mod authorization;
pub mod local;
pub mod permission;
pub mod product;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::{AuthService, AuthUseCase};
pub use authorization::{authorize, is_allowed, Action, POLICY};
pub use local::{LocalService, LocalUseCase};
pub use permission::{PermissionLocalUseCase, PermissionProductUseCase};
pub use product::{ProductService, ProductUseCase};

#[cfg(any(test, feature = "testing"))]
pub use auth::MockAuthUseCase;
#[cfg(any(test, feature = "testing"))]
pub use local::MockLocalUseCase;
#[cfg(any(test, feature = "testing"))]
pub use product::MockProductUseCase;
