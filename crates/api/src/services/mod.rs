//! Adapters the use cases are wired with: session tokens, cookies and image storage.

pub mod cookies;
pub mod file_storage;
pub mod session;

pub use cookies::CookieHelper;
pub use file_storage::DiskFileStorage;
pub use session::JwtSessionIssuer;
