//! Database entity definitions (row mappings).

pub mod local;
pub mod product;
pub mod user;

pub use local::LocalEntity;
pub use product::ProductEntity;
pub use user::UserEntity;
