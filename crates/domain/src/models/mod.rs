//! Domain models for the camera manager.

pub mod filter;
pub mod listing;
pub mod local;
pub mod product;
pub mod status;
pub mod user;

pub use filter::{clamp_screen_count, GeneralFilter, SortColumn, SortOrder};
pub use listing::{escape_like, ListQuery, ListScope, PaginatedList, SearchRank};
pub use local::{Local, LocalInput};
pub use product::{Product, ProductInput, ProductRecord, ReadCode};
pub use status::StatusCode;
pub use user::{LoginCredentials, NewUser, RegisterUserRequest, Role, Session, User};
