//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Role, User};
use sqlx::FromRow;

pub const USER_COLUMNS: &str =
    "id, name, email, document, is_foreigner, password_hash, image_url, role, created_at, modified_at";

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub document: Option<String>,
    pub is_foreigner: bool,
    pub password_hash: String,
    pub image_url: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<UserEntity> for User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            document: entity.document,
            is_foreigner: entity.is_foreigner,
            image_url: entity.image_url,
            role: Role::from_stored(&entity.role),
            created_at: entity.created_at,
            modified_at: entity.modified_at,
        }
    }
}
