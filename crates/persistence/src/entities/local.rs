//! Local entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Local, StatusCode};
use sqlx::FromRow;

pub const LOCAL_COLUMNS: &str = "id, user_id, name, description, state, city, street, \
     is_active, status_code, created_at, modified_at";

/// Database row mapping for the locals table.
#[derive(Debug, Clone, FromRow)]
pub struct LocalEntity {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: String,
    pub state: String,
    pub city: String,
    pub street: String,
    pub is_active: bool,
    pub status_code: i16,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<LocalEntity> for Local {
    fn from(entity: LocalEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            name: entity.name,
            description: entity.description,
            state: entity.state,
            city: entity.city,
            street: entity.street,
            is_active: entity.is_active,
            status_code: StatusCode::try_from(entity.status_code).unwrap_or_default(),
            created_at: entity.created_at,
            modified_at: entity.modified_at,
        }
    }
}
