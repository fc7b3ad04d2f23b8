//! Product entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Product, StatusCode};
use sqlx::FromRow;

/// Columns selected for every product read.
pub const PRODUCT_COLUMNS: &str = "id, user_id, local_id, name, description, is_active, \
     status_code, parameter, ip_address, port, username, password, stream_path, \
     camera_type, stream_url, image_url, created_at, modified_at";

/// Database row mapping for the products table.
#[derive(Debug, Clone, FromRow)]
pub struct ProductEntity {
    pub id: i64,
    pub user_id: i64,
    pub local_id: i64,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub status_code: i16,
    pub parameter: bool,
    pub ip_address: String,
    pub port: i32,
    pub username: String,
    pub password: String,
    pub stream_path: String,
    pub camera_type: String,
    pub stream_url: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<ProductEntity> for Product {
    fn from(entity: ProductEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            local_id: entity.local_id,
            name: entity.name,
            description: entity.description,
            is_active: entity.is_active,
            status_code: StatusCode::try_from(entity.status_code).unwrap_or_default(),
            parameter: entity.parameter,
            ip_address: entity.ip_address,
            port: entity.port,
            username: entity.username,
            password: entity.password,
            stream_path: entity.stream_path,
            camera_type: entity.camera_type,
            stream_url: entity.stream_url,
            image_url: entity.image_url,
            created_at: entity.created_at,
            modified_at: entity.modified_at,
        }
    }
}
