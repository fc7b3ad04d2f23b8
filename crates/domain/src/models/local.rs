//! Local (site) domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::status::StatusCode;

/// A physical site that groups cameras.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Local {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub description: String,
    pub state: String,
    pub city: String,
    #[serde(rename = "address")]
    pub street: String,
    pub is_active: bool,
    pub status_code: StatusCode,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

/// Create/update request body for a local.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LocalInput {
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: String,

    #[serde(default)]
    #[validate(length(max = 100, message = "State must be at most 100 characters"))]
    pub state: String,

    #[serde(default)]
    #[validate(length(max = 100, message = "City must be at most 100 characters"))]
    pub city: String,

    #[serde(default, rename = "address")]
    #[validate(length(max = 255, message = "Address must be at most 255 characters"))]
    pub street: String,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl LocalInput {
    /// Trims the free-text fields before they are stored.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.state = self.state.trim().to_string();
        self.city = self.city.trim().to_string();
        self.street = self.street.trim().to_string();
        self
    }
}
