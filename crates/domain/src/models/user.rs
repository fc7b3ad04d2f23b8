//! User domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

/// Role tier assigned at registration.
///
/// `None` stands for an account without a recognised tier and is denied every
/// gated action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Master,
    Flat1,
    Flat2,
    Flat3,
    #[default]
    None,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Master => "master",
            Role::Flat1 => "flat1",
            Role::Flat2 => "flat2",
            Role::Flat3 => "flat3",
            Role::None => "none",
        }
    }

    /// Tiers that are recognised by the authorization policy.
    pub fn tiers() -> &'static [Role] {
        &[Role::Master, Role::Flat1, Role::Flat2, Role::Flat3]
    }

    /// Maps a stored role name to a tier. Unknown names fall back to `None`.
    pub fn from_stored(value: &str) -> Role {
        value.parse().unwrap_or(Role::None)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "master" => Ok(Role::Master),
            "flat1" => Ok(Role::Flat1),
            "flat2" => Ok(Role::Flat2),
            "flat3" => Ok(Role::Flat3),
            "none" => Ok(Role::None),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An account as seen by the use-case layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub document: Option<String>,
    pub is_foreigner: bool,
    pub image_url: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Login request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginCredentials {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(max = 32, message = "Document must be at most 32 characters"))]
    pub document: Option<String>,

    #[serde(default)]
    pub is_foreigner: bool,

    #[validate(length(min = 6, max = 128, message = "Password must be 6-128 characters"))]
    pub password: String,

    #[serde(default)]
    pub image_base64: Option<String>,
}

/// A validated account ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub document: Option<String>,
    pub is_foreigner: bool,
    pub password_hash: String,
    pub image_url: Option<String>,
    pub role: Role,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
