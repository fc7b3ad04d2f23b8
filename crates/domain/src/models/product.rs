//! Product (camera) domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::status::StatusCode;

/// A managed camera record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub user_id: i64,
    pub local_id: i64,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub status_code: StatusCode,
    /// Included in the "read" working set.
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

impl Product {
    /// RTSP source address used by the recorder.
    pub fn rtsp_url(&self) -> String {
        let path = if self.stream_path.is_empty() || self.stream_path.starts_with('/') {
            self.stream_path.clone()
        } else {
            format!("/{}", self.stream_path)
        };
        format!(
            "rtsp://{}:{}@{}:{}{}",
            self.username, self.password, self.ip_address, self.port, path
        )
    }
}

fn default_true() -> bool {
    true
}

/// Create/update request body for a product.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: String,

    #[validate(range(min = 1, message = "localId must reference a local"))]
    pub local_id: i64,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[validate(length(min = 1, max = 255, message = "ipAddress must be 1-255 characters"))]
    pub ip_address: String,

    #[validate(custom(function = "shared::validation::validate_port"))]
    pub port: i32,

    #[serde(default)]
    #[validate(length(max = 255, message = "Username must be at most 255 characters"))]
    pub username: String,

    #[serde(default)]
    #[validate(length(max = 255, message = "Password must be at most 255 characters"))]
    pub password: String,

    #[serde(default)]
    #[validate(length(max = 500, message = "streamPath must be at most 500 characters"))]
    pub stream_path: String,

    #[validate(length(min = 1, max = 50, message = "cameraType must be 1-50 characters"))]
    pub camera_type: String,

    #[serde(default)]
    pub stream_url: Option<String>,

    /// Base64 image or data URI; an http(s) URL is kept as is.
    #[serde(default)]
    pub image_base64: Option<String>,
}

/// Field values written to storage on create and edit.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub local_id: i64,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub ip_address: String,
    pub port: i32,
    pub username: String,
    pub password: String,
    pub stream_path: String,
    pub camera_type: String,
    pub stream_url: Option<String>,
    pub image_url: Option<String>,
}

impl ProductRecord {
    pub fn from_input(input: ProductInput, image_url: Option<String>) -> Self {
        Self {
            local_id: input.local_id,
            name: input.name.trim().to_string(),
            description: input.description,
            is_active: input.is_active,
            ip_address: input.ip_address.trim().to_string(),
            port: input.port,
            username: input.username,
            password: input.password,
            stream_path: input.stream_path,
            camera_type: input.camera_type,
            stream_url: input.stream_url,
            image_url,
        }
    }
}

/// Body of a read-product request: `type` is `barcode` or `qrcode`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadCode {
    #[serde(default)]
    pub code: String,
    #[serde(default, rename = "type")]
    pub code_type: String,
}

impl ReadCode {
    /// Resolves the scanned code into a product id.
    ///
    /// Both barcodes and QR codes carry the decimal product id.
    pub fn product_id(&self) -> Result<i64, String> {
        let code = self.code.trim();
        let code_type = self.code_type.trim();
        if code.is_empty() || code_type.is_empty() {
            return Err("code and type are required".to_string());
        }

        match code_type.to_lowercase().as_str() {
            "barcode" | "qrcode" => code
                .parse::<i64>()
                .ok()
                .filter(|id| *id > 0)
                .ok_or_else(|| "code must be a product id".to_string()),
            other => Err(format!("Unsupported code type: {}", other)),
        }
    }
}
