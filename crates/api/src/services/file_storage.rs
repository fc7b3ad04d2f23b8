//! Disk-backed store for uploaded images.
//!
//! Images arrive base64 encoded (optionally as a data URI) with a path hint
//! such as `images/products/<uuid>`. They are written under the storage root
//! and published as `<public_base_url>/files/<category>/<file>`.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use domain::ports::FileStorage;
use domain::{DomainError, DomainResult};
use std::path::{Path, PathBuf};

/// Directory under the storage root holding every uploaded image.
const IMAGES_DIR: &str = "images";

/// Sub-directories that can be served back over HTTP.
pub const FILE_CATEGORIES: &[&str] = &["products", "users"];

pub struct DiskFileStorage {
    root: PathBuf,
    public_base_url: String,
}

impl DiskFileStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Location on disk of a served file, if the category and name are acceptable.
    pub fn resolve(&self, category: &str, file_name: &str) -> Option<PathBuf> {
        if !FILE_CATEGORIES.contains(&category) || !is_safe_file_name(file_name) {
            return None;
        }
        Some(self.root.join(IMAGES_DIR).join(category).join(file_name))
    }

    fn url_for(&self, category: &str, file_name: &str) -> String {
        format!("{}/files/{}/{}", self.public_base_url, category, file_name)
    }

    /// Maps one of our own URLs back to its file.
    fn path_for_url(&self, url: &str) -> Option<PathBuf> {
        let rest = url.strip_prefix(&self.public_base_url)?;
        let rest = rest.strip_prefix("/files/")?;
        let (category, file_name) = rest.split_once('/')?;
        self.resolve(category, file_name)
    }
}

/// A single path component with no traversal.
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && !name.contains("..")
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}

/// Splits a data URI into its declared extension and payload.
fn split_data_uri(data: &str) -> (Option<&'static str>, &str) {
    let Some(rest) = data.strip_prefix("data:") else {
        return (None, data);
    };
    match rest.split_once(',') {
        Some((meta, payload)) => {
            let mime = meta.split(';').next().unwrap_or_default();
            (extension_for_mime(mime), payload)
        }
        None => (None, data),
    }
}

fn extension_for_mime(mime: &str) -> Option<&'static str> {
    match mime.to_ascii_lowercase().as_str() {
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

fn sniff_extension(bytes: &[u8]) -> &'static str {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => "png",
        [b'G', b'I', b'F', b'8', ..] => "gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "webp",
        _ => "jpg",
    }
}

/// Decodes an uploaded image into bytes plus the extension to store it under.
pub fn decode_image(data: &str) -> DomainResult<(Vec<u8>, &'static str)> {
    let (declared, payload) = split_data_uri(data.trim());
    let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(cleaned.as_bytes())
        .map_err(|_| DomainError::invalid("image is not valid base64"))?;
    if bytes.is_empty() {
        return Err(DomainError::invalid("image is empty"));
    }
    let extension = declared.unwrap_or_else(|| sniff_extension(&bytes));
    Ok((bytes, extension))
}

fn split_hint(path_hint: &str) -> DomainResult<(&str, &str)> {
    let rest = path_hint
        .strip_prefix(IMAGES_DIR)
        .and_then(|r| r.strip_prefix('/'))
        .unwrap_or(path_hint);
    let (category, stem) = rest
        .split_once('/')
        .ok_or_else(|| DomainError::unexpected(format!("bad image path {}", path_hint)))?;
    if !FILE_CATEGORIES.contains(&category) || !is_safe_file_name(stem) {
        return Err(DomainError::unexpected(format!("bad image path {}", path_hint)));
    }
    Ok((category, stem))
}

async fn write_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await
}

#[async_trait]
impl FileStorage for DiskFileStorage {
    async fn save_encoded_image(&self, data: String, path_hint: String) -> DomainResult<String> {
        let (category, stem) = split_hint(&path_hint)?;
        let (bytes, extension) = decode_image(&data)?;
        let file_name = format!("{}.{}", stem, extension);
        let path = self.root.join(IMAGES_DIR).join(category).join(&file_name);

        write_file(&path, &bytes).await.map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Failed to write image");
            DomainError::unexpected("failed to store image")
        })?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "Stored image");
        Ok(self.url_for(category, &file_name))
    }

    async fn delete(&self, url: String) -> DomainResult<()> {
        let Some(path) = self.path_for_url(&url) else {
            tracing::debug!(url = %url, "Not a stored file, nothing to delete");
            return Ok(());
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to delete image");
                Err(DomainError::unexpected("failed to delete image"))
            }
        }
    }
}
