//! Soft lifecycle marker shared by products and locals.

use serde::{Deserialize, Serialize};

/// Lifecycle status stored alongside every product and local.
///
/// Deletion is logical: rows move to `Deleted` and drop out of every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i16", try_from = "i16")]
pub enum StatusCode {
    #[default]
    Exists,
    Flagged,
    Deleted,
}

impl StatusCode {
    pub fn as_i16(self) -> i16 {
        match self {
            StatusCode::Exists => 0,
            StatusCode::Flagged => 1,
            StatusCode::Deleted => 2,
        }
    }

    pub fn is_deleted(self) -> bool {
        matches!(self, StatusCode::Deleted)
    }
}

impl From<StatusCode> for i16 {
    fn from(status: StatusCode) -> Self {
        status.as_i16()
    }
}

impl TryFrom<i16> for StatusCode {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(StatusCode::Exists),
            1 => Ok(StatusCode::Flagged),
            2 => Ok(StatusCode::Deleted),
            other => Err(format!("Unknown status code: {}", other)),
        }
    }
}
