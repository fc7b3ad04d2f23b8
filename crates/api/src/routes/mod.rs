//! HTTP route handlers.

use serde::Serialize;

pub mod auth;
pub mod files;
pub mod health;
pub mod locals;
pub mod products;

/// Body of a successful mutation. Creates also carry the new id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl MutationResponse {
    pub fn done() -> Self {
        Self {
            success: true,
            id: None,
        }
    }

    pub fn created(id: i64) -> Self {
        Self {
            success: true,
            id: Some(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_response_shape() {
        assert_eq!(
            serde_json::to_value(MutationResponse::done()).unwrap(),
            serde_json::json!({ "success": true })
        );
        assert_eq!(
            serde_json::to_value(MutationResponse::created(7)).unwrap(),
            serde_json::json!({ "success": true, "id": 7 })
        );
    }
}
