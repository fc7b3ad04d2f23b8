//! Session cookie authentication.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::models::User;
use domain::DomainError;

use crate::app::AppState;
use crate::error::ApiError;

/// The user owning the session of the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Resolves the session cookie to a user.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let token = state
        .cookies
        .extract_session_token(headers)
        .ok_or_else(|| ApiError::Unauthorized("Missing session".to_string()))?;

    let user_id = state.sessions.verify(token).map_err(|e| {
        tracing::debug!(error = %e, "Session token rejected");
        ApiError::Unauthorized("Invalid or expired session".to_string())
    })?;

    state
        .auth
        .get_user_by_id(user_id)
        .await
        .map_err(|e| match e {
            DomainError::NotFound(_) | DomainError::InvalidParameter(_) => {
                tracing::debug!(user_id, "Session refers to an unknown user");
                ApiError::Unauthorized("Invalid or expired session".to_string())
            }
            other => other.into(),
        })
}

/// Rejects requests without a valid session and exposes the user to handlers
/// as a [`CurrentUser`] extension.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match authenticate(&state, req.headers()).await {
        Ok(user) => {
            req.extensions_mut().insert(CurrentUser(user));
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}
