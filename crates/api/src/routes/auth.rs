//! Login, logout, registration and the caller's own profile.

use axum::{extract::State, http::HeaderMap, Json};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use domain::models::{LoginCredentials, RegisterUserRequest, User};
use domain::DomainError;
use serde::Serialize;

use super::MutationResponse;
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{metrics::record_login, CurrentUser};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

/// Checks the credentials and hands out the session cookie.
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(credentials), _): WithRejection<Json<LoginCredentials>, ApiError>,
) -> Result<(HeaderMap, Json<LoginResponse>), ApiError> {
    let session = state.auth.login(credentials).await.inspect_err(|e| {
        record_login(match e {
            DomainError::Unexpected(_) => "error",
            _ => "rejected",
        })
    })?;
    record_login("success");

    let mut headers = HeaderMap::new();
    state.cookies.add_session_cookie(&mut headers, &session.token);

    Ok((
        headers,
        Json(LoginResponse {
            success: true,
            user_id: session.user.id,
            expires_at: session.expires_at,
        }),
    ))
}

/// Drops the session cookie. Succeeds with or without a session.
pub async fn logout(State(state): State<AppState>) -> (HeaderMap, Json<MutationResponse>) {
    let mut headers = HeaderMap::new();
    state.cookies.add_clear_cookie(&mut headers);
    (headers, Json(MutationResponse::done()))
}

pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<RegisterUserRequest>, ApiError>,
) -> Result<Json<MutationResponse>, ApiError> {
    let id = state.auth.register(request).await?;
    Ok(Json(MutationResponse::created(id)))
}

pub async fn personal_information(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}
