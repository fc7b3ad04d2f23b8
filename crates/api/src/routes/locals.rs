//! Local (site) endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use domain::models::{GeneralFilter, Local, LocalInput, PaginatedList};

use super::MutationResponse;
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;

pub async fn create_local(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Json(input), _): WithRejection<Json<LocalInput>, ApiError>,
) -> Result<Json<MutationResponse>, ApiError> {
    let id = state.locals.create(user, input).await?;
    Ok(Json(MutationResponse::created(id)))
}

pub async fn list_locals(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Query(filter), _): WithRejection<Query<GeneralFilter>, ApiError>,
) -> Result<Json<PaginatedList<Local>>, ApiError> {
    Ok(Json(state.locals.list(user, filter).await?))
}

pub async fn get_local(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Json<Local>, ApiError> {
    Ok(Json(state.locals.get_by_id(user, id).await?))
}

pub async fn update_local(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(input), _): WithRejection<Json<LocalInput>, ApiError>,
) -> Result<Json<MutationResponse>, ApiError> {
    state.locals.edit(user, id, input).await?;
    Ok(Json(MutationResponse::done()))
}

pub async fn delete_local(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Json<MutationResponse>, ApiError> {
    state.locals.delete(user, id).await?;
    Ok(Json(MutationResponse::done()))
}
