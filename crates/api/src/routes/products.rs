//! Camera (product) endpoints, including the "read" working set.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use domain::models::{GeneralFilter, PaginatedList, Product, ProductInput, ReadCode};

use super::MutationResponse;
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;

type JsonBody<T> = WithRejection<Json<T>, ApiError>;
type IdPath = WithRejection<Path<i64>, ApiError>;
type FilterQuery = WithRejection<Query<GeneralFilter>, ApiError>;

pub async fn create_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Json(input), _): JsonBody<ProductInput>,
) -> Result<Json<MutationResponse>, ApiError> {
    let id = state.products.create(user, input).await?;
    Ok(Json(MutationResponse::created(id)))
}

pub async fn list_products(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Query(filter), _): FilterQuery,
) -> Result<Json<PaginatedList<Product>>, ApiError> {
    Ok(Json(state.products.list(user, filter).await?))
}

pub async fn get_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Path(id), _): IdPath,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.products.get_by_id(user, id).await?))
}

pub async fn update_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Path(id), _): IdPath,
    WithRejection(Json(input), _): JsonBody<ProductInput>,
) -> Result<Json<MutationResponse>, ApiError> {
    state.products.edit(user, id, input).await?;
    Ok(Json(MutationResponse::done()))
}

pub async fn delete_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Path(id), _): IdPath,
) -> Result<Json<MutationResponse>, ApiError> {
    state.products.delete(user, id).await?;
    Ok(Json(MutationResponse::done()))
}

/// Adds a scanned camera to the read working set.
pub async fn read_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Json(code), _): JsonBody<ReadCode>,
) -> Result<Json<MutationResponse>, ApiError> {
    let id = code.product_id().map_err(ApiError::Validation)?;
    state.products.set_read(user, id).await?;
    Ok(Json(MutationResponse::done()))
}

pub async fn delete_read_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Path(id), _): IdPath,
) -> Result<Json<MutationResponse>, ApiError> {
    state.products.clear_read(user, id).await?;
    Ok(Json(MutationResponse::done()))
}

pub async fn list_read_products(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Query(filter), _): FilterQuery,
) -> Result<Json<PaginatedList<Product>>, ApiError> {
    Ok(Json(state.products.list_read(user, filter).await?))
}
