//! Category API handlers

use crate::api::{MessageResponse, SuccessResponse};
use crate::domain::{Caller, Category, CategoryInput, StringUuid};
use crate::error::Result;
use crate::state::HasServices;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

#[utoipa::path(
    get,
    path = "/api/category",
    tag = "Catalog",
    responses((status = 200, description = "All categories", body = Vec<Category>))
)]
/// List categories
pub async fn list<S: HasServices>(State(state): State<S>) -> Result<impl IntoResponse> {
    let categories = state.category_service().list().await?;
    Ok(Json(SuccessResponse::new(categories)))
}

#[utoipa::path(
    post,
    path = "/api/category",
    tag = "Catalog",
    request_body = CategoryInput,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 403, description = "Administrator role required"),
        (status = 409, description = "Name taken")
    )
)]
/// Create a category
pub async fn create<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Json(input): Json<CategoryInput>,
) -> Result<impl IntoResponse> {
    let category = state.category_service().create(input, &caller).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(category))))
}

#[utoipa::path(
    put,
    path = "/api/category/{id}",
    tag = "Catalog",
    params(("id" = StringUuid, Path, description = "Category ID")),
    request_body = CategoryInput,
    responses(
        (status = 200, description = "Category renamed", body = Category),
        (status = 404, description = "No such category")
    )
)]
/// Rename a category
pub async fn update<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(id): Path<StringUuid>,
    Json(input): Json<CategoryInput>,
) -> Result<impl IntoResponse> {
    let category = state.category_service().update(id, input, &caller).await?;
    Ok(Json(SuccessResponse::new(category)))
}

#[utoipa::path(
    delete,
    path = "/api/category/{id}",
    tag = "Catalog",
    params(("id" = StringUuid, Path, description = "Category ID")),
    responses((status = 200, description = "Category deleted", body = MessageResponse))
)]
/// Delete a category
pub async fn delete<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    state.category_service().delete(id, &caller).await?;
    Ok(Json(MessageResponse::new("Category deleted successfully")))
}
