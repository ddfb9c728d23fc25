//! Menu API handlers

use crate::api::{MessageResponse, PaginatedResponse, PaginationQuery, SuccessResponse};
use crate::domain::{Caller, Menu, MenuInput, StringUuid};
use crate::error::Result;
use crate::state::HasServices;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

#[utoipa::path(
    get,
    path = "/api/menus",
    tag = "Catalog",
    params(PaginationQuery),
    responses((status = 200, description = "Visible menus", body = Vec<Menu>))
)]
/// Search visible menus across visible restaurants
pub async fn search<S: HasServices>(
    State(state): State<S>,
    Query(query): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let request = query.page_request();
    let page = state
        .menu_service()
        .search(request, query.search.as_deref())
        .await?;
    Ok(Json(PaginatedResponse::from_page(page, request)))
}

#[utoipa::path(
    get,
    path = "/api/menus/{id}",
    tag = "Catalog",
    params(("id" = StringUuid, Path, description = "Restaurant ID"), PaginationQuery),
    responses(
        (status = 200, description = "Visible menus of the restaurant", body = Vec<Menu>),
        (status = 404, description = "Restaurant absent, hidden or deleted")
    )
)]
/// Menus of one restaurant
pub async fn list_by_restaurant<S: HasServices>(
    State(state): State<S>,
    Path(restaurant_id): Path<StringUuid>,
    Query(query): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let request = query.page_request();
    let page = state
        .menu_service()
        .list_by_restaurant(restaurant_id, request)
        .await?;
    Ok(Json(PaginatedResponse::from_page(page, request)))
}

#[utoipa::path(
    post,
    path = "/api/menus",
    tag = "Catalog",
    request_body = MenuInput,
    responses(
        (status = 201, description = "Menu created", body = Menu),
        (status = 403, description = "Not the restaurant owner")
    )
)]
/// Add a menu to a restaurant
pub async fn create<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Json(input): Json<MenuInput>,
) -> Result<impl IntoResponse> {
    let menu = state.menu_service().create(input, &caller).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(menu))))
}

#[utoipa::path(
    put,
    path = "/api/menus/{id}",
    tag = "Catalog",
    params(("id" = StringUuid, Path, description = "Menu ID")),
    request_body = MenuInput,
    responses(
        (status = 200, description = "Menu replaced", body = Menu),
        (status = 403, description = "Not the restaurant owner")
    )
)]
/// Replace a menu
pub async fn update<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(id): Path<StringUuid>,
    Json(input): Json<MenuInput>,
) -> Result<impl IntoResponse> {
    let menu = state.menu_service().update(id, input, &caller).await?;
    Ok(Json(SuccessResponse::new(menu)))
}

#[utoipa::path(
    delete,
    path = "/api/menus/{id}",
    tag = "Catalog",
    params(("id" = StringUuid, Path, description = "Menu ID")),
    responses((status = 200, description = "Menu deleted", body = MessageResponse))
)]
/// Soft-delete a menu
pub async fn delete<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    state.menu_service().delete(id, &caller).await?;
    Ok(Json(MessageResponse::new("Menu deleted successfully")))
}
