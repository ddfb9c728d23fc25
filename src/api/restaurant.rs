//! Restaurant API handlers

use crate::api::{MessageResponse, PaginatedResponse, PaginationQuery, SuccessResponse};
use crate::domain::{Caller, RestaurantInput, RestaurantResponse, StringUuid, VisibilityInput};
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
    path = "/api/restaurants",
    tag = "Catalog",
    params(PaginationQuery),
    responses((status = 200, description = "Visible restaurants", body = Vec<RestaurantResponse>))
)]
/// List visible restaurants, optionally searching by name
pub async fn list<S: HasServices>(
    State(state): State<S>,
    Query(query): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let request = query.page_request();
    let page = state
        .restaurant_service()
        .get_restaurants(request, query.search.as_deref())
        .await?;
    Ok(Json(PaginatedResponse::from_page(page, request)))
}

#[utoipa::path(
    get,
    path = "/api/restaurants/category/{id}",
    tag = "Catalog",
    params(("id" = StringUuid, Path, description = "Category ID"), PaginationQuery),
    responses((status = 200, description = "Visible restaurants in the category", body = Vec<RestaurantResponse>))
)]
/// List visible restaurants of one category
pub async fn list_by_category<S: HasServices>(
    State(state): State<S>,
    Path(category_id): Path<StringUuid>,
    Query(query): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let request = query.page_request();
    let page = state
        .restaurant_service()
        .get_restaurants_by_category(request, category_id, query.search.as_deref())
        .await?;
    Ok(Json(PaginatedResponse::from_page(page, request)))
}

#[utoipa::path(
    get,
    path = "/api/restaurants/{id}",
    tag = "Catalog",
    params(("id" = StringUuid, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Restaurant with average rating", body = RestaurantResponse),
        (status = 404, description = "Absent, hidden or deleted")
    )
)]
/// Restaurant detail
pub async fn get<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    let restaurant = state.restaurant_service().get_restaurant(id).await?;
    Ok(Json(SuccessResponse::new(restaurant)))
}

#[utoipa::path(
    post,
    path = "/api/restaurants",
    tag = "Catalog",
    request_body = RestaurantInput,
    responses(
        (status = 201, description = "Restaurant created", body = RestaurantResponse),
        (status = 403, description = "Administrator role required"),
        (status = 404, description = "Unknown category or owner")
    )
)]
/// Register a restaurant
pub async fn create<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Json(input): Json<RestaurantInput>,
) -> Result<impl IntoResponse> {
    let restaurant = state
        .restaurant_service()
        .create_restaurant(input, &caller)
        .await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(restaurant))))
}

#[utoipa::path(
    put,
    path = "/api/restaurants/{id}",
    tag = "Catalog",
    params(("id" = StringUuid, Path, description = "Restaurant ID")),
    request_body = RestaurantInput,
    responses(
        (status = 200, description = "Restaurant replaced", body = RestaurantResponse),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Absent, hidden or deleted")
    )
)]
/// Replace a restaurant's details
pub async fn update<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(id): Path<StringUuid>,
    Json(input): Json<RestaurantInput>,
) -> Result<impl IntoResponse> {
    let restaurant = state
        .restaurant_service()
        .update_restaurant(input, id, &caller)
        .await?;
    Ok(Json(SuccessResponse::new(restaurant)))
}

#[utoipa::path(
    patch,
    path = "/api/restaurants/{id}/visibility",
    tag = "Catalog",
    params(("id" = StringUuid, Path, description = "Restaurant ID")),
    request_body = VisibilityInput,
    responses(
        (status = 200, description = "Visibility changed", body = MessageResponse),
        (status = 403, description = "Not the owner")
    )
)]
/// Hide or reveal a restaurant
pub async fn set_visibility<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(id): Path<StringUuid>,
    Json(input): Json<VisibilityInput>,
) -> Result<impl IntoResponse> {
    state
        .restaurant_service()
        .set_visibility(id, input.hidden, &caller)
        .await?;
    let message = if input.hidden {
        "Restaurant hidden"
    } else {
        "Restaurant visible"
    };
    Ok(Json(MessageResponse::new(message)))
}

#[utoipa::path(
    delete,
    path = "/api/restaurants/{id}",
    tag = "Catalog",
    params(("id" = StringUuid, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Restaurant deleted", body = MessageResponse),
        (status = 403, description = "Not the owner")
    )
)]
/// Soft-delete a restaurant
pub async fn delete<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    state.restaurant_service().delete_restaurant(id, &caller).await?;
    Ok(Json(MessageResponse::new("Restaurant deleted successfully")))
}
