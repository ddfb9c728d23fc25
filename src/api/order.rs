//! Order API handlers

use crate::api::{MessageResponse, PaginatedResponse, PaginationQuery, SuccessResponse};
use crate::domain::{Caller, CreateOrderInput, Order, OrderDetail, StringUuid};
use crate::error::Result;
use crate::state::HasServices;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

#[utoipa::path(
    post,
    path = "/api/order",
    tag = "Ordering",
    request_body = CreateOrderInput,
    responses(
        (status = 201, description = "Order placed", body = OrderDetail),
        (status = 400, description = "Menu not sold by the restaurant"),
        (status = 404, description = "Restaurant or menu not found")
    )
)]
/// Place an order
pub async fn create<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Json(input): Json<CreateOrderInput>,
) -> Result<impl IntoResponse> {
    let order = state.order_service().create(input, &caller).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(order))))
}

#[utoipa::path(
    get,
    path = "/api/order",
    tag = "Ordering",
    params(PaginationQuery),
    responses((status = 200, description = "Orders visible to the caller", body = Vec<Order>))
)]
/// List orders
pub async fn list<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Query(query): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let request = query.page_request();
    let page = state
        .order_service()
        .list(request, query.restaurant_id, &caller)
        .await?;
    Ok(Json(PaginatedResponse::from_page(page, request)))
}

#[utoipa::path(
    get,
    path = "/api/order/{id}",
    tag = "Ordering",
    params(("id" = StringUuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with items", body = OrderDetail),
        (status = 403, description = "Not a party to the order")
    )
)]
/// Order detail
pub async fn get<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    let order = state.order_service().get(id, &caller).await?;
    Ok(Json(SuccessResponse::new(order)))
}

#[utoipa::path(
    patch,
    path = "/api/order/{id}",
    tag = "Ordering",
    params(("id" = StringUuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order cancelled", body = MessageResponse),
        (status = 400, description = "Already cancelled or cancel window elapsed")
    )
)]
/// Cancel an order
pub async fn cancel<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    state.order_service().cancel(id, &caller).await?;
    Ok(Json(MessageResponse::new("Order cancelled successfully")))
}
