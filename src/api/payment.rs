//! Payment API handlers
//!
//! `POST /api/payment/{id}` takes an order id, the other routes a payment id.

use crate::api::{MessageResponse, PaginatedResponse, PaginationQuery, SuccessResponse};
use crate::domain::{Caller, Payment, StringUuid};
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
    path = "/api/payment/{id}",
    tag = "Ordering",
    params(("id" = StringUuid, Path, description = "Order ID")),
    responses(
        (status = 201, description = "Payment recorded", body = Payment),
        (status = 409, description = "Order already paid")
    )
)]
/// Pay for an order
pub async fn create<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(order_id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    let payment = state.payment_service().create(order_id, &caller).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(payment))))
}

#[utoipa::path(
    get,
    path = "/api/payment",
    tag = "Ordering",
    params(PaginationQuery),
    responses((status = 200, description = "Payments visible to the caller", body = Vec<Payment>))
)]
/// List payments
pub async fn list<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Query(query): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let request = query.page_request();
    let page = state.payment_service().list(request, &caller).await?;
    Ok(Json(PaginatedResponse::from_page(page, request)))
}

#[utoipa::path(
    get,
    path = "/api/payment/{id}",
    tag = "Ordering",
    params(("id" = StringUuid, Path, description = "Payment ID")),
    responses((status = 200, description = "Payment", body = Payment))
)]
/// Payment detail
pub async fn get<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    let payment = state.payment_service().get(id, &caller).await?;
    Ok(Json(SuccessResponse::new(payment)))
}

#[utoipa::path(
    patch,
    path = "/api/payment/{id}",
    tag = "Ordering",
    params(("id" = StringUuid, Path, description = "Payment ID")),
    responses((status = 200, description = "Payment cancelled", body = MessageResponse))
)]
/// Cancel a payment
pub async fn cancel<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    state.payment_service().cancel(id, &caller).await?;
    Ok(Json(MessageResponse::new("Payment cancelled successfully")))
}
