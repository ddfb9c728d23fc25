//! Review API handlers

use crate::api::{MessageResponse, PaginatedResponse, PaginationQuery, SuccessResponse};
use crate::domain::{Caller, CreateReviewInput, Review, StringUuid};
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
    path = "/api/review",
    tag = "Ordering",
    request_body = CreateReviewInput,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 409, description = "Order already reviewed")
    )
)]
/// Review one of the caller's orders
pub async fn create<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Json(input): Json<CreateReviewInput>,
) -> Result<impl IntoResponse> {
    let review = state.review_service().create(input, &caller).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(review))))
}

#[utoipa::path(
    get,
    path = "/api/review",
    tag = "Ordering",
    params(PaginationQuery),
    responses((status = 200, description = "Reviews", body = Vec<Review>))
)]
/// List reviews, optionally of one restaurant
pub async fn list<S: HasServices>(
    State(state): State<S>,
    Query(query): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let request = query.page_request();
    let page = state
        .review_service()
        .list(request, query.restaurant_id)
        .await?;
    Ok(Json(PaginatedResponse::from_page(page, request)))
}

#[utoipa::path(
    get,
    path = "/api/review/{id}",
    tag = "Ordering",
    params(("id" = StringUuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review", body = Review),
        (status = 404, description = "Absent or deleted")
    )
)]
/// Review detail
pub async fn get<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    let review = state.review_service().get(id).await?;
    Ok(Json(SuccessResponse::new(review)))
}

#[utoipa::path(
    patch,
    path = "/api/review/{id}",
    tag = "Ordering",
    params(("id" = StringUuid, Path, description = "Review ID")),
    responses((status = 200, description = "Review deleted", body = MessageResponse))
)]
/// Soft-delete a review
pub async fn delete<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(id): Path<StringUuid>,
) -> Result<impl IntoResponse> {
    state.review_service().delete(id, &caller).await?;
    Ok(Json(MessageResponse::new("Review deleted successfully")))
}
