//! Payment API HTTP Handler Tests

use super::{build_test_router, get_json, patch_json, post_json, TestAppState};
use crate::api::{create_test_order, token_for};
use axum::http::StatusCode;
use delivery_core::api::{MessageResponse, PaginatedResponse, SuccessResponse};
use delivery_core::domain::{Order, OrderStatus, Payment, PaymentStatus, Role, User};
use serde_json::{json, Value};

/// A customer with an open order at a restaurant owned by "owner01"
async fn setup(state: &TestAppState) -> (Order, User, String) {
    let (restaurant, _, _) = state.add_restaurant_with_owner("Pizza House", "owner01").await;
    let (customer, token) = state.add_user("alice01", Role::Customer).await;
    let order = create_test_order(customer.id, restaurant.id, 27000);
    state.order_repo.add_order(order.clone()).await;
    (order, customer, token)
}

#[tokio::test]
async fn test_customer_pays_order_total() {
    let state = TestAppState::new();
    let (order, customer, token) = setup(&state).await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<Payment>>) = post_json(
        &app,
        &format!("/api/payment/{}", order.id),
        Some(&token),
        &json!({}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let payment = body.unwrap().data;
    assert_eq!(payment.amount, 27000);
    assert_eq!(payment.order_id, order.id);
    assert_eq!(payment.customer_id, customer.id);
    assert_eq!(payment.restaurant_id, order.restaurant_id);
    assert_eq!(payment.status, PaymentStatus::Completed);
}

#[tokio::test]
async fn test_order_is_paid_at_most_once() {
    let state = TestAppState::new();
    let (order, _, token) = setup(&state).await;
    let app = build_test_router(state);
    let path = format!("/api/payment/{}", order.id);

    let (status, _): (StatusCode, Option<Value>) =
        post_json(&app, &path, Some(&token), &json!({})).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _): (StatusCode, Option<Value>) =
        post_json(&app, &path, Some(&token), &json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_cannot_pay_for_someone_elses_order() {
    let state = TestAppState::new();
    let (order, _, _) = setup(&state).await;
    let (_, bob_token) = state.add_user("bob0001", Role::Customer).await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = post_json(
        &app,
        &format!("/api/payment/{}", order.id),
        Some(&bob_token),
        &json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_cancelled_order_cannot_be_paid() {
    let state = TestAppState::new();
    let (restaurant, _, _) = state.add_restaurant_with_owner("Pizza House", "owner01").await;
    let (customer, token) = state.add_user("alice01", Role::Customer).await;
    let order = Order {
        status: OrderStatus::Cancelled,
        ..create_test_order(customer.id, restaurant.id, 5000)
    };
    state.order_repo.add_order(order.clone()).await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = post_json(
        &app,
        &format!("/api/payment/{}", order.id),
        Some(&token),
        &json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_order_payment_not_found() {
    let state = TestAppState::new();
    let (_, token) = state.add_user("alice01", Role::Customer).await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = post_json(
        &app,
        &format!("/api/payment/{}", uuid::Uuid::new_v4()),
        Some(&token),
        &json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_payment_visibility_by_role() {
    let state = TestAppState::new();
    let (order, _, token) = setup(&state).await;
    let owner_token = token_for(&state.user_repo.get_raw("owner01").await.unwrap());
    let (_, _, other_owner_token) = state.add_restaurant_with_owner("Burger Town", "owner02").await;
    let (_, bob_token) = state.add_user("bob0001", Role::Customer).await;
    let app = build_test_router(state);

    let (_, body): (StatusCode, Option<SuccessResponse<Payment>>) = post_json(
        &app,
        &format!("/api/payment/{}", order.id),
        Some(&token),
        &json!({}),
    )
    .await;
    let payment = body.unwrap().data;
    let path = format!("/api/payment/{}", payment.id);

    let (status, _): (StatusCode, Option<Value>) = get_json(&app, &path, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _): (StatusCode, Option<Value>) = get_json(&app, &path, Some(&owner_token)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _): (StatusCode, Option<Value>) =
        get_json(&app, &path, Some(&other_owner_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _): (StatusCode, Option<Value>) = get_json(&app, &path, Some(&bob_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body): (StatusCode, Option<PaginatedResponse<Payment>>) =
        get_json(&app, "/api/payment", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().data.len(), 1);

    let (_, body): (StatusCode, Option<PaginatedResponse<Payment>>) =
        get_json(&app, "/api/payment", Some(&bob_token)).await;
    assert!(body.unwrap().data.is_empty());

    let (_, body): (StatusCode, Option<PaginatedResponse<Payment>>) =
        get_json(&app, "/api/payment", Some(&owner_token)).await;
    assert_eq!(body.unwrap().pagination.total, 1);

    let (status, _): (StatusCode, Option<Value>) = get_json(&app, "/api/payment", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_payer_cancels_payment() {
    let state = TestAppState::new();
    let (order, _, token) = setup(&state).await;
    let (_, bob_token) = state.add_user("bob0001", Role::Customer).await;
    let app = build_test_router(state.clone());

    let (_, body): (StatusCode, Option<SuccessResponse<Payment>>) = post_json(
        &app,
        &format!("/api/payment/{}", order.id),
        Some(&token),
        &json!({}),
    )
    .await;
    let payment = body.unwrap().data;
    let path = format!("/api/payment/{}", payment.id);

    let (status, _): (StatusCode, Option<Value>) =
        patch_json::<Value, _>(&app, &path, Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body): (StatusCode, Option<MessageResponse>) =
        patch_json::<Value, _>(&app, &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_some());

    let raw = state.payment_repo.get_raw(payment.id).await.unwrap();
    assert_eq!(raw.status, PaymentStatus::Cancelled);
    assert!(raw.deleted_at.is_some());
    assert_eq!(raw.deleted_by.as_deref(), Some("alice01"));

    // Cancelled payments are gone from reads
    let (status, _): (StatusCode, Option<Value>) = get_json(&app, &path, Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
