//! Order API HTTP Handler Tests

use super::{build_test_router, get_json, patch_json, post_json, TestAppState};
use crate::api::{create_stale_order, create_test_menu, create_test_order};
use axum::http::StatusCode;
use delivery_core::api::{MessageResponse, PaginatedResponse, SuccessResponse};
use delivery_core::domain::{Menu, Order, OrderDetail, OrderStatus, Restaurant, Role, User};
use serde_json::{json, Value};

/// Restaurant with two menus and a customer ready to order
async fn setup(state: &TestAppState) -> (Restaurant, Menu, Menu, User, String) {
    let (restaurant, _, _) = state.add_restaurant_with_owner("Pizza House", "owner01").await;
    let pizza = create_test_menu("Margherita", restaurant.id, 12000);
    let cola = create_test_menu("Cola", restaurant.id, 2000);
    state.menu_repo.add_menu(pizza.clone()).await;
    state.menu_repo.add_menu(cola.clone()).await;
    let (customer, token) = state.add_user("alice01", Role::Customer).await;
    (restaurant, pizza, cola, customer, token)
}

// ============================================================================
// Placing orders
// ============================================================================

#[tokio::test]
async fn test_customer_places_order_with_server_side_total() {
    let state = TestAppState::new();
    let (restaurant, pizza, cola, customer, token) = setup(&state).await;
    let app = build_test_router(state);

    let input = json!({
        "restaurant_id": restaurant.id,
        "order_type": "TAKEOUT",
        "items": [
            {"menu_id": pizza.id, "quantity": 2},
            {"menu_id": cola.id, "quantity": 3}
        ]
    });
    let (status, body): (StatusCode, Option<SuccessResponse<OrderDetail>>) =
        post_json(&app, "/api/order", Some(&token), &input).await;

    assert_eq!(status, StatusCode::CREATED);
    let detail = body.unwrap().data;
    assert_eq!(detail.order.total_price, 2 * 12000 + 3 * 2000);
    assert_eq!(detail.order.customer_id, customer.id);
    assert_eq!(detail.order.status, OrderStatus::Pending);
    assert_eq!(detail.items.len(), 2);
}

#[tokio::test]
async fn test_delivery_order_requires_address() {
    let state = TestAppState::new();
    let (restaurant, pizza, _, _, token) = setup(&state).await;
    let app = build_test_router(state.clone());

    let input = json!({
        "restaurant_id": restaurant.id,
        "order_type": "DELIVERY",
        "items": [{"menu_id": pizza.id, "quantity": 1}]
    });
    let (status, _): (StatusCode, Option<Value>) =
        post_json(&app, "/api/order", Some(&token), &input).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(state.order_repo.count().await, 0);
}

#[tokio::test]
async fn test_menu_of_other_restaurant_is_rejected() {
    let state = TestAppState::new();
    let (restaurant, _, _, _, token) = setup(&state).await;
    let (other, _, _) = state.add_restaurant_with_owner("Burger Town", "owner02").await;
    let burger = create_test_menu("Burger", other.id, 9000);
    state.menu_repo.add_menu(burger.clone()).await;
    let app = build_test_router(state.clone());

    let input = json!({
        "restaurant_id": restaurant.id,
        "order_type": "TAKEOUT",
        "items": [{"menu_id": burger.id, "quantity": 1}]
    });
    let (status, _): (StatusCode, Option<Value>) =
        post_json(&app, "/api/order", Some(&token), &input).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(state.order_repo.count().await, 0);
}

#[tokio::test]
async fn test_hidden_menu_cannot_be_ordered() {
    let state = TestAppState::new();
    let (restaurant, _, _, _, token) = setup(&state).await;
    let mut secret = create_test_menu("Secret", restaurant.id, 1000);
    secret.is_hidden = true;
    state.menu_repo.add_menu(secret.clone()).await;
    let app = build_test_router(state);

    let input = json!({
        "restaurant_id": restaurant.id,
        "order_type": "TAKEOUT",
        "items": [{"menu_id": secret.id, "quantity": 1}]
    });
    let (status, _): (StatusCode, Option<Value>) =
        post_json(&app, "/api/order", Some(&token), &input).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_only_customers_place_orders() {
    let state = TestAppState::new();
    let (restaurant, pizza, _, _, _) = setup(&state).await;
    let (_, manager_token) = state.add_user("boss001", Role::Manager).await;
    let app = build_test_router(state);

    let input = json!({
        "restaurant_id": restaurant.id,
        "order_type": "TAKEOUT",
        "items": [{"menu_id": pizza.id, "quantity": 1}]
    });

    let (status, _): (StatusCode, Option<Value>) =
        post_json(&app, "/api/order", Some(&manager_token), &input).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _): (StatusCode, Option<Value>) = post_json(&app, "/api/order", None, &input).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Reading orders
// ============================================================================

#[tokio::test]
async fn test_order_list_is_for_staff() {
    let state = TestAppState::new();
    let (restaurant, _, _, customer, customer_token) = setup(&state).await;
    let (_, _, other_owner_token) = state.add_restaurant_with_owner("Burger Town", "owner02").await;
    let (_, manager_token) = state.add_user("boss001", Role::Manager).await;
    state
        .order_repo
        .add_order(create_test_order(customer.id, restaurant.id, 12000))
        .await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) =
        get_json(&app, "/api/order", Some(&customer_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body): (StatusCode, Option<PaginatedResponse<Order>>) =
        get_json(&app, "/api/order", Some(&manager_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().pagination.total, 1);

    // An owner only sees orders of their own restaurants
    let (status, body): (StatusCode, Option<PaginatedResponse<Order>>) =
        get_json(&app, "/api/order", Some(&other_owner_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.unwrap().data.is_empty());
}

#[tokio::test]
async fn test_get_order_by_party() {
    let state = TestAppState::new();
    let (restaurant, _, _, customer, customer_token) = setup(&state).await;
    let owner_token = crate::api::token_for(
        &state.user_repo.get_raw("owner01").await.unwrap(),
    );
    let (_, stranger_token) = state.add_user("bob0001", Role::Customer).await;
    let order = create_test_order(customer.id, restaurant.id, 12000);
    state.order_repo.add_order(order.clone()).await;
    let app = build_test_router(state);
    let path = format!("/api/order/{}", order.id);

    let (status, body): (StatusCode, Option<SuccessResponse<OrderDetail>>) =
        get_json(&app, &path, Some(&customer_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().data.order.id, order.id);

    let (status, _): (StatusCode, Option<Value>) = get_json(&app, &path, Some(&owner_token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _): (StatusCode, Option<Value>) =
        get_json(&app, &path, Some(&stranger_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

// ============================================================================
// Cancelling orders
// ============================================================================

#[tokio::test]
async fn test_customer_cancels_within_window_once() {
    let state = TestAppState::new();
    let (restaurant, _, _, customer, token) = setup(&state).await;
    let order = create_test_order(customer.id, restaurant.id, 12000);
    state.order_repo.add_order(order.clone()).await;
    let app = build_test_router(state);
    let path = format!("/api/order/{}", order.id);

    let (status, body): (StatusCode, Option<MessageResponse>) =
        patch_json::<Value, _>(&app, &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_some());

    let (_, body): (StatusCode, Option<SuccessResponse<OrderDetail>>) =
        get_json(&app, &path, Some(&token)).await;
    let cancelled = body.unwrap().data.order;
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.cancelled_by.as_deref(), Some("alice01"));

    let (status, _): (StatusCode, Option<Value>) =
        patch_json::<Value, _>(&app, &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cancel_window_binds_customer_but_not_owner() {
    let state = TestAppState::new();
    let (restaurant, _, _, customer, customer_token) = setup(&state).await;
    let owner_token = crate::api::token_for(
        &state.user_repo.get_raw("owner01").await.unwrap(),
    );
    let order = create_stale_order(customer.id, restaurant.id);
    state.order_repo.add_order(order.clone()).await;
    let app = build_test_router(state);
    let path = format!("/api/order/{}", order.id);

    let (status, _): (StatusCode, Option<Value>) =
        patch_json::<Value, _>(&app, &path, Some(&customer_token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _): (StatusCode, Option<Value>) =
        patch_json::<Value, _>(&app, &path, Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::OK);
}
