//! Category API HTTP Handler Tests

use super::{build_test_router, delete_json, get_json, post_json, put_json, TestAppState};
use axum::http::StatusCode;
use delivery_core::api::{MessageResponse, SuccessResponse};
use delivery_core::domain::{Category, Role};
use serde_json::{json, Value};

#[tokio::test]
async fn test_list_categories_is_public_and_sorted() {
    let state = TestAppState::new();
    state.add_category("Pizza").await;
    state.add_category("Chicken").await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<Vec<Category>>>) =
        get_json(&app, "/api/category", None).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<String> = body.unwrap().data.into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["Chicken", "Pizza"]);
}

#[tokio::test]
async fn test_manager_creates_category() {
    let state = TestAppState::new();
    let (_, token) = state.add_user("boss001", Role::Manager).await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<Category>>) =
        post_json(&app, "/api/category", Some(&token), &json!({"name": "Korean"})).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.unwrap().data.name, "Korean");
}

#[tokio::test]
async fn test_duplicate_category_name_conflicts() {
    let state = TestAppState::new();
    state.add_category("Korean").await;
    let (_, token) = state.add_user("boss001", Role::Master).await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) =
        post_json(&app, "/api/category", Some(&token), &json!({"name": "Korean"})).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_customer_cannot_create_category() {
    let state = TestAppState::new();
    let (_, token) = state.add_user("alice01", Role::Customer).await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) =
        post_json(&app, "/api/category", Some(&token), &json!({"name": "Korean"})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _): (StatusCode, Option<Value>) =
        post_json(&app, "/api/category", None, &json!({"name": "Korean"})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rename_and_delete_category() {
    let state = TestAppState::new();
    let category = state.add_category("Korean").await;
    let (_, token) = state.add_user("boss001", Role::Manager).await;
    let app = build_test_router(state);
    let path = format!("/api/category/{}", category.id);

    let (status, body): (StatusCode, Option<SuccessResponse<Category>>) =
        put_json(&app, &path, Some(&token), &json!({"name": "Hansik"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().data.name, "Hansik");

    let (status, _): (StatusCode, Option<MessageResponse>) =
        delete_json(&app, &path, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body): (StatusCode, Option<SuccessResponse<Vec<Category>>>) =
        get_json(&app, "/api/category", None).await;
    assert!(body.unwrap().data.is_empty());

    // A deleted category is gone for good
    let (status, _): (StatusCode, Option<Value>) =
        delete_json(&app, &path, Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
