//! User API handlers: signup, login and profile management

use crate::api::{MessageResponse, SuccessResponse};
use crate::domain::{Caller, LoginInput, SignupInput, TokenResponse, UpdateUserInput, UserProfile};
use crate::error::{AppError, Result};
use crate::state::HasServices;
use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};

#[utoipa::path(
    post,
    path = "/api/user/signup",
    tag = "User",
    request_body = SignupInput,
    responses(
        (status = 201, description = "Account created", body = UserProfile),
        (status = 409, description = "Username taken"),
        (status = 422, description = "Invalid input")
    )
)]
/// Create an account
pub async fn signup<S: HasServices>(
    State(state): State<S>,
    Json(input): Json<SignupInput>,
) -> Result<impl IntoResponse> {
    let profile = state.user_service().signup(input).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(profile))))
}

#[utoipa::path(
    post,
    path = "/api/user/login",
    tag = "User",
    request_body = LoginInput,
    responses(
        (status = 200, description = "Access token issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
/// Exchange username and password for an access token.
///
/// The token is returned both in the body and as `Authorization: Bearer ...`.
pub async fn login<S: HasServices>(
    State(state): State<S>,
    Json(input): Json<LoginInput>,
) -> Result<impl IntoResponse> {
    let token = state.user_service().login(input).await?;
    let bearer = HeaderValue::from_str(&format!("Bearer {}", token.access_token))
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok(([(header::AUTHORIZATION, bearer)], Json(token)))
}

#[utoipa::path(
    get,
    path = "/api/user/{username}",
    tag = "User",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Public profile", body = UserProfile),
        (status = 404, description = "No such user")
    )
)]
/// Public profile of a user
pub async fn get_profile<S: HasServices>(
    State(state): State<S>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse> {
    let profile = state.user_service().get_profile(&username).await?;
    Ok(Json(SuccessResponse::new(profile)))
}

#[utoipa::path(
    put,
    path = "/api/user/{username}",
    tag = "User",
    params(("username" = String, Path, description = "Username")),
    request_body = UpdateUserInput,
    responses(
        (status = 200, description = "Profile updated", body = UserProfile),
        (status = 403, description = "Not the account holder")
    )
)]
/// Update address and/or password
pub async fn update_profile<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(username): Path<String>,
    Json(input): Json<UpdateUserInput>,
) -> Result<impl IntoResponse> {
    let profile = state
        .user_service()
        .update_profile(&username, input, &caller)
        .await?;
    Ok(Json(SuccessResponse::new(profile)))
}

#[utoipa::path(
    patch,
    path = "/api/user/{username}",
    tag = "User",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 403, description = "Not the account holder")
    )
)]
/// Soft-delete an account
pub async fn delete_user<S: HasServices>(
    State(state): State<S>,
    caller: Caller,
    Path(username): Path<String>,
) -> Result<impl IntoResponse> {
    state.user_service().delete_user(&username, &caller).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
