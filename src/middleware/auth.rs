//! Bearer token authentication
//!
//! Resolves the caller of every request from its `Authorization` header and
//! stores it in the request extensions. A missing, malformed, expired or
//! tampered token yields an anonymous caller; the route policy decides
//! whether that is acceptable.

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;

use crate::domain::{Caller, StringUuid};
use crate::jwt::JwtManager;

/// Shared state for the authentication middleware
#[derive(Clone)]
pub struct AuthMiddlewareState {
    jwt_manager: JwtManager,
}

impl AuthMiddlewareState {
    pub fn new(jwt_manager: JwtManager) -> Self {
        Self { jwt_manager }
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Caller identified by the request headers, anonymous when none is proven
pub fn resolve_caller(jwt_manager: &JwtManager, headers: &HeaderMap) -> Caller {
    let Some(token) = extract_bearer_token(headers) else {
        return Caller::anonymous();
    };

    let claims = match jwt_manager.verify_access_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!("Rejected bearer token: {}", e);
            return Caller::anonymous();
        }
    };

    match claims.sub.parse::<StringUuid>() {
        Ok(user_id) => Caller::new(user_id, claims.username, claims.role),
        Err(_) => {
            tracing::debug!("Bearer token subject is not a user id");
            Caller::anonymous()
        }
    }
}

/// Attach the resolved `Caller` to the request
pub async fn authenticate_middleware(
    State(auth_state): State<AuthMiddlewareState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let caller = resolve_caller(&auth_state.jwt_manager, request.headers());
    request.extensions_mut().insert(caller);
    next.run(request).await
}

/// Handlers take the caller straight from the request extensions.
/// Requests that bypassed the authentication middleware are anonymous.
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Caller>()
            .cloned()
            .unwrap_or_else(Caller::anonymous))
    }
}
