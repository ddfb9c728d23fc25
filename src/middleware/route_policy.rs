//! Route policy enforcement
//!
//! Runs after authentication and before any handler. Requests the route
//! table does not admit are answered here with 401 or 403.

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::domain::Caller;
use crate::policy;

pub async fn route_policy_middleware(request: Request<Body>, next: Next) -> Response {
    let anonymous = Caller::anonymous();
    let caller = request.extensions().get::<Caller>().unwrap_or(&anonymous);

    if let Err(e) = policy::enforce_route(request.method(), request.uri().path(), caller) {
        tracing::debug!(
            method = %request.method(),
            path = %request.uri().path(),
            role = %caller.role,
            "Route policy denied request"
        );
        return e.into_response();
    }

    next.run(request).await
}
