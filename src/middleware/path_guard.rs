//! Path traversal guard middleware
//!
//! Rejects requests whose path contains `.` or `..` segments before they
//! reach the route policy, so a crafted path cannot be matched against one
//! rule and routed to another.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};

/// Returns `true` if any path segment is `.` or `..`.
fn has_dot_segments(path: &str) -> bool {
    path.split('/').any(|seg| seg == "." || seg == "..")
}

pub async fn path_guard_middleware(
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    if has_dot_segments(request.uri().path()) {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(next.run(request).await)
}
