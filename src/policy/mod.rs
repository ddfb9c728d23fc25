//! Centralized authorization policy.
//!
//! Two layers: a static route table consulted by middleware before any
//! handler runs, and ownership predicates the services call before mutating
//! an owned resource.

use crate::domain::{Caller, Role, StringUuid};
use crate::error::AppError;
use axum::http::Method;

pub type PolicyResult<T> = std::result::Result<T, AppError>;

const ANY_MEMBER: &[Role] = &[Role::Customer, Role::Owner, Role::Manager, Role::Master];
const ANYONE: &[Role] = &[
    Role::Anonymous,
    Role::Customer,
    Role::Owner,
    Role::Manager,
    Role::Master,
];
const STAFF: &[Role] = &[Role::Owner, Role::Manager, Role::Master];
const CUSTOMER_ONLY: &[Role] = &[Role::Customer];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No role check at all
    Public,
    /// Caller's role must be one of these
    Roles(&'static [Role]),
    /// Any non-anonymous caller
    Authenticated,
}

#[derive(Debug, Clone, Copy)]
pub struct RouteRule {
    pub method: &'static str,
    /// `{name}` matches exactly one path segment
    pub pattern: &'static str,
    pub access: Access,
}

const fn rule(method: &'static str, pattern: &'static str, access: Access) -> RouteRule {
    RouteRule {
        method,
        pattern,
        access,
    }
}

/// Ordered route table; the first matching rule decides.
pub static ROUTE_POLICY: &[RouteRule] = &[
    rule("POST", "/api/user/signup", Access::Public),
    rule("POST", "/api/user/login", Access::Public),
    rule("GET", "/api/user/{username}", Access::Public),
    rule("POST", "/api/order", Access::Roles(CUSTOMER_ONLY)),
    rule("GET", "/api/order", Access::Roles(STAFF)),
    rule("GET", "/api/order/{orderId}", Access::Roles(ANY_MEMBER)),
    rule("PATCH", "/api/order/{orderId}", Access::Roles(ANY_MEMBER)),
    rule("POST", "/api/review", Access::Roles(ANY_MEMBER)),
    rule("GET", "/api/review", Access::Roles(ANYONE)),
    rule("GET", "/api/review/{reviewId}", Access::Roles(ANYONE)),
    rule("PATCH", "/api/review/{reviewId}", Access::Roles(ANY_MEMBER)),
    rule("POST", "/api/payment/{orderId}", Access::Roles(CUSTOMER_ONLY)),
    rule("GET", "/api/payment/{paymentId}", Access::Roles(ANY_MEMBER)),
    rule("GET", "/api/payment", Access::Roles(ANY_MEMBER)),
    rule("PATCH", "/api/payment/{paymentId}", Access::Roles(ANY_MEMBER)),
    rule("GET", "/api/menus/{restaurantId}", Access::Public),
    rule("GET", "/api/menus", Access::Public),
    rule("GET", "/api/category", Access::Public),
    rule("GET", "/api/restaurants/{restaurantId}", Access::Public),
    rule("GET", "/api/restaurants", Access::Public),
    rule("GET", "/api/restaurants/category/{categoryId}", Access::Public),
    rule("GET", "/health", Access::Public),
    rule("GET", "/ready", Access::Public),
    rule("GET", "/metrics", Access::Public),
    rule("GET", "/swagger-ui", Access::Public),
    rule("GET", "/swagger-ui/{file}", Access::Public),
    rule("GET", "/api-docs/openapi.json", Access::Public),
];

const FALLBACK: Access = Access::Authenticated;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// No identity; the caller should authenticate
    Unauthenticated,
    /// Authenticated but the role is not admitted
    Forbidden,
}

fn path_matches(pattern: &str, path: &str) -> bool {
    let path = path.trim_end_matches('/');
    let pattern = pattern.trim_end_matches('/');

    let mut pattern_segments = pattern.split('/');
    let mut path_segments = path.split('/');
    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return true,
            (Some(p), Some(s)) => {
                let is_param = p.starts_with('{') && p.ends_with('}');
                if is_param {
                    if s.is_empty() {
                        return false;
                    }
                } else if p != s {
                    return false;
                }
            }
            _ => return false,
        }
    }
}

/// Access rule governing `method` on `path`
pub fn access_for(method: &Method, path: &str) -> Access {
    ROUTE_POLICY
        .iter()
        .find(|rule| rule.method == method.as_str() && path_matches(rule.pattern, path))
        .map(|rule| rule.access)
        .unwrap_or(FALLBACK)
}

/// Evaluate the route table for a caller holding `role`
pub fn evaluate(method: &Method, path: &str, role: Role) -> Decision {
    let admitted = match access_for(method, path) {
        Access::Public => return Decision::Allow,
        Access::Roles(roles) => roles.contains(&role),
        Access::Authenticated => role != Role::Anonymous,
    };

    if admitted {
        Decision::Allow
    } else if role == Role::Anonymous {
        Decision::Unauthenticated
    } else {
        Decision::Forbidden
    }
}

/// Route gate as an error; used by the policy middleware
pub fn enforce_route(method: &Method, path: &str, caller: &Caller) -> PolicyResult<()> {
    match evaluate(method, path, caller.role) {
        Decision::Allow => Ok(()),
        Decision::Unauthenticated => Err(AppError::Unauthorized(
            "Authentication required".to_string(),
        )),
        Decision::Forbidden => Err(AppError::Forbidden(format!(
            "Role {} may not access this resource",
            caller.role
        ))),
    }
}

/// Owner of the resource, or MANAGER / MASTER
pub fn require_owner_or_admin(caller: &Caller, owner_id: StringUuid) -> PolicyResult<()> {
    if caller.is_admin() || (!caller.is_anonymous() && caller.user_id == owner_id) {
        return Ok(());
    }
    Err(AppError::Forbidden(
        "Only the owner or an administrator may modify this resource".to_string(),
    ))
}

/// MANAGER or MASTER only
pub fn require_admin(caller: &Caller) -> PolicyResult<()> {
    if caller.is_admin() {
        return Ok(());
    }
    Err(AppError::Forbidden(
        "Administrator role required".to_string(),
    ))
}
