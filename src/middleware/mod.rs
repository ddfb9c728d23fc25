//! HTTP middleware for the delivery service
//!
//! Applied in this order on every request:
//! - path guard (rejects dot segments)
//! - authentication (bearer token to `Caller`)
//! - route policy (401/403 before any handler)

pub mod auth;
pub mod metrics;
pub mod path_guard;
pub mod route_policy;

pub use auth::{authenticate_middleware, resolve_caller, AuthMiddlewareState};
pub use metrics::ObservabilityLayer;
pub use path_guard::path_guard_middleware;
pub use route_policy::route_policy_middleware;
