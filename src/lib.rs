//! Delivery Core - food delivery backend
//!
//! This crate provides the REST API for a food delivery service: user
//! accounts, restaurants and their menus, orders, payments and reviews,
//! guarded by JWT authentication and a role-based route policy.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod migration;
pub mod openapi;
pub mod policy;
pub mod repository;
pub mod server;
pub mod service;
pub mod state;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
