//! Domain models for the delivery service

pub mod category;
pub mod common;
pub mod menu;
pub mod order;
pub mod payment;
pub mod restaurant;
pub mod review;
pub mod user;

pub use category::*;
pub use common::*;
pub use menu::*;
pub use order::*;
pub use payment::*;
pub use restaurant::*;
pub use review::*;
pub use user::*;
