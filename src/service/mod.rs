//! Business logic layer

pub mod category;
pub mod menu;
pub mod order;
pub mod payment;
pub mod restaurant;
pub mod review;
pub mod user;

pub use category::CategoryService;
pub use menu::MenuService;
pub use order::OrderService;
pub use payment::PaymentService;
pub use restaurant::RestaurantService;
pub use review::ReviewService;
pub use user::UserService;
