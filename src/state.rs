//! Application state traits for dependency injection
//!
//! Handlers are generic over [`HasServices`], so the same router runs against
//! the production MySQL-backed state and the in-memory test state.

use crate::config::Config;
use crate::jwt::JwtManager;
use crate::repository::{
    CategoryRepository, MenuRepository, OrderRepository, PaymentRepository, RestaurantRepository,
    ReviewRepository, UserRepository,
};
use crate::service::{
    CategoryService, MenuService, OrderService, PaymentService, RestaurantService, ReviewService,
    UserService,
};

/// Trait for application state that provides access to all services.
pub trait HasServices: Clone + Send + Sync + 'static {
    type UserRepo: UserRepository;
    type CategoryRepo: CategoryRepository;
    type RestaurantRepo: RestaurantRepository;
    type MenuRepo: MenuRepository;
    type OrderRepo: OrderRepository;
    type PaymentRepo: PaymentRepository;
    type ReviewRepo: ReviewRepository;

    /// Get the application configuration
    fn config(&self) -> &Config;

    /// Get the JWT manager
    fn jwt_manager(&self) -> &JwtManager;

    fn user_service(&self) -> &UserService<Self::UserRepo>;

    fn category_service(&self) -> &CategoryService<Self::CategoryRepo>;

    fn restaurant_service(
        &self,
    ) -> &RestaurantService<Self::RestaurantRepo, Self::CategoryRepo, Self::UserRepo>;

    fn menu_service(&self) -> &MenuService<Self::MenuRepo, Self::RestaurantRepo>;

    fn order_service(
        &self,
    ) -> &OrderService<Self::OrderRepo, Self::RestaurantRepo, Self::MenuRepo>;

    fn payment_service(
        &self,
    ) -> &PaymentService<Self::PaymentRepo, Self::OrderRepo, Self::RestaurantRepo>;

    fn review_service(&self) -> &ReviewService<Self::ReviewRepo, Self::OrderRepo>;

    /// Check if the system is ready to serve traffic (database reachable)
    fn check_ready(&self) -> impl std::future::Future<Output = bool> + Send;
}
