//! Server initialization and routing

use crate::api;
use crate::config::Config;
use crate::jwt::JwtManager;
use crate::middleware::{
    authenticate_middleware, path_guard_middleware, route_policy_middleware, AuthMiddlewareState,
    ObservabilityLayer,
};
use crate::openapi::ApiDoc;
use crate::repository::{
    category::CategoryRepositoryImpl, menu::MenuRepositoryImpl, order::OrderRepositoryImpl,
    payment::PaymentRepositoryImpl, restaurant::RestaurantRepositoryImpl,
    review::ReviewRepositoryImpl, user::UserRepositoryImpl,
};
use crate::service::{
    CategoryService, MenuService, OrderService, PaymentService, RestaurantService, ReviewService,
    UserService,
};
use crate::state::HasServices;
use anyhow::Result;
use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::{mysql::MySqlPoolOptions, MySqlPool};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: MySqlPool,
    pub jwt_manager: JwtManager,
    pub user_service: Arc<UserService<UserRepositoryImpl>>,
    pub category_service: Arc<CategoryService<CategoryRepositoryImpl>>,
    pub restaurant_service: Arc<
        RestaurantService<RestaurantRepositoryImpl, CategoryRepositoryImpl, UserRepositoryImpl>,
    >,
    pub menu_service: Arc<MenuService<MenuRepositoryImpl, RestaurantRepositoryImpl>>,
    pub order_service:
        Arc<OrderService<OrderRepositoryImpl, RestaurantRepositoryImpl, MenuRepositoryImpl>>,
    pub payment_service:
        Arc<PaymentService<PaymentRepositoryImpl, OrderRepositoryImpl, RestaurantRepositoryImpl>>,
    pub review_service: Arc<ReviewService<ReviewRepositoryImpl, OrderRepositoryImpl>>,
}

/// Implement HasServices trait for production AppState
impl HasServices for AppState {
    type UserRepo = UserRepositoryImpl;
    type CategoryRepo = CategoryRepositoryImpl;
    type RestaurantRepo = RestaurantRepositoryImpl;
    type MenuRepo = MenuRepositoryImpl;
    type OrderRepo = OrderRepositoryImpl;
    type PaymentRepo = PaymentRepositoryImpl;
    type ReviewRepo = ReviewRepositoryImpl;

    fn config(&self) -> &Config {
        &self.config
    }

    fn jwt_manager(&self) -> &JwtManager {
        &self.jwt_manager
    }

    fn user_service(&self) -> &UserService<Self::UserRepo> {
        &self.user_service
    }

    fn category_service(&self) -> &CategoryService<Self::CategoryRepo> {
        &self.category_service
    }

    fn restaurant_service(
        &self,
    ) -> &RestaurantService<Self::RestaurantRepo, Self::CategoryRepo, Self::UserRepo> {
        &self.restaurant_service
    }

    fn menu_service(&self) -> &MenuService<Self::MenuRepo, Self::RestaurantRepo> {
        &self.menu_service
    }

    fn order_service(
        &self,
    ) -> &OrderService<Self::OrderRepo, Self::RestaurantRepo, Self::MenuRepo> {
        &self.order_service
    }

    fn payment_service(
        &self,
    ) -> &PaymentService<Self::PaymentRepo, Self::OrderRepo, Self::RestaurantRepo> {
        &self.payment_service
    }

    fn review_service(&self) -> &ReviewService<Self::ReviewRepo, Self::OrderRepo> {
        &self.review_service
    }

    async fn check_ready(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.db_pool).await.is_ok()
    }
}

impl AppState {
    /// Wire repositories and services over one connection pool
    pub fn new(config: Config, db_pool: MySqlPool) -> Result<Self> {
        let jwt_manager = JwtManager::new(config.jwt.clone())?;

        let user_repo = Arc::new(UserRepositoryImpl::new(db_pool.clone()));
        let category_repo = Arc::new(CategoryRepositoryImpl::new(db_pool.clone()));
        let restaurant_repo = Arc::new(RestaurantRepositoryImpl::new(db_pool.clone()));
        let menu_repo = Arc::new(MenuRepositoryImpl::new(db_pool.clone()));
        let order_repo = Arc::new(OrderRepositoryImpl::new(db_pool.clone()));
        let payment_repo = Arc::new(PaymentRepositoryImpl::new(db_pool.clone()));
        let review_repo = Arc::new(ReviewRepositoryImpl::new(db_pool.clone()));

        let user_service = Arc::new(UserService::new(
            user_repo.clone(),
            jwt_manager.clone(),
            config.manager_signup_token.clone(),
        ));
        let category_service = Arc::new(CategoryService::new(category_repo.clone()));
        let restaurant_service = Arc::new(RestaurantService::new(
            restaurant_repo.clone(),
            category_repo,
            user_repo,
        ));
        let menu_service = Arc::new(MenuService::new(menu_repo.clone(), restaurant_repo.clone()));
        let order_service = Arc::new(OrderService::new(
            order_repo.clone(),
            restaurant_repo.clone(),
            menu_repo,
        ));
        let payment_service = Arc::new(PaymentService::new(
            payment_repo,
            order_repo.clone(),
            restaurant_repo,
        ));
        let review_service = Arc::new(ReviewService::new(review_repo, order_repo));

        Ok(Self {
            config: Arc::new(config),
            db_pool,
            jwt_manager,
            user_service,
            category_service,
            restaurant_service,
            menu_service,
            order_service,
            payment_service,
            review_service,
        })
    }
}

pub async fn run(config: Config, prometheus_handle: Option<PrometheusHandle>) -> Result<()> {
    // Create database connection pool
    let db_pool = MySqlPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;

    info!("Connected to database");

    let http_addr = config.http_addr();
    let expose_docs = !config.is_production();
    let state = AppState::new(config, db_pool)?;

    let mut app = build_router(state).merge(
        Router::new()
            .route("/metrics", get(api::metrics::metrics_handler))
            .with_state(Arc::new(prometheus_handle)),
    );
    if expose_docs {
        app = app.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::build()),
        );
        info!("Swagger UI available at /swagger-ui");
    }

    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the HTTP router.
///
/// Layers run outermost first: observability, path guard, authentication,
/// then the route policy gate, and only then the handler.
pub fn build_router<S: HasServices>(state: S) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth_state = AuthMiddlewareState::new(state.jwt_manager().clone());

    Router::new()
        // Health endpoints
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready::<S>))
        // Users
        .route("/api/user/signup", post(api::user::signup::<S>))
        .route("/api/user/login", post(api::user::login::<S>))
        .route(
            "/api/user/{username}",
            get(api::user::get_profile::<S>)
                .put(api::user::update_profile::<S>)
                .patch(api::user::delete_user::<S>),
        )
        // Categories
        .route(
            "/api/category",
            get(api::category::list::<S>).post(api::category::create::<S>),
        )
        .route(
            "/api/category/{id}",
            axum::routing::put(api::category::update::<S>).delete(api::category::delete::<S>),
        )
        // Restaurants
        .route(
            "/api/restaurants",
            get(api::restaurant::list::<S>).post(api::restaurant::create::<S>),
        )
        .route(
            "/api/restaurants/category/{id}",
            get(api::restaurant::list_by_category::<S>),
        )
        .route(
            "/api/restaurants/{id}",
            get(api::restaurant::get::<S>)
                .put(api::restaurant::update::<S>)
                .delete(api::restaurant::delete::<S>),
        )
        .route(
            "/api/restaurants/{id}/visibility",
            patch(api::restaurant::set_visibility::<S>),
        )
        // Menus
        .route(
            "/api/menus",
            get(api::menu::search::<S>).post(api::menu::create::<S>),
        )
        .route(
            "/api/menus/{id}",
            get(api::menu::list_by_restaurant::<S>)
                .put(api::menu::update::<S>)
                .delete(api::menu::delete::<S>),
        )
        // Orders
        .route(
            "/api/order",
            get(api::order::list::<S>).post(api::order::create::<S>),
        )
        .route(
            "/api/order/{id}",
            get(api::order::get::<S>).patch(api::order::cancel::<S>),
        )
        // Payments
        .route("/api/payment", get(api::payment::list::<S>))
        .route(
            "/api/payment/{id}",
            get(api::payment::get::<S>)
                .post(api::payment::create::<S>)
                .patch(api::payment::cancel::<S>),
        )
        // Reviews
        .route(
            "/api/review",
            get(api::review::list::<S>).post(api::review::create::<S>),
        )
        .route(
            "/api/review/{id}",
            get(api::review::get::<S>).patch(api::review::delete::<S>),
        )
        // Security chain, innermost first
        .layer(middleware::from_fn(route_policy_middleware))
        .layer(middleware::from_fn_with_state(
            auth_state,
            authenticate_middleware,
        ))
        .layer(middleware::from_fn(path_guard_middleware))
        .layer(ObservabilityLayer)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
