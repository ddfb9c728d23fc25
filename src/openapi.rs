//! OpenAPI 3.0 documentation assembly
//!
//! Aggregates all handler path annotations and domain schemas into a single
//! OpenAPI document. Swagger UI is served in non-production
//! environments.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Delivery Core API",
        version = "0.1.0",
        description = "Food delivery backend: accounts, restaurants, menus, orders, payments and reviews",
        license(name = "Proprietary"),
        contact(name = "Delivery Team")
    ),
    tags(
        (name = "System", description = "Health checks and system status"),
        (name = "User", description = "Signup, login and profile management"),
        (name = "Catalog", description = "Categories, restaurants and menus"),
        (name = "Ordering", description = "Orders, payments and reviews"),
    ),
    security(
        ("bearer_jwt" = [])
    ),
    components(
        schemas(
            // ── Shared response types ──────────────────────────────────
            crate::api::PaginationQuery,
            crate::api::PaginationMeta,
            crate::api::MessageResponse,
            crate::api::health::HealthResponse,

            // ── Common ─────────────────────────────────────────────────
            crate::domain::StringUuid,

            // ── Users ──────────────────────────────────────────────────
            crate::domain::Role,
            crate::domain::SignupInput,
            crate::domain::LoginInput,
            crate::domain::UpdateUserInput,
            crate::domain::UserProfile,
            crate::domain::TokenResponse,

            // ── Catalog ────────────────────────────────────────────────
            crate::domain::Category,
            crate::domain::CategoryInput,
            crate::domain::RestaurantInput,
            crate::domain::VisibilityInput,
            crate::domain::RestaurantResponse,
            crate::domain::Menu,
            crate::domain::MenuInput,

            // ── Ordering ───────────────────────────────────────────────
            crate::domain::OrderType,
            crate::domain::OrderStatus,
            crate::domain::Order,
            crate::domain::OrderItem,
            crate::domain::OrderItemInput,
            crate::domain::CreateOrderInput,
            crate::domain::OrderDetail,
            crate::domain::PaymentStatus,
            crate::domain::Payment,
            crate::domain::Review,
            crate::domain::CreateReviewInput,
        )
    ),
    paths(
        // ── System ─────────────────────────────────────────────────
        crate::api::health::health,
        crate::api::health::ready,

        // ── Users ──────────────────────────────────────────────────
        crate::api::user::signup,
        crate::api::user::login,
        crate::api::user::get_profile,
        crate::api::user::update_profile,
        crate::api::user::delete_user,

        // ── Catalog: Categories ────────────────────────────────────
        crate::api::category::list,
        crate::api::category::create,
        crate::api::category::update,
        crate::api::category::delete,

        // ── Catalog: Restaurants ───────────────────────────────────
        crate::api::restaurant::list,
        crate::api::restaurant::list_by_category,
        crate::api::restaurant::get,
        crate::api::restaurant::create,
        crate::api::restaurant::update,
        crate::api::restaurant::set_visibility,
        crate::api::restaurant::delete,

        // ── Catalog: Menus ─────────────────────────────────────────
        crate::api::menu::search,
        crate::api::menu::list_by_restaurant,
        crate::api::menu::create,
        crate::api::menu::update,
        crate::api::menu::delete,

        // ── Ordering: Orders ───────────────────────────────────────
        crate::api::order::create,
        crate::api::order::list,
        crate::api::order::get,
        crate::api::order::cancel,

        // ── Ordering: Payments ─────────────────────────────────────
        crate::api::payment::create,
        crate::api::payment::list,
        crate::api::payment::get,
        crate::api::payment::cancel,

        // ── Ordering: Reviews ──────────────────────────────────────
        crate::api::review::create,
        crate::api::review::list,
        crate::api::review::get,
        crate::api::review::delete,
    ),
)]
pub struct ApiDoc;

/// Security scheme definition added via modify
impl ApiDoc {
    pub fn build() -> utoipa::openapi::OpenApi {
        let mut doc = Self::openapi();
        // Add Bearer JWT security scheme
        if let Some(c) = doc.components.as_mut() {
            c.security_schemes.insert(
                "bearer_jwt".to_string(),
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            );
        }
        doc
    }
}
