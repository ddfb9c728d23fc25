//! API integration tests infrastructure
//!
//! In-memory repositories that honour the same visibility and soft-delete
//! rules as the MySQL implementations, so handlers can be driven end to end
//! without a database.


use async_trait::async_trait;
use chrono::{Duration, Utc};
use delivery_core::config::JwtConfig;
use delivery_core::domain::{
    Category, Menu, MenuFilter, MenuInput, NewOrder, NewPayment, NewReview, NewUser, Order,
    OrderFilter, OrderItem, OrderStatus, OrderType, Page, PageRequest, Payment, PaymentFilter,
    PaymentStatus, RatedRestaurant, Restaurant, RestaurantFilter, RestaurantInput, Review,
    ReviewFilter, Role, StringUuid, User,
};
use delivery_core::error::{AppError, Result};
use delivery_core::jwt::JwtManager;
use delivery_core::repository::{
    CategoryRepository, MenuRepository, OrderRepository, PaymentRepository,
    RestaurantRepository, ReviewRepository, UserRepository,
};
use std::sync::Arc;
use tokio::sync::RwLock;

// ============================================================================
// Test Configuration
// ============================================================================

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-key-for-api-testing-purposes".to_string(),
        issuer: "https://delivery.test".to_string(),
        access_token_ttl_secs: 3600,
        private_key_pem: None,
        public_key_pem: None,
    }
}

pub fn create_test_jwt_manager() -> JwtManager {
    JwtManager::new(test_jwt_config()).expect("valid test JWT config")
}

/// Bearer token for an existing user
pub fn token_for(user: &User) -> String {
    create_test_jwt_manager()
        .create_access_token(user.id, &user.username, user.role)
        .expect("Failed to create test access token")
}

fn paginate<T: Clone>(items: &[T], page: PageRequest) -> Page<T> {
    let total = items.len() as i64;
    let window = items
        .iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .cloned()
        .collect();
    Page::new(window, total)
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn create_test_user(username: &str, role: Role) -> User {
    User {
        username: username.to_string(),
        address: "Seoul".to_string(),
        role,
        ..Default::default()
    }
}

pub fn create_test_category(name: &str) -> Category {
    Category {
        name: name.to_string(),
        ..Default::default()
    }
}

pub fn create_test_restaurant(name: &str, category_id: StringUuid, owner_id: StringUuid) -> Restaurant {
    Restaurant {
        name: name.to_string(),
        category_id,
        owner_id,
        address: "Gangnam".to_string(),
        ..Default::default()
    }
}

pub fn create_test_menu(name: &str, restaurant_id: StringUuid, price: i64) -> Menu {
    Menu {
        name: name.to_string(),
        restaurant_id,
        price,
        ..Default::default()
    }
}

pub fn create_test_order(customer_id: StringUuid, restaurant_id: StringUuid, total_price: i64) -> Order {
    Order {
        customer_id,
        restaurant_id,
        total_price,
        order_type: OrderType::Takeout,
        ..Default::default()
    }
}

/// Order placed far enough in the past that the customer window is closed
pub fn create_stale_order(customer_id: StringUuid, restaurant_id: StringUuid) -> Order {
    let created_at = Utc::now() - Duration::minutes(30);
    Order {
        created_at,
        updated_at: created_at,
        ..create_test_order(customer_id, restaurant_id, 10000)
    }
}

// ============================================================================
// Users
// ============================================================================

pub struct TestUserRepository {
    users: RwLock<Vec<User>>,
}

impl TestUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(vec![]),
        }
    }

    pub async fn add_user(&self, user: User) {
        self.users.write().await.push(user);
    }

    /// Raw row, deleted accounts included
    pub async fn get_raw(&self, username: &str) -> Option<User> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.username == username)
            .cloned()
    }
}

impl Default for TestUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for TestUserRepository {
    async fn create(&self, input: &NewUser) -> Result<User> {
        let user = User {
            username: input.username.clone(),
            password_hash: input.password_hash.clone(),
            address: input.address.clone(),
            role: input.role,
            ..Default::default()
        };
        self.users.write().await.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.id == id && !u.is_deleted())
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.username == username && !u.is_deleted())
            .cloned())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool> {
        let users = self.users.read().await;
        Ok(users.iter().any(|u| u.username == username))
    }

    async fn update(
        &self,
        id: StringUuid,
        address: Option<String>,
        password_hash: Option<String>,
    ) -> Result<User> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == id && !u.is_deleted())
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;
        if let Some(address) = address {
            user.address = address;
        }
        if let Some(password_hash) = password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn soft_delete(&self, id: StringUuid, deleted_by: &str) -> Result<()> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == id && !u.is_deleted())
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;
        user.deleted_at = Some(Utc::now());
        user.deleted_by = Some(deleted_by.to_string());
        Ok(())
    }
}

// ============================================================================
// Categories
// ============================================================================

pub struct TestCategoryRepository {
    categories: RwLock<Vec<Category>>,
}

impl TestCategoryRepository {
    pub fn new() -> Self {
        Self {
            categories: RwLock::new(vec![]),
        }
    }

    pub async fn add_category(&self, category: Category) {
        self.categories.write().await.push(category);
    }
}

impl Default for TestCategoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CategoryRepository for TestCategoryRepository {
    async fn create(&self, name: &str) -> Result<Category> {
        let category = create_test_category(name);
        self.categories.write().await.push(category.clone());
        Ok(category)
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories
            .iter()
            .find(|c| c.id == id && c.deleted_at.is_none())
            .cloned())
    }

    async fn exists_by_name(&self, name: &str, exclude: Option<StringUuid>) -> Result<bool> {
        let categories = self.categories.read().await;
        Ok(categories.iter().any(|c| {
            c.name == name && c.deleted_at.is_none() && Some(c.id) != exclude
        }))
    }

    async fn list(&self) -> Result<Vec<Category>> {
        let mut live: Vec<Category> = self
            .categories
            .read()
            .await
            .iter()
            .filter(|c| c.deleted_at.is_none())
            .cloned()
            .collect();
        live.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(live)
    }

    async fn update(&self, id: StringUuid, name: &str) -> Result<Category> {
        let mut categories = self.categories.write().await;
        let category = categories
            .iter_mut()
            .find(|c| c.id == id && c.deleted_at.is_none())
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))?;
        category.name = name.to_string();
        Ok(category.clone())
    }

    async fn soft_delete(&self, id: StringUuid, deleted_by: &str) -> Result<()> {
        let mut categories = self.categories.write().await;
        let category = categories
            .iter_mut()
            .find(|c| c.id == id && c.deleted_at.is_none())
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))?;
        category.deleted_at = Some(Utc::now());
        category.deleted_by = Some(deleted_by.to_string());
        Ok(())
    }
}

// ============================================================================
// Restaurants (ratings come from the shared review store)
// ============================================================================

pub struct TestRestaurantRepository {
    restaurants: Arc<RwLock<Vec<Restaurant>>>,
    reviews: Arc<RwLock<Vec<Review>>>,
}

impl TestRestaurantRepository {
    pub fn new(restaurants: Arc<RwLock<Vec<Restaurant>>>, reviews: Arc<RwLock<Vec<Review>>>) -> Self {
        Self {
            restaurants,
            reviews,
        }
    }

    pub async fn add_restaurant(&self, restaurant: Restaurant) {
        self.restaurants.write().await.push(restaurant);
    }

    /// Raw row, hidden and deleted restaurants included
    pub async fn get_raw(&self, id: StringUuid) -> Option<Restaurant> {
        self.restaurants
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    async fn rating_of(&self, id: StringUuid) -> Option<f64> {
        let reviews = self.reviews.read().await;
        let ratings: Vec<f64> = reviews
            .iter()
            .filter(|v| v.restaurant_id == id && v.deleted_at.is_none())
            .map(|v| v.rating as f64)
            .collect();
        if ratings.is_empty() {
            None
        } else {
            Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
        }
    }
}

#[async_trait]
impl RestaurantRepository for TestRestaurantRepository {
    async fn create(&self, input: &RestaurantInput) -> Result<Restaurant> {
        let restaurant = Restaurant {
            name: input.name.clone(),
            category_id: input.category_id,
            owner_id: input.owner_id,
            address: input.address.clone(),
            ..Default::default()
        };
        self.restaurants.write().await.push(restaurant.clone());
        Ok(restaurant)
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Restaurant>> {
        let restaurants = self.restaurants.read().await;
        Ok(restaurants
            .iter()
            .find(|r| r.id == id && r.deleted_at.is_none())
            .cloned())
    }

    async fn update(&self, id: StringUuid, input: &RestaurantInput) -> Result<Restaurant> {
        let mut restaurants = self.restaurants.write().await;
        let restaurant = restaurants
            .iter_mut()
            .find(|r| r.id == id && r.deleted_at.is_none())
            .ok_or_else(|| AppError::NotFound(format!("Restaurant {} not found", id)))?;
        restaurant.name = input.name.clone();
        restaurant.category_id = input.category_id;
        restaurant.owner_id = input.owner_id;
        restaurant.address = input.address.clone();
        Ok(restaurant.clone())
    }

    async fn set_hidden(&self, id: StringUuid, hidden: bool) -> Result<()> {
        let mut restaurants = self.restaurants.write().await;
        let restaurant = restaurants
            .iter_mut()
            .find(|r| r.id == id && r.deleted_at.is_none())
            .ok_or_else(|| AppError::NotFound(format!("Restaurant {} not found", id)))?;
        restaurant.is_hidden = hidden;
        Ok(())
    }

    async fn soft_delete(&self, id: StringUuid, deleted_by: &str) -> Result<()> {
        let mut restaurants = self.restaurants.write().await;
        let restaurant = restaurants
            .iter_mut()
            .find(|r| r.id == id && r.deleted_at.is_none())
            .ok_or_else(|| AppError::NotFound(format!("Restaurant {} not found", id)))?;
        restaurant.deleted_at = Some(Utc::now());
        restaurant.deleted_by = Some(deleted_by.to_string());
        Ok(())
    }

    async fn list(
        &self,
        filter: &RestaurantFilter,
        page: PageRequest,
    ) -> Result<Page<RatedRestaurant>> {
        let mut matching: Vec<Restaurant> = self
            .restaurants
            .read()
            .await
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let window = paginate(&matching, page);
        let mut items = Vec::with_capacity(window.items.len());
        for restaurant in window.items {
            let average_rating = self.rating_of(restaurant.id).await;
            items.push(RatedRestaurant {
                restaurant,
                average_rating,
            });
        }
        Ok(Page::new(items, window.total))
    }

    async fn average_rating(&self, id: StringUuid) -> Result<Option<f64>> {
        Ok(self.rating_of(id).await)
    }

    async fn ids_by_owner(&self, owner_id: StringUuid) -> Result<Vec<StringUuid>> {
        let restaurants = self.restaurants.read().await;
        Ok(restaurants
            .iter()
            .filter(|r| r.owner_id == owner_id && r.deleted_at.is_none())
            .map(|r| r.id)
            .collect())
    }
}

// ============================================================================
// Menus (listing joins the restaurant store)
// ============================================================================

pub struct TestMenuRepository {
    menus: RwLock<Vec<Menu>>,
    restaurants: Arc<RwLock<Vec<Restaurant>>>,
}

impl TestMenuRepository {
    pub fn new(restaurants: Arc<RwLock<Vec<Restaurant>>>) -> Self {
        Self {
            menus: RwLock::new(vec![]),
            restaurants,
        }
    }

    pub async fn add_menu(&self, menu: Menu) {
        self.menus.write().await.push(menu);
    }

    pub async fn get_raw(&self, id: StringUuid) -> Option<Menu> {
        self.menus.read().await.iter().find(|m| m.id == id).cloned()
    }
}

#[async_trait]
impl MenuRepository for TestMenuRepository {
    async fn create(&self, input: &MenuInput) -> Result<Menu> {
        let menu = Menu {
            restaurant_id: input.restaurant_id,
            name: input.name.clone(),
            description: input.description.clone(),
            price: input.price,
            is_hidden: input.is_hidden,
            ..Default::default()
        };
        self.menus.write().await.push(menu.clone());
        Ok(menu)
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Menu>> {
        let menus = self.menus.read().await;
        Ok(menus
            .iter()
            .find(|m| m.id == id && m.deleted_at.is_none())
            .cloned())
    }

    async fn update(&self, id: StringUuid, input: &MenuInput) -> Result<Menu> {
        let mut menus = self.menus.write().await;
        let menu = menus
            .iter_mut()
            .find(|m| m.id == id && m.deleted_at.is_none())
            .ok_or_else(|| AppError::NotFound(format!("Menu {} not found", id)))?;
        menu.restaurant_id = input.restaurant_id;
        menu.name = input.name.clone();
        menu.description = input.description.clone();
        menu.price = input.price;
        menu.is_hidden = input.is_hidden;
        Ok(menu.clone())
    }

    async fn soft_delete(&self, id: StringUuid, deleted_by: &str) -> Result<()> {
        let mut menus = self.menus.write().await;
        let menu = menus
            .iter_mut()
            .find(|m| m.id == id && m.deleted_at.is_none())
            .ok_or_else(|| AppError::NotFound(format!("Menu {} not found", id)))?;
        menu.deleted_at = Some(Utc::now());
        menu.deleted_by = Some(deleted_by.to_string());
        Ok(())
    }

    async fn list(&self, filter: &MenuFilter, page: PageRequest) -> Result<Page<Menu>> {
        let restaurants = self.restaurants.read().await;
        let mut matching: Vec<Menu> = self
            .menus
            .read()
            .await
            .iter()
            .filter(|m| filter.matches(m))
            .filter(|m| {
                restaurants
                    .iter()
                    .any(|r| r.id == m.restaurant_id && r.is_visible())
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(paginate(&matching, page))
    }
}

// ============================================================================
// Orders
// ============================================================================

pub struct TestOrderRepository {
    orders: RwLock<Vec<Order>>,
    items: RwLock<Vec<OrderItem>>,
}

impl TestOrderRepository {
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(vec![]),
            items: RwLock::new(vec![]),
        }
    }

    pub async fn add_order(&self, order: Order) {
        self.orders.write().await.push(order);
    }

    pub async fn count(&self) -> usize {
        self.orders.read().await.len()
    }
}

impl Default for TestOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for TestOrderRepository {
    async fn create(&self, input: &NewOrder) -> Result<Order> {
        let order = Order {
            customer_id: input.customer_id,
            restaurant_id: input.restaurant_id,
            order_type: input.order_type,
            total_price: input.total_price,
            delivery_address: input.delivery_address.clone(),
            request: input.request.clone(),
            ..Default::default()
        };
        let mut items = self.items.write().await;
        for item in &input.items {
            items.push(OrderItem {
                id: StringUuid::new_v4(),
                order_id: order.id,
                menu_id: item.menu_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
            });
        }
        self.orders.write().await.push(order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.iter().find(|o| o.id == id).cloned())
    }

    async fn find_items(&self, order_id: StringUuid) -> Result<Vec<OrderItem>> {
        let items = self.items.read().await;
        Ok(items
            .iter()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn list(&self, filter: &OrderFilter, page: PageRequest) -> Result<Page<Order>> {
        let mut matching: Vec<Order> = self
            .orders
            .read()
            .await
            .iter()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(&matching, page))
    }

    async fn cancel(&self, id: StringUuid, cancelled_by: &str) -> Result<()> {
        let mut orders = self.orders.write().await;
        let order = orders
            .iter_mut()
            .find(|o| o.id == id && !o.is_cancelled())
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))?;
        order.status = OrderStatus::Cancelled;
        order.cancelled_at = Some(Utc::now());
        order.cancelled_by = Some(cancelled_by.to_string());
        Ok(())
    }
}

// ============================================================================
// Payments
// ============================================================================

pub struct TestPaymentRepository {
    payments: RwLock<Vec<Payment>>,
}

impl TestPaymentRepository {
    pub fn new() -> Self {
        Self {
            payments: RwLock::new(vec![]),
        }
    }

    pub async fn add_payment(&self, payment: Payment) {
        self.payments.write().await.push(payment);
    }

    pub async fn get_raw(&self, id: StringUuid) -> Option<Payment> {
        self.payments.read().await.iter().find(|p| p.id == id).cloned()
    }
}

impl Default for TestPaymentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentRepository for TestPaymentRepository {
    async fn create(&self, input: &NewPayment) -> Result<Payment> {
        let payment = Payment {
            order_id: input.order_id,
            customer_id: input.customer_id,
            restaurant_id: input.restaurant_id,
            amount: input.amount,
            status: PaymentStatus::Completed,
            ..Default::default()
        };
        self.payments.write().await.push(payment.clone());
        Ok(payment)
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Payment>> {
        let payments = self.payments.read().await;
        Ok(payments
            .iter()
            .find(|p| p.id == id && p.deleted_at.is_none())
            .cloned())
    }

    async fn exists_for_order(&self, order_id: StringUuid) -> Result<bool> {
        let payments = self.payments.read().await;
        Ok(payments.iter().any(|p| p.order_id == order_id))
    }

    async fn list(&self, filter: &PaymentFilter, page: PageRequest) -> Result<Page<Payment>> {
        let mut matching: Vec<Payment> = self
            .payments
            .read()
            .await
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(&matching, page))
    }

    async fn cancel(&self, id: StringUuid, deleted_by: &str) -> Result<()> {
        let mut payments = self.payments.write().await;
        let payment = payments
            .iter_mut()
            .find(|p| p.id == id && p.deleted_at.is_none())
            .ok_or_else(|| AppError::NotFound(format!("Payment {} not found", id)))?;
        payment.status = PaymentStatus::Cancelled;
        payment.deleted_at = Some(Utc::now());
        payment.deleted_by = Some(deleted_by.to_string());
        Ok(())
    }
}

// ============================================================================
// Reviews
// ============================================================================

pub struct TestReviewRepository {
    reviews: Arc<RwLock<Vec<Review>>>,
}

impl TestReviewRepository {
    pub fn new(reviews: Arc<RwLock<Vec<Review>>>) -> Self {
        Self { reviews }
    }

    pub async fn add_review(&self, review: Review) {
        self.reviews.write().await.push(review);
    }

    pub async fn get_raw(&self, id: StringUuid) -> Option<Review> {
        self.reviews.read().await.iter().find(|v| v.id == id).cloned()
    }
}

#[async_trait]
impl ReviewRepository for TestReviewRepository {
    async fn create(&self, input: &NewReview) -> Result<Review> {
        let review = Review {
            order_id: input.order_id,
            customer_id: input.customer_id,
            restaurant_id: input.restaurant_id,
            rating: input.rating,
            content: input.content.clone(),
            ..Default::default()
        };
        self.reviews.write().await.push(review.clone());
        Ok(review)
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Review>> {
        let reviews = self.reviews.read().await;
        Ok(reviews
            .iter()
            .find(|v| v.id == id && v.deleted_at.is_none())
            .cloned())
    }

    async fn exists_for_order(&self, order_id: StringUuid) -> Result<bool> {
        let reviews = self.reviews.read().await;
        Ok(reviews.iter().any(|v| v.order_id == order_id))
    }

    async fn list(&self, filter: &ReviewFilter, page: PageRequest) -> Result<Page<Review>> {
        let mut matching: Vec<Review> = self
            .reviews
            .read()
            .await
            .iter()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(&matching, page))
    }

    async fn soft_delete(&self, id: StringUuid, deleted_by: &str) -> Result<()> {
        let mut reviews = self.reviews.write().await;
        let review = reviews
            .iter_mut()
            .find(|v| v.id == id && v.deleted_at.is_none())
            .ok_or_else(|| AppError::NotFound(format!("Review {} not found", id)))?;
        review.deleted_at = Some(Utc::now());
        review.deleted_by = Some(deleted_by.to_string());
        Ok(())
    }
}
