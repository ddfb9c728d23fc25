//! Order domain model

use super::common::{mysql_string_enum, StringUuid};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// How long after placing an order its customer may still cancel it
pub const CUSTOMER_CANCEL_WINDOW_SECS: i64 = 5 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Delivery,
    Takeout,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Delivery => "DELIVERY",
            OrderType::Takeout => "TAKEOUT",
        }
    }
}

impl std::str::FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DELIVERY" => Ok(OrderType::Delivery),
            "TAKEOUT" => Ok(OrderType::Takeout),
            _ => Err(format!("Unknown order type: {}", s)),
        }
    }
}

mysql_string_enum!(OrderType);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Cancelled,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Completed => "COMPLETED",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(OrderStatus::Pending),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            "COMPLETED" => Ok(OrderStatus::Completed),
            _ => Err(format!("Unknown order status: {}", s)),
        }
    }
}

mysql_string_enum!(OrderStatus);

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Order {
    pub id: StringUuid,
    pub customer_id: StringUuid,
    pub restaurant_id: StringUuid,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub total_price: i64,
    pub delivery_address: Option<String>,
    pub request: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancelled_by: Option<String>,
}

impl Default for Order {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            customer_id: StringUuid::new_v4(),
            restaurant_id: StringUuid::new_v4(),
            order_type: OrderType::Takeout,
            status: OrderStatus::default(),
            total_price: 0,
            delivery_address: None,
            request: None,
            created_at: now,
            updated_at: now,
            cancelled_at: None,
            cancelled_by: None,
        }
    }
}

impl Order {
    pub fn is_cancelled(&self) -> bool {
        self.status == OrderStatus::Cancelled
    }

    /// Whether the customer's cancellation window is still open at `now`
    pub fn within_cancel_window(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at <= Duration::seconds(CUSTOMER_CANCEL_WINDOW_SECS)
    }
}

/// Line of an order, priced at the time it was placed
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OrderItem {
    pub id: StringUuid,
    pub order_id: StringUuid,
    pub menu_id: StringUuid,
    pub quantity: i32,
    pub unit_price: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderItemInput {
    pub menu_id: StringUuid,
    #[validate(range(min = 1, max = 100))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderInput {
    pub restaurant_id: StringUuid,
    pub order_type: OrderType,
    #[validate(length(min = 1, max = 255))]
    pub delivery_address: Option<String>,
    #[validate(length(max = 500))]
    pub request: Option<String>,
    #[validate(length(min = 1, max = 50), nested)]
    pub items: Vec<OrderItemInput>,
}

/// Priced order ready to be persisted together with its items
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: StringUuid,
    pub restaurant_id: StringUuid,
    pub order_type: OrderType,
    pub total_price: i64,
    pub delivery_address: Option<String>,
    pub request: Option<String>,
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub menu_id: StringUuid,
    pub quantity: i32,
    pub unit_price: i64,
}

/// Order with its lines
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Predicate for order listings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    pub customer_id: Option<StringUuid>,
    /// Restrict to these restaurants; an empty list matches nothing
    pub restaurant_ids: Option<Vec<StringUuid>>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(customer_id) = self.customer_id {
            if order.customer_id != customer_id {
                return false;
            }
        }
        match &self.restaurant_ids {
            Some(ids) => ids.contains(&order.restaurant_id),
            None => true,
        }
    }
}
