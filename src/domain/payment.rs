//! Payment domain model

use super::common::{mysql_string_enum, StringUuid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Completed,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Completed => "COMPLETED",
            PaymentStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "COMPLETED" => Ok(PaymentStatus::Completed),
            "CANCELLED" => Ok(PaymentStatus::Cancelled),
            _ => Err(format!("Unknown payment status: {}", s)),
        }
    }
}

mysql_string_enum!(PaymentStatus);

/// Payment for exactly one order
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Payment {
    pub id: StringUuid,
    pub order_id: StringUuid,
    pub customer_id: StringUuid,
    pub restaurant_id: StringUuid,
    pub amount: i64,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub deleted_by: Option<String>,
}

impl Default for Payment {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            order_id: StringUuid::new_v4(),
            customer_id: StringUuid::new_v4(),
            restaurant_id: StringUuid::new_v4(),
            amount: 0,
            status: PaymentStatus::default(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
            deleted_by: None,
        }
    }
}

/// Row data for a payment being recorded
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub order_id: StringUuid,
    pub customer_id: StringUuid,
    pub restaurant_id: StringUuid,
    pub amount: i64,
}

/// Predicate for payment listings. Deleted payments are always excluded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentFilter {
    pub customer_id: Option<StringUuid>,
    pub restaurant_ids: Option<Vec<StringUuid>>,
}

impl PaymentFilter {
    pub fn matches(&self, payment: &Payment) -> bool {
        if payment.deleted_at.is_some() {
            return false;
        }
        if let Some(customer_id) = self.customer_id {
            if payment.customer_id != customer_id {
                return false;
            }
        }
        match &self.restaurant_ids {
            Some(ids) => ids.contains(&payment.restaurant_id),
            None => true,
        }
    }
}
