//! Review domain model

use super::common::StringUuid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Review left by a customer for one of their orders
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Review {
    pub id: StringUuid,
    pub order_id: StringUuid,
    pub customer_id: StringUuid,
    pub restaurant_id: StringUuid,
    pub rating: i32,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub deleted_by: Option<String>,
}

impl Default for Review {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            order_id: StringUuid::new_v4(),
            customer_id: StringUuid::new_v4(),
            restaurant_id: StringUuid::new_v4(),
            rating: 5,
            content: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            deleted_by: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateReviewInput {
    pub order_id: StringUuid,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(max = 1000))]
    pub content: Option<String>,
}

/// Row data for a review; restaurant is copied from the order
#[derive(Debug, Clone)]
pub struct NewReview {
    pub order_id: StringUuid,
    pub customer_id: StringUuid,
    pub restaurant_id: StringUuid,
    pub rating: i32,
    pub content: Option<String>,
}

/// Predicate for review listings. Deleted reviews are always excluded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewFilter {
    pub restaurant_id: Option<StringUuid>,
}

impl ReviewFilter {
    pub fn matches(&self, review: &Review) -> bool {
        if review.deleted_at.is_some() {
            return false;
        }
        match self.restaurant_id {
            Some(restaurant_id) => review.restaurant_id == restaurant_id,
            None => true,
        }
    }
}
