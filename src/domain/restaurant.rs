//! Restaurant domain model

use super::common::StringUuid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Restaurant entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Restaurant {
    pub id: StringUuid,
    pub name: String,
    pub category_id: StringUuid,
    pub owner_id: StringUuid,
    pub address: String,
    pub is_hidden: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<String>,
}

impl Default for Restaurant {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            name: String::new(),
            category_id: StringUuid::new_v4(),
            owner_id: StringUuid::new_v4(),
            address: String::new(),
            is_hidden: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            deleted_by: None,
        }
    }
}

impl Restaurant {
    /// Neither hidden nor soft-deleted
    pub fn is_visible(&self) -> bool {
        !self.is_hidden && self.deleted_at.is_none()
    }
}

/// Restaurant row joined with the mean rating of its live reviews
#[derive(Debug, Clone, FromRow)]
pub struct RatedRestaurant {
    #[sqlx(flatten)]
    pub restaurant: Restaurant,
    pub average_rating: Option<f64>,
}

/// Full replacement of a restaurant's editable fields
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RestaurantInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub category_id: StringUuid,
    pub owner_id: StringUuid,
    #[validate(length(min = 1, max = 255))]
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VisibilityInput {
    pub hidden: bool,
}

/// Restaurant as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RestaurantResponse {
    pub id: StringUuid,
    pub name: String,
    pub category_id: StringUuid,
    pub owner_id: StringUuid,
    pub address: String,
    /// Mean review rating; null when the restaurant has no reviews
    pub average_rating: Option<f64>,
}

impl RestaurantResponse {
    pub fn new(restaurant: Restaurant, average_rating: Option<f64>) -> Self {
        Self {
            id: restaurant.id,
            name: restaurant.name,
            category_id: restaurant.category_id,
            owner_id: restaurant.owner_id,
            address: restaurant.address,
            average_rating,
        }
    }
}

impl From<RatedRestaurant> for RestaurantResponse {
    fn from(rated: RatedRestaurant) -> Self {
        Self::new(rated.restaurant, rated.average_rating)
    }
}

/// Predicate for restaurant listings. Hidden and deleted rows are always
/// excluded; the optional parts narrow further.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestaurantFilter {
    pub category_id: Option<StringUuid>,
    /// Case-insensitive substring of the name
    pub search: Option<String>,
}

impl RestaurantFilter {
    pub fn matches(&self, restaurant: &Restaurant) -> bool {
        if !restaurant.is_visible() {
            return false;
        }
        if let Some(category_id) = self.category_id {
            if restaurant.category_id != category_id {
                return false;
            }
        }
        match &self.search {
            Some(term) => restaurant
                .name
                .to_lowercase()
                .contains(&term.to_lowercase()),
            None => true,
        }
    }
}
