//! Menu domain model

use super::common::StringUuid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Menu item of a restaurant. Prices are integers in the minor currency unit.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Menu {
    pub id: StringUuid,
    pub restaurant_id: StringUuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub is_hidden: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub deleted_by: Option<String>,
}

impl Default for Menu {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            restaurant_id: StringUuid::new_v4(),
            name: String::new(),
            description: None,
            price: 0,
            is_hidden: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            deleted_by: None,
        }
    }
}

impl Menu {
    pub fn is_visible(&self) -> bool {
        !self.is_hidden && self.deleted_at.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct MenuInput {
    pub restaurant_id: StringUuid,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    /// Minor currency units, at most 100,000,000
    #[validate(range(min = 0, max = 100_000_000))]
    pub price: i64,
    #[serde(default)]
    pub is_hidden: bool,
}

/// Predicate for menu listings. Hidden and deleted menus are always excluded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuFilter {
    pub restaurant_id: Option<StringUuid>,
    pub search: Option<String>,
}

impl MenuFilter {
    pub fn matches(&self, menu: &Menu) -> bool {
        if !menu.is_visible() {
            return false;
        }
        if let Some(restaurant_id) = self.restaurant_id {
            if menu.restaurant_id != restaurant_id {
                return false;
            }
        }
        match &self.search {
            Some(term) => menu.name.to_lowercase().contains(&term.to_lowercase()),
            None => true,
        }
    }
}
