//! Restaurant repository

use super::push_name_search;
use crate::domain::{
    Page, PageRequest, RatedRestaurant, Restaurant, RestaurantFilter, RestaurantInput, StringUuid,
};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::{MySql, MySqlPool, QueryBuilder};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    async fn create(&self, input: &RestaurantInput) -> Result<Restaurant>;
    /// Non-deleted restaurant by id; hidden ones are returned too
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Restaurant>>;
    async fn update(&self, id: StringUuid, input: &RestaurantInput) -> Result<Restaurant>;
    async fn set_hidden(&self, id: StringUuid, hidden: bool) -> Result<()>;
    async fn soft_delete(&self, id: StringUuid, deleted_by: &str) -> Result<()>;
    /// Visible restaurants matching the filter, each with its average rating
    async fn list(
        &self,
        filter: &RestaurantFilter,
        page: PageRequest,
    ) -> Result<Page<RatedRestaurant>>;
    /// Mean rating over live reviews; `None` when there are none
    async fn average_rating(&self, id: StringUuid) -> Result<Option<f64>>;
    /// Ids of the non-deleted restaurants owned by a user
    async fn ids_by_owner(&self, owner_id: StringUuid) -> Result<Vec<StringUuid>>;
}

pub struct RestaurantRepositoryImpl {
    pool: MySqlPool,
}

impl RestaurantRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/// Appends the WHERE conditions shared by the page and count queries
fn push_filter(builder: &mut QueryBuilder<'_, MySql>, filter: &RestaurantFilter) {
    builder.push(" WHERE r.is_hidden = FALSE AND r.deleted_at IS NULL");
    if let Some(category_id) = filter.category_id {
        builder.push(" AND r.category_id = ").push_bind(category_id);
    }
    if let Some(search) = filter.search.as_deref() {
        push_name_search(builder, "r.name", search);
    }
}

#[async_trait]
impl RestaurantRepository for RestaurantRepositoryImpl {
    async fn create(&self, input: &RestaurantInput) -> Result<Restaurant> {
        let id = StringUuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO restaurants (id, name, category_id, owner_id, address, is_hidden, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, FALSE, NOW(), NOW())
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.category_id)
        .bind(input.owner_id)
        .bind(&input.address)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create restaurant")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Restaurant>> {
        let restaurant = sqlx::query_as::<_, Restaurant>(
            r#"
            SELECT id, name, category_id, owner_id, address, is_hidden,
                   created_at, updated_at, deleted_at, deleted_by
            FROM restaurants
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(restaurant)
    }

    async fn update(&self, id: StringUuid, input: &RestaurantInput) -> Result<Restaurant> {
        let result = sqlx::query(
            r#"
            UPDATE restaurants
            SET name = ?, category_id = ?, owner_id = ?, address = ?, updated_at = NOW()
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(&input.name)
        .bind(input.category_id)
        .bind(input.owner_id)
        .bind(&input.address)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Restaurant {} not found", id)));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to update restaurant")))
    }

    async fn set_hidden(&self, id: StringUuid, hidden: bool) -> Result<()> {
        let result = sqlx::query(
            "UPDATE restaurants SET is_hidden = ?, updated_at = NOW() WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(hidden)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Restaurant {} not found", id)));
        }
        Ok(())
    }

    async fn soft_delete(&self, id: StringUuid, deleted_by: &str) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE restaurants
            SET deleted_at = NOW(), deleted_by = ?, updated_at = NOW()
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(deleted_by)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Restaurant {} not found", id)));
        }
        Ok(())
    }

    async fn list(
        &self,
        filter: &RestaurantFilter,
        page: PageRequest,
    ) -> Result<Page<RatedRestaurant>> {
        let mut query = QueryBuilder::<MySql>::new(
            r#"
            SELECT r.id, r.name, r.category_id, r.owner_id, r.address, r.is_hidden,
                   r.created_at, r.updated_at, r.deleted_at, r.deleted_by,
                   CAST(AVG(v.rating) AS DOUBLE) AS average_rating
            FROM restaurants r
            LEFT JOIN reviews v ON v.restaurant_id = r.id AND v.deleted_at IS NULL
            "#,
        );
        push_filter(&mut query, filter);
        query
            .push(" GROUP BY r.id ORDER BY r.created_at DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let items = query
            .build_query_as::<RatedRestaurant>()
            .fetch_all(&self.pool)
            .await?;

        let mut count = QueryBuilder::<MySql>::new("SELECT COUNT(*) FROM restaurants r");
        push_filter(&mut count, filter);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        Ok(Page::new(items, total))
    }

    async fn average_rating(&self, id: StringUuid) -> Result<Option<f64>> {
        let row: (Option<f64>,) = sqlx::query_as(
            r#"
            SELECT CAST(AVG(rating) AS DOUBLE)
            FROM reviews
            WHERE restaurant_id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }

    async fn ids_by_owner(&self, owner_id: StringUuid) -> Result<Vec<StringUuid>> {
        let ids: Vec<StringUuid> = sqlx::query_scalar(
            "SELECT id FROM restaurants WHERE owner_id = ? AND deleted_at IS NULL",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}
