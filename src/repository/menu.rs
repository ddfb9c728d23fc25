//! Menu repository

use super::push_name_search;
use crate::domain::{Menu, MenuFilter, MenuInput, Page, PageRequest, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::{MySql, MySqlPool, QueryBuilder};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuRepository: Send + Sync {
    async fn create(&self, input: &MenuInput) -> Result<Menu>;
    /// Non-deleted menu by id; hidden ones are returned too
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Menu>>;
    async fn update(&self, id: StringUuid, input: &MenuInput) -> Result<Menu>;
    async fn soft_delete(&self, id: StringUuid, deleted_by: &str) -> Result<()>;
    /// Visible menus of visible restaurants matching the filter
    async fn list(&self, filter: &MenuFilter, page: PageRequest) -> Result<Page<Menu>>;
}

pub struct MenuRepositoryImpl {
    pool: MySqlPool,
}

impl MenuRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, MySql>, filter: &MenuFilter) {
    builder.push(
        " WHERE m.is_hidden = FALSE AND m.deleted_at IS NULL \
         AND r.is_hidden = FALSE AND r.deleted_at IS NULL",
    );
    if let Some(restaurant_id) = filter.restaurant_id {
        builder.push(" AND m.restaurant_id = ").push_bind(restaurant_id);
    }
    if let Some(search) = filter.search.as_deref() {
        push_name_search(builder, "m.name", search);
    }
}

#[async_trait]
impl MenuRepository for MenuRepositoryImpl {
    async fn create(&self, input: &MenuInput) -> Result<Menu> {
        let id = StringUuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO menus (id, restaurant_id, name, description, price, is_hidden, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(id)
        .bind(input.restaurant_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.is_hidden)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create menu")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Menu>> {
        let menu = sqlx::query_as::<_, Menu>(
            r#"
            SELECT id, restaurant_id, name, description, price, is_hidden,
                   created_at, updated_at, deleted_at, deleted_by
            FROM menus
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(menu)
    }

    async fn update(&self, id: StringUuid, input: &MenuInput) -> Result<Menu> {
        let result = sqlx::query(
            r#"
            UPDATE menus
            SET restaurant_id = ?, name = ?, description = ?, price = ?, is_hidden = ?, updated_at = NOW()
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(input.restaurant_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.is_hidden)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Menu {} not found", id)));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to update menu")))
    }

    async fn soft_delete(&self, id: StringUuid, deleted_by: &str) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE menus
            SET deleted_at = NOW(), deleted_by = ?, updated_at = NOW()
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(deleted_by)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Menu {} not found", id)));
        }
        Ok(())
    }

    async fn list(&self, filter: &MenuFilter, page: PageRequest) -> Result<Page<Menu>> {
        let mut query = QueryBuilder::<MySql>::new(
            r#"
            SELECT m.id, m.restaurant_id, m.name, m.description, m.price, m.is_hidden,
                   m.created_at, m.updated_at, m.deleted_at, m.deleted_by
            FROM menus m
            JOIN restaurants r ON r.id = m.restaurant_id
            "#,
        );
        push_filter(&mut query, filter);
        query
            .push(" ORDER BY m.name LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let items = query
            .build_query_as::<Menu>()
            .fetch_all(&self.pool)
            .await?;

        let mut count = QueryBuilder::<MySql>::new(
            "SELECT COUNT(*) FROM menus m JOIN restaurants r ON r.id = m.restaurant_id",
        );
        push_filter(&mut count, filter);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        Ok(Page::new(items, total))
    }
}
