//! Category repository

use crate::domain::{Category, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, name: &str) -> Result<Category>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Category>>;
    /// Whether a live category other than `exclude` already uses this name
    async fn exists_by_name(&self, name: &str, exclude: Option<StringUuid>) -> Result<bool>;
    async fn list(&self) -> Result<Vec<Category>>;
    async fn update(&self, id: StringUuid, name: &str) -> Result<Category>;
    async fn soft_delete(&self, id: StringUuid, deleted_by: &str) -> Result<()>;
}

pub struct CategoryRepositoryImpl {
    pool: MySqlPool,
}

impl CategoryRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for CategoryRepositoryImpl {
    async fn create(&self, name: &str) -> Result<Category> {
        let id = StringUuid::new_v4();

        sqlx::query(
            "INSERT INTO categories (id, name, created_at, updated_at) VALUES (?, ?, NOW(), NOW())",
        )
        .bind(id)
        .bind(name)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create category")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, created_at, updated_at, deleted_at, deleted_by
            FROM categories
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn exists_by_name(&self, name: &str, exclude: Option<StringUuid>) -> Result<bool> {
        let row: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM categories
            WHERE name = ? AND deleted_at IS NULL AND (? IS NULL OR id <> ?)
            "#,
        )
        .bind(name)
        .bind(exclude)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0 > 0)
    }

    async fn list(&self) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, created_at, updated_at, deleted_at, deleted_by
            FROM categories
            WHERE deleted_at IS NULL
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn update(&self, id: StringUuid, name: &str) -> Result<Category> {
        let result = sqlx::query(
            "UPDATE categories SET name = ?, updated_at = NOW() WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(name)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to update category")))
    }

    async fn soft_delete(&self, id: StringUuid, deleted_by: &str) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE categories
            SET deleted_at = NOW(), deleted_by = ?, updated_at = NOW()
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(deleted_by)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }

        Ok(())
    }
}
