//! Review repository

use crate::domain::{NewReview, Page, PageRequest, Review, ReviewFilter, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::{MySql, MySqlPool, QueryBuilder};

const REVIEW_COLUMNS: &str = "id, order_id, customer_id, restaurant_id, rating, content, \
     created_at, updated_at, deleted_at, deleted_by";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn create(&self, input: &NewReview) -> Result<Review>;
    /// Live (not deleted) review by id
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Review>>;
    /// Whether the order was ever reviewed, deleted reviews included
    async fn exists_for_order(&self, order_id: StringUuid) -> Result<bool>;
    async fn list(&self, filter: &ReviewFilter, page: PageRequest) -> Result<Page<Review>>;
    async fn soft_delete(&self, id: StringUuid, deleted_by: &str) -> Result<()>;
}

pub struct ReviewRepositoryImpl {
    pool: MySqlPool,
}

impl ReviewRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, MySql>, filter: &ReviewFilter) {
    builder.push(" WHERE deleted_at IS NULL");
    if let Some(restaurant_id) = filter.restaurant_id {
        builder.push(" AND restaurant_id = ").push_bind(restaurant_id);
    }
}

#[async_trait]
impl ReviewRepository for ReviewRepositoryImpl {
    async fn create(&self, input: &NewReview) -> Result<Review> {
        let id = StringUuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO reviews (id, order_id, customer_id, restaurant_id, rating, content, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(id)
        .bind(input.order_id)
        .bind(input.customer_id)
        .bind(input.restaurant_id)
        .bind(input.rating)
        .bind(&input.content)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create review")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Review>> {
        let review = sqlx::query_as::<_, Review>(&format!(
            "SELECT {} FROM reviews WHERE id = ? AND deleted_at IS NULL",
            REVIEW_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    async fn exists_for_order(&self, order_id: StringUuid) -> Result<bool> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reviews WHERE order_id = ?")
            .bind(order_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0 > 0)
    }

    async fn list(&self, filter: &ReviewFilter, page: PageRequest) -> Result<Page<Review>> {
        let mut query =
            QueryBuilder::<MySql>::new(format!("SELECT {} FROM reviews", REVIEW_COLUMNS));
        push_filter(&mut query, filter);
        query
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let items = query
            .build_query_as::<Review>()
            .fetch_all(&self.pool)
            .await?;

        let mut count = QueryBuilder::<MySql>::new("SELECT COUNT(*) FROM reviews");
        push_filter(&mut count, filter);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        Ok(Page::new(items, total))
    }

    async fn soft_delete(&self, id: StringUuid, deleted_by: &str) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE reviews
            SET deleted_at = NOW(), deleted_by = ?, updated_at = NOW()
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(deleted_by)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Review {} not found", id)));
        }
        Ok(())
    }
}
