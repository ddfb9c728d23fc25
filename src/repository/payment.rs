//! Payment repository

use super::push_in_ids;
use crate::domain::{NewPayment, Page, PageRequest, Payment, PaymentFilter, PaymentStatus, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::{MySql, MySqlPool, QueryBuilder};

const PAYMENT_COLUMNS: &str = "id, order_id, customer_id, restaurant_id, amount, status, \
     created_at, updated_at, deleted_at, deleted_by";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create(&self, input: &NewPayment) -> Result<Payment>;
    /// Live (not cancelled) payment by id
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Payment>>;
    /// Whether any payment, cancelled ones included, was ever recorded for the order
    async fn exists_for_order(&self, order_id: StringUuid) -> Result<bool>;
    async fn list(&self, filter: &PaymentFilter, page: PageRequest) -> Result<Page<Payment>>;
    /// Mark CANCELLED and soft-delete
    async fn cancel(&self, id: StringUuid, deleted_by: &str) -> Result<()>;
}

pub struct PaymentRepositoryImpl {
    pool: MySqlPool,
}

impl PaymentRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, MySql>, filter: &PaymentFilter) {
    builder.push(" WHERE deleted_at IS NULL");
    if let Some(customer_id) = filter.customer_id {
        builder.push(" AND customer_id = ").push_bind(customer_id);
    }
    if let Some(ids) = filter.restaurant_ids.as_deref() {
        push_in_ids(builder, "restaurant_id", ids);
    }
}

#[async_trait]
impl PaymentRepository for PaymentRepositoryImpl {
    async fn create(&self, input: &NewPayment) -> Result<Payment> {
        let id = StringUuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO payments (id, order_id, customer_id, restaurant_id, amount, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(id)
        .bind(input.order_id)
        .bind(input.customer_id)
        .bind(input.restaurant_id)
        .bind(input.amount)
        .bind(PaymentStatus::Completed)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create payment")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {} FROM payments WHERE id = ? AND deleted_at IS NULL",
            PAYMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    async fn exists_for_order(&self, order_id: StringUuid) -> Result<bool> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM payments WHERE order_id = ?")
            .bind(order_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0 > 0)
    }

    async fn list(&self, filter: &PaymentFilter, page: PageRequest) -> Result<Page<Payment>> {
        let mut query =
            QueryBuilder::<MySql>::new(format!("SELECT {} FROM payments", PAYMENT_COLUMNS));
        push_filter(&mut query, filter);
        query
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let items = query
            .build_query_as::<Payment>()
            .fetch_all(&self.pool)
            .await?;

        let mut count = QueryBuilder::<MySql>::new("SELECT COUNT(*) FROM payments");
        push_filter(&mut count, filter);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        Ok(Page::new(items, total))
    }

    async fn cancel(&self, id: StringUuid, deleted_by: &str) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE payments
            SET status = ?, deleted_at = NOW(), deleted_by = ?, updated_at = NOW()
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(PaymentStatus::Cancelled)
        .bind(deleted_by)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Payment {} not found", id)));
        }
        Ok(())
    }
}
