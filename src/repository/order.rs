//! Order repository

use super::push_in_ids;
use crate::domain::{NewOrder, Order, OrderFilter, OrderItem, OrderStatus, Page, PageRequest, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::{MySql, MySqlPool, QueryBuilder};

const ORDER_COLUMNS: &str = "id, customer_id, restaurant_id, order_type, status, total_price, \
     delivery_address, request, created_at, updated_at, cancelled_at, cancelled_by";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist the order and all of its items atomically
    async fn create(&self, input: &NewOrder) -> Result<Order>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Order>>;
    async fn find_items(&self, order_id: StringUuid) -> Result<Vec<OrderItem>>;
    async fn list(&self, filter: &OrderFilter, page: PageRequest) -> Result<Page<Order>>;
    async fn cancel(&self, id: StringUuid, cancelled_by: &str) -> Result<()>;
}

pub struct OrderRepositoryImpl {
    pool: MySqlPool,
}

impl OrderRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, MySql>, filter: &OrderFilter) {
    builder.push(" WHERE 1 = 1");
    if let Some(customer_id) = filter.customer_id {
        builder.push(" AND customer_id = ").push_bind(customer_id);
    }
    if let Some(ids) = filter.restaurant_ids.as_deref() {
        push_in_ids(builder, "restaurant_id", ids);
    }
}

#[async_trait]
impl OrderRepository for OrderRepositoryImpl {
    async fn create(&self, input: &NewOrder) -> Result<Order> {
        let id = StringUuid::new_v4();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, customer_id, restaurant_id, order_type, status, total_price,
                                delivery_address, request, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(id)
        .bind(input.customer_id)
        .bind(input.restaurant_id)
        .bind(input.order_type)
        .bind(OrderStatus::Pending)
        .bind(input.total_price)
        .bind(&input.delivery_address)
        .bind(&input.request)
        .execute(&mut *tx)
        .await?;

        for item in &input.items {
            sqlx::query(
                r#"
                INSERT INTO order_items (id, order_id, menu_id, quantity, unit_price)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(StringUuid::new_v4())
            .bind(id)
            .bind(item.menu_id)
            .bind(item.quantity)
            .bind(item.unit_price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create order")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE id = ?",
            ORDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    async fn find_items(&self, order_id: StringUuid) -> Result<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, menu_id, quantity, unit_price
            FROM order_items
            WHERE order_id = ?
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn list(&self, filter: &OrderFilter, page: PageRequest) -> Result<Page<Order>> {
        let mut query = QueryBuilder::<MySql>::new(format!("SELECT {} FROM orders", ORDER_COLUMNS));
        push_filter(&mut query, filter);
        query
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let items = query
            .build_query_as::<Order>()
            .fetch_all(&self.pool)
            .await?;

        let mut count = QueryBuilder::<MySql>::new("SELECT COUNT(*) FROM orders");
        push_filter(&mut count, filter);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        Ok(Page::new(items, total))
    }

    async fn cancel(&self, id: StringUuid, cancelled_by: &str) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = ?, cancelled_at = NOW(), cancelled_by = ?, updated_at = NOW()
            WHERE id = ? AND status <> ?
            "#,
        )
        .bind(OrderStatus::Cancelled)
        .bind(cancelled_by)
        .bind(id)
        .bind(OrderStatus::Cancelled)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::BadRequest(format!(
                "Order {} is already cancelled",
                id
            )));
        }
        Ok(())
    }
}
