//! Payments for orders

use crate::domain::{
    Caller, NewPayment, Order, Page, PageRequest, Payment, PaymentFilter, Role, StringUuid,
};
use crate::error::{AppError, Result};
use crate::policy;
use crate::repository::{OrderRepository, PaymentRepository, RestaurantRepository};
use std::sync::Arc;
use tracing::info;

pub struct PaymentService<P: PaymentRepository, O: OrderRepository, R: RestaurantRepository> {
    repo: Arc<P>,
    order_repo: Arc<O>,
    restaurant_repo: Arc<R>,
}

impl<P: PaymentRepository, O: OrderRepository, R: RestaurantRepository> PaymentService<P, O, R> {
    pub fn new(repo: Arc<P>, order_repo: Arc<O>, restaurant_repo: Arc<R>) -> Self {
        Self {
            repo,
            order_repo,
            restaurant_repo,
        }
    }

    async fn find_payment(&self, id: StringUuid) -> Result<Payment> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Payment {} not found", id)))
    }

    /// Pay for one of the caller's own orders. The amount is always the order total.
    pub async fn create(&self, order_id: StringUuid, caller: &Caller) -> Result<Payment> {
        let order: Order = self
            .order_repo
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", order_id)))?;

        if order.customer_id != caller.user_id {
            return Err(AppError::Forbidden(
                "Only the ordering customer may pay for this order".to_string(),
            ));
        }
        if order.is_cancelled() {
            return Err(AppError::BadRequest(format!(
                "Order {} is cancelled",
                order_id
            )));
        }
        if self.repo.exists_for_order(order_id).await? {
            return Err(AppError::Conflict(format!(
                "Order {} has already been paid",
                order_id
            )));
        }

        let payment = self
            .repo
            .create(&NewPayment {
                order_id,
                customer_id: order.customer_id,
                restaurant_id: order.restaurant_id,
                amount: order.total_price,
            })
            .await?;
        metrics::counter!("delivery_payments_total", "status" => "completed").increment(1);
        info!(payment_id = %payment.id, order_id = %order_id, amount = payment.amount, "Payment recorded");
        Ok(payment)
    }

    pub async fn get(&self, id: StringUuid, caller: &Caller) -> Result<Payment> {
        let payment = self.find_payment(id).await?;
        if caller.is_admin() || payment.customer_id == caller.user_id {
            return Ok(payment);
        }
        if caller.role == Role::Owner {
            let owned = self.restaurant_repo.ids_by_owner(caller.user_id).await?;
            if owned.contains(&payment.restaurant_id) {
                return Ok(payment);
            }
        }
        Err(AppError::Forbidden(
            "Not allowed to view this payment".to_string(),
        ))
    }

    pub async fn list(&self, page: PageRequest, caller: &Caller) -> Result<Page<Payment>> {
        let filter = match caller.role {
            Role::Manager | Role::Master => PaymentFilter::default(),
            Role::Owner => PaymentFilter {
                customer_id: None,
                restaurant_ids: Some(self.restaurant_repo.ids_by_owner(caller.user_id).await?),
            },
            _ => PaymentFilter {
                customer_id: Some(caller.user_id),
                restaurant_ids: None,
            },
        };
        self.repo.list(&filter, page).await
    }

    pub async fn cancel(&self, id: StringUuid, caller: &Caller) -> Result<()> {
        let payment = self.find_payment(id).await?;
        policy::require_owner_or_admin(caller, payment.customer_id)?;

        self.repo.cancel(id, &caller.username).await?;
        metrics::counter!("delivery_payments_total", "status" => "cancelled").increment(1);
        info!(payment_id = %id, by = %caller.username, "Payment cancelled");
        Ok(())
    }
}
