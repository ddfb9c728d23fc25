//! Order placement, lookup and cancellation

use crate::domain::{
    Caller, CreateOrderInput, Menu, NewOrder, NewOrderItem, Order, OrderDetail, OrderFilter,
    OrderType, Page, PageRequest, Restaurant, Role, StringUuid,
};
use crate::error::{AppError, Result};
use crate::repository::{MenuRepository, OrderRepository, RestaurantRepository};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

pub struct OrderService<O: OrderRepository, R: RestaurantRepository, M: MenuRepository> {
    repo: Arc<O>,
    restaurant_repo: Arc<R>,
    menu_repo: Arc<M>,
}

impl<O: OrderRepository, R: RestaurantRepository, M: MenuRepository> OrderService<O, R, M> {
    pub fn new(repo: Arc<O>, restaurant_repo: Arc<R>, menu_repo: Arc<M>) -> Self {
        Self {
            repo,
            restaurant_repo,
            menu_repo,
        }
    }

    async fn find_order(&self, id: StringUuid) -> Result<Order> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))
    }

    /// Whether the caller owns the restaurant the order was placed with
    async fn is_restaurant_owner(&self, order: &Order, caller: &Caller) -> Result<bool> {
        if caller.role != Role::Owner {
            return Ok(false);
        }
        Ok(self
            .restaurant_repo
            .find_by_id(order.restaurant_id)
            .await?
            .is_some_and(|r| r.owner_id == caller.user_id))
    }

    async fn price_item(
        &self,
        restaurant_id: StringUuid,
        menu_id: StringUuid,
        quantity: i32,
    ) -> Result<NewOrderItem> {
        let menu = self
            .menu_repo
            .find_by_id(menu_id)
            .await?
            .filter(Menu::is_visible)
            .ok_or_else(|| AppError::NotFound(format!("Menu {} not found", menu_id)))?;
        if menu.restaurant_id != restaurant_id {
            return Err(AppError::BadRequest(format!(
                "Menu {} does not belong to restaurant {}",
                menu_id, restaurant_id
            )));
        }
        Ok(NewOrderItem {
            menu_id,
            quantity,
            unit_price: menu.price,
        })
    }

    pub async fn create(&self, input: CreateOrderInput, caller: &Caller) -> Result<OrderDetail> {
        input.validate()?;
        if input.order_type == OrderType::Delivery && input.delivery_address.is_none() {
            return Err(AppError::BadRequest(
                "Delivery orders require a delivery address".to_string(),
            ));
        }

        self.restaurant_repo
            .find_by_id(input.restaurant_id)
            .await?
            .filter(Restaurant::is_visible)
            .ok_or_else(|| {
                AppError::NotFound(format!("Restaurant {} not found", input.restaurant_id))
            })?;

        let mut items = Vec::with_capacity(input.items.len());
        for item in &input.items {
            items.push(
                self.price_item(input.restaurant_id, item.menu_id, item.quantity)
                    .await?,
            );
        }
        let total_price = items
            .iter()
            .try_fold(0i64, |total, item| {
                item.unit_price
                    .checked_mul(i64::from(item.quantity))
                    .and_then(|line| total.checked_add(line))
            })
            .ok_or_else(|| AppError::BadRequest("Order total is too large".to_string()))?;

        let new_order = NewOrder {
            customer_id: caller.user_id,
            restaurant_id: input.restaurant_id,
            order_type: input.order_type,
            total_price,
            delivery_address: input.delivery_address,
            request: input.request,
            items,
        };
        let order = self.repo.create(&new_order).await?;
        let items = self.repo.find_items(order.id).await?;

        metrics::counter!("delivery_orders_created_total", "order_type" => order.order_type.as_str())
            .increment(1);
        info!(
            order_id = %order.id,
            restaurant_id = %order.restaurant_id,
            total_price = order.total_price,
            "Order placed"
        );
        Ok(OrderDetail { order, items })
    }

    /// Orders visible to the caller: owners see their restaurants' orders,
    /// administrators see everything, anyone else only their own.
    pub async fn list(
        &self,
        page: PageRequest,
        restaurant_id: Option<StringUuid>,
        caller: &Caller,
    ) -> Result<Page<Order>> {
        let filter = match caller.role {
            Role::Manager | Role::Master => OrderFilter {
                customer_id: None,
                restaurant_ids: restaurant_id.map(|id| vec![id]),
            },
            Role::Owner => {
                let mut owned = self.restaurant_repo.ids_by_owner(caller.user_id).await?;
                if let Some(id) = restaurant_id {
                    owned.retain(|owned_id| *owned_id == id);
                }
                OrderFilter {
                    customer_id: None,
                    restaurant_ids: Some(owned),
                }
            }
            _ => OrderFilter {
                customer_id: Some(caller.user_id),
                restaurant_ids: restaurant_id.map(|id| vec![id]),
            },
        };
        self.repo.list(&filter, page).await
    }

    pub async fn get(&self, id: StringUuid, caller: &Caller) -> Result<OrderDetail> {
        let order = self.find_order(id).await?;
        let allowed = caller.is_admin()
            || order.customer_id == caller.user_id
            || self.is_restaurant_owner(&order, caller).await?;
        if !allowed {
            return Err(AppError::Forbidden(
                "Not allowed to view this order".to_string(),
            ));
        }

        let items = self.repo.find_items(id).await?;
        Ok(OrderDetail { order, items })
    }

    pub async fn cancel(&self, id: StringUuid, caller: &Caller) -> Result<()> {
        let order = self.find_order(id).await?;
        if order.is_cancelled() {
            return Err(AppError::BadRequest(format!(
                "Order {} is already cancelled",
                id
            )));
        }

        if !caller.is_admin() && !self.is_restaurant_owner(&order, caller).await? {
            if order.customer_id != caller.user_id {
                return Err(AppError::Forbidden(
                    "Not allowed to cancel this order".to_string(),
                ));
            }
            if !order.within_cancel_window(Utc::now()) {
                warn!(order_id = %id, "Customer cancel window elapsed");
                return Err(AppError::BadRequest(
                    "Orders can only be cancelled within 5 minutes".to_string(),
                ));
            }
        }

        self.repo.cancel(id, &caller.username).await?;
        metrics::counter!("delivery_orders_cancelled_total").increment(1);
        info!(order_id = %id, by = %caller.username, "Order cancelled");
        Ok(())
    }
}
