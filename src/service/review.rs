//! Reviews of completed orders

use crate::domain::{
    Caller, CreateReviewInput, NewReview, Page, PageRequest, Review, ReviewFilter, StringUuid,
};
use crate::error::{AppError, Result};
use crate::policy;
use crate::repository::{OrderRepository, ReviewRepository};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub struct ReviewService<V: ReviewRepository, O: OrderRepository> {
    repo: Arc<V>,
    order_repo: Arc<O>,
}

impl<V: ReviewRepository, O: OrderRepository> ReviewService<V, O> {
    pub fn new(repo: Arc<V>, order_repo: Arc<O>) -> Self {
        Self { repo, order_repo }
    }

    pub async fn create(&self, input: CreateReviewInput, caller: &Caller) -> Result<Review> {
        input.validate()?;

        let order = self
            .order_repo
            .find_by_id(input.order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", input.order_id)))?;
        if order.customer_id != caller.user_id {
            return Err(AppError::Forbidden(
                "Only the ordering customer may review this order".to_string(),
            ));
        }
        if order.is_cancelled() {
            return Err(AppError::BadRequest(format!(
                "Order {} is cancelled",
                order.id
            )));
        }
        if self.repo.exists_for_order(order.id).await? {
            return Err(AppError::Conflict(format!(
                "Order {} has already been reviewed",
                order.id
            )));
        }

        let review = self
            .repo
            .create(&NewReview {
                order_id: order.id,
                customer_id: caller.user_id,
                restaurant_id: order.restaurant_id,
                rating: input.rating,
                content: input.content,
            })
            .await?;
        info!(review_id = %review.id, restaurant_id = %review.restaurant_id, rating = review.rating, "Review created");
        Ok(review)
    }

    pub async fn list(
        &self,
        page: PageRequest,
        restaurant_id: Option<StringUuid>,
    ) -> Result<Page<Review>> {
        self.repo.list(&ReviewFilter { restaurant_id }, page).await
    }

    pub async fn get(&self, id: StringUuid) -> Result<Review> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Review {} not found", id)))
    }

    pub async fn delete(&self, id: StringUuid, caller: &Caller) -> Result<()> {
        let review = self.get(id).await?;
        policy::require_owner_or_admin(caller, review.customer_id)?;

        self.repo.soft_delete(id, &caller.username).await?;
        info!(review_id = %id, by = %caller.username, "Review deleted");
        Ok(())
    }
}
