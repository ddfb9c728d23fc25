//! Restaurant catalog: ownership-checked mutations and filtered listings

use crate::domain::{
    normalize_search, Caller, Page, PageRequest, Restaurant, RestaurantFilter, RestaurantInput,
    RestaurantResponse, StringUuid,
};
use crate::error::{AppError, Result};
use crate::policy;
use crate::repository::{CategoryRepository, RestaurantRepository, UserRepository};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub struct RestaurantService<R: RestaurantRepository, C: CategoryRepository, U: UserRepository> {
    repo: Arc<R>,
    category_repo: Arc<C>,
    user_repo: Arc<U>,
}

impl<R: RestaurantRepository, C: CategoryRepository, U: UserRepository> RestaurantService<R, C, U> {
    pub fn new(repo: Arc<R>, category_repo: Arc<C>, user_repo: Arc<U>) -> Self {
        Self {
            repo,
            category_repo,
            user_repo,
        }
    }

    /// Restaurant that exists and is neither hidden nor deleted
    async fn find_visible(&self, id: StringUuid) -> Result<Restaurant> {
        self.repo
            .find_by_id(id)
            .await?
            .filter(Restaurant::is_visible)
            .ok_or_else(|| AppError::NotFound(format!("Restaurant {} not found", id)))
    }

    async fn validate_references(&self, input: &RestaurantInput) -> Result<()> {
        if self.category_repo.find_by_id(input.category_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Category {} not found",
                input.category_id
            )));
        }
        if self.user_repo.find_by_id(input.owner_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Owner {} not found",
                input.owner_id
            )));
        }
        Ok(())
    }

    pub async fn create_restaurant(
        &self,
        input: RestaurantInput,
        caller: &Caller,
    ) -> Result<RestaurantResponse> {
        policy::require_admin(caller)?;
        input.validate()?;
        self.validate_references(&input).await?;

        let restaurant = self.repo.create(&input).await?;
        info!(restaurant_id = %restaurant.id, by = %caller.username, "Restaurant created");
        Ok(RestaurantResponse::new(restaurant, None))
    }

    pub async fn update_restaurant(
        &self,
        input: RestaurantInput,
        id: StringUuid,
        caller: &Caller,
    ) -> Result<RestaurantResponse> {
        let restaurant = self.find_visible(id).await?;
        policy::require_owner_or_admin(caller, restaurant.owner_id)?;
        input.validate()?;
        self.validate_references(&input).await?;

        let updated = self.repo.update(id, &input).await?;
        let average_rating = self.repo.average_rating(id).await?;
        info!(restaurant_id = %id, by = %caller.username, "Restaurant updated");
        Ok(RestaurantResponse::new(updated, average_rating))
    }

    pub async fn delete_restaurant(&self, id: StringUuid, caller: &Caller) -> Result<()> {
        let restaurant = self.find_visible(id).await?;
        policy::require_owner_or_admin(caller, restaurant.owner_id)?;

        self.repo.soft_delete(id, &caller.username).await?;
        info!(restaurant_id = %id, by = %caller.username, "Restaurant deleted");
        Ok(())
    }

    /// Hide or reveal a restaurant. Hidden restaurants stay reachable here so
    /// their owner can bring them back.
    pub async fn set_visibility(&self, id: StringUuid, hidden: bool, caller: &Caller) -> Result<()> {
        let restaurant = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Restaurant {} not found", id)))?;
        policy::require_owner_or_admin(caller, restaurant.owner_id)?;

        self.repo.set_hidden(id, hidden).await?;
        info!(restaurant_id = %id, hidden, by = %caller.username, "Restaurant visibility changed");
        Ok(())
    }

    pub async fn get_restaurant(&self, id: StringUuid) -> Result<RestaurantResponse> {
        let restaurant = self.find_visible(id).await?;
        let average_rating = self.repo.average_rating(id).await?;
        Ok(RestaurantResponse::new(restaurant, average_rating))
    }

    pub async fn get_restaurants(
        &self,
        page: PageRequest,
        search: Option<&str>,
    ) -> Result<Page<RestaurantResponse>> {
        let filter = RestaurantFilter {
            category_id: None,
            search: normalize_search(search),
        };
        Ok(self.repo.list(&filter, page).await?.map(Into::into))
    }

    pub async fn get_restaurants_by_category(
        &self,
        page: PageRequest,
        category_id: StringUuid,
        search: Option<&str>,
    ) -> Result<Page<RestaurantResponse>> {
        let filter = RestaurantFilter {
            category_id: Some(category_id),
            search: normalize_search(search),
        };
        Ok(self.repo.list(&filter, page).await?.map(Into::into))
    }
}
