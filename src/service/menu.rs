//! Menu management

use crate::domain::{
    normalize_search, Caller, Menu, MenuFilter, MenuInput, Page, PageRequest, Restaurant,
    StringUuid,
};
use crate::error::{AppError, Result};
use crate::policy;
use crate::repository::{MenuRepository, RestaurantRepository};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub struct MenuService<M: MenuRepository, R: RestaurantRepository> {
    repo: Arc<M>,
    restaurant_repo: Arc<R>,
}

impl<M: MenuRepository, R: RestaurantRepository> MenuService<M, R> {
    pub fn new(repo: Arc<M>, restaurant_repo: Arc<R>) -> Self {
        Self {
            repo,
            restaurant_repo,
        }
    }

    async fn visible_restaurant(&self, id: StringUuid) -> Result<Restaurant> {
        self.restaurant_repo
            .find_by_id(id)
            .await?
            .filter(Restaurant::is_visible)
            .ok_or_else(|| AppError::NotFound(format!("Restaurant {} not found", id)))
    }

    /// Check that the caller may manage menus of the given restaurant
    async fn authorize(&self, restaurant_id: StringUuid, caller: &Caller) -> Result<()> {
        let restaurant = self.visible_restaurant(restaurant_id).await?;
        policy::require_owner_or_admin(caller, restaurant.owner_id)
    }

    async fn find_menu(&self, id: StringUuid) -> Result<Menu> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Menu {} not found", id)))
    }

    pub async fn list_by_restaurant(
        &self,
        restaurant_id: StringUuid,
        page: PageRequest,
    ) -> Result<Page<Menu>> {
        self.visible_restaurant(restaurant_id).await?;
        let filter = MenuFilter {
            restaurant_id: Some(restaurant_id),
            search: None,
        };
        self.repo.list(&filter, page).await
    }

    pub async fn search(&self, page: PageRequest, search: Option<&str>) -> Result<Page<Menu>> {
        let filter = MenuFilter {
            restaurant_id: None,
            search: normalize_search(search),
        };
        self.repo.list(&filter, page).await
    }

    pub async fn create(&self, input: MenuInput, caller: &Caller) -> Result<Menu> {
        input.validate()?;
        self.authorize(input.restaurant_id, caller).await?;

        let menu = self.repo.create(&input).await?;
        info!(menu_id = %menu.id, restaurant_id = %menu.restaurant_id, by = %caller.username, "Menu created");
        Ok(menu)
    }

    pub async fn update(&self, id: StringUuid, input: MenuInput, caller: &Caller) -> Result<Menu> {
        input.validate()?;
        let menu = self.find_menu(id).await?;
        self.authorize(menu.restaurant_id, caller).await?;
        // Moving a menu to another restaurant needs rights on that one too
        if input.restaurant_id != menu.restaurant_id {
            self.authorize(input.restaurant_id, caller).await?;
        }

        self.repo.update(id, &input).await
    }

    pub async fn delete(&self, id: StringUuid, caller: &Caller) -> Result<()> {
        let menu = self.find_menu(id).await?;
        self.authorize(menu.restaurant_id, caller).await?;

        self.repo.soft_delete(id, &caller.username).await?;
        info!(menu_id = %id, by = %caller.username, "Menu deleted");
        Ok(())
    }
}
