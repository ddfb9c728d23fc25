//! Category management

use crate::domain::{Caller, Category, CategoryInput, StringUuid};
use crate::error::{AppError, Result};
use crate::policy;
use crate::repository::CategoryRepository;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub struct CategoryService<C: CategoryRepository> {
    repo: Arc<C>,
}

impl<C: CategoryRepository> CategoryService<C> {
    pub fn new(repo: Arc<C>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Category>> {
        self.repo.list().await
    }

    pub async fn create(&self, input: CategoryInput, caller: &Caller) -> Result<Category> {
        policy::require_admin(caller)?;
        input.validate()?;
        let name = input.name.trim();

        if self.repo.exists_by_name(name, None).await? {
            return Err(AppError::Conflict(format!(
                "Category '{}' already exists",
                name
            )));
        }

        let category = self.repo.create(name).await?;
        info!(category = %category.name, by = %caller.username, "Category created");
        Ok(category)
    }

    pub async fn update(
        &self,
        id: StringUuid,
        input: CategoryInput,
        caller: &Caller,
    ) -> Result<Category> {
        policy::require_admin(caller)?;
        input.validate()?;
        let name = input.name.trim();

        if self.repo.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }
        if self.repo.exists_by_name(name, Some(id)).await? {
            return Err(AppError::Conflict(format!(
                "Category '{}' already exists",
                name
            )));
        }

        self.repo.update(id, name).await
    }

    pub async fn delete(&self, id: StringUuid, caller: &Caller) -> Result<()> {
        policy::require_admin(caller)?;
        self.repo.soft_delete(id, &caller.username).await?;
        info!(category_id = %id, by = %caller.username, "Category deleted");
        Ok(())
    }
}
