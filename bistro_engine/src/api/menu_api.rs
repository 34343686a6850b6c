use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{MenuItem, MenuItemUpdate, NewMenuItem, Review},
    helpers::validate_price,
    traits::{DeleteResult, MenuApiError, MenuManagement, UpdateResult},
};

/// `MenuApi` manages the restaurant menu. Write access is expected to have been authorized by the caller.
pub struct MenuApi<B> {
    db: B,
}

impl<B: Debug> Debug for MenuApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MenuApi ({:?})", self.db)
    }
}

impl<B> MenuApi<B>
where B: MenuManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn menu(&self) -> Result<Vec<MenuItem>, MenuApiError> {
        self.db.fetch_menu().await
    }

    pub async fn menu_item(&self, id: i64) -> Result<Option<MenuItem>, MenuApiError> {
        self.db.fetch_menu_item(id).await
    }

    pub async fn menu_items_for_admin(&self, admin_email: &str) -> Result<Vec<MenuItem>, MenuApiError> {
        self.db.fetch_menu_items_for_admin(admin_email).await
    }

    /// Adds a new item to the menu, recording `admin_email` as its creator.
    pub async fn add_menu_item(&self, item: NewMenuItem, admin_email: &str) -> Result<MenuItem, MenuApiError> {
        if item.name.trim().is_empty() {
            return Err(MenuApiError::InvalidMenuItem("Menu items must have a name".into()));
        }
        validate_price(item.price).map_err(MenuApiError::InvalidMenuItem)?;
        let item = self.db.insert_menu_item(item, admin_email).await?;
        info!("🍽️ {admin_email} added '{}' (#{}) to the menu", item.name, item.id);
        Ok(item)
    }

    pub async fn update_menu_item(&self, id: i64, update: MenuItemUpdate) -> Result<UpdateResult, MenuApiError> {
        if update.is_empty() {
            return Err(MenuApiError::InvalidMenuItem("The update does not change any fields".into()));
        }
        if let Some(price) = update.price {
            validate_price(price).map_err(MenuApiError::InvalidMenuItem)?;
        }
        let result = self.db.update_menu_item(id, update).await?;
        debug!("🍽️ Menu item #{id} updated. {result:?}");
        Ok(result)
    }

    pub async fn delete_menu_item(&self, id: i64) -> Result<DeleteResult, MenuApiError> {
        let result = self.db.delete_menu_item(id).await?;
        debug!("🍽️ Menu item #{id} deleted. {result:?}");
        Ok(result)
    }

    pub async fn reviews(&self) -> Result<Vec<Review>, MenuApiError> {
        self.db.fetch_reviews().await
    }
}
