use thiserror::Error;

use crate::{
    db_types::{MenuItem, MenuItemUpdate, NewMenuItem, Review},
    traits::{DeleteResult, UpdateResult},
};

#[derive(Debug, Clone, Error)]
pub enum MenuApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Invalid menu item: {0}")]
    InvalidMenuItem(String),
}

impl From<sqlx::Error> for MenuApiError {
    fn from(e: sqlx::Error) -> Self {
        MenuApiError::DatabaseError(e.to_string())
    }
}

/// Storage of the restaurant menu and its reviews.
#[allow(async_fn_in_trait)]
pub trait MenuManagement {
    async fn fetch_menu(&self) -> Result<Vec<MenuItem>, MenuApiError>;

    async fn fetch_menu_item(&self, id: i64) -> Result<Option<MenuItem>, MenuApiError>;

    /// Fetches the menu items created by the given admin.
    async fn fetch_menu_items_for_admin(&self, admin_email: &str) -> Result<Vec<MenuItem>, MenuApiError>;

    /// Stores a new menu item. `admin_email` is recorded as the creator of the item.
    async fn insert_menu_item(&self, item: NewMenuItem, admin_email: &str) -> Result<MenuItem, MenuApiError>;

    async fn update_menu_item(&self, id: i64, update: MenuItemUpdate) -> Result<UpdateResult, MenuApiError>;

    async fn delete_menu_item(&self, id: i64) -> Result<DeleteResult, MenuApiError>;

    async fn fetch_reviews(&self) -> Result<Vec<Review>, MenuApiError>;
}
