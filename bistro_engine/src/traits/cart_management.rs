use thiserror::Error;

use crate::{
    db_types::{CartItem, NewCartItem},
    traits::DeleteResult,
};

#[derive(Debug, Clone, Error)]
pub enum CartApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Invalid cart item: {0}")]
    InvalidCartItem(String),
}

impl From<sqlx::Error> for CartApiError {
    fn from(e: sqlx::Error) -> Self {
        CartApiError::DatabaseError(e.to_string())
    }
}

/// Per-user cart line items. Every method that touches existing items takes the owner's email, and only ever affects
/// items belonging to that owner.
#[allow(async_fn_in_trait)]
pub trait CartManagement {
    async fn fetch_cart_for_user(&self, email: &str) -> Result<Vec<CartItem>, CartApiError>;

    async fn insert_cart_item(&self, item: NewCartItem, owner: &str) -> Result<CartItem, CartApiError>;

    /// Deletes the cart item with the given id if it belongs to `owner`.
    async fn delete_cart_item(&self, id: i64, owner: &str) -> Result<DeleteResult, CartApiError>;
}
