use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{CartItem, NewCartItem},
    helpers::validate_price,
    traits::{CartApiError, CartManagement, DeleteResult},
};

pub struct CartApi<B> {
    db: B,
}

impl<B: Debug> Debug for CartApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CartApi ({:?})", self.db)
    }
}

impl<B> CartApi<B>
where B: CartManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn cart_for_user(&self, email: &str) -> Result<Vec<CartItem>, CartApiError> {
        self.db.fetch_cart_for_user(email).await
    }

    pub async fn add_to_cart(&self, item: NewCartItem, owner: &str) -> Result<CartItem, CartApiError> {
        validate_price(item.price).map_err(CartApiError::InvalidCartItem)?;
        let item = self.db.insert_cart_item(item, owner).await?;
        debug!("🛒️ Added menu item #{} to {owner}'s cart as #{}", item.menu_item_id, item.id);
        Ok(item)
    }

    /// Removes an item from `owner`'s cart. Items belonging to other users are never removed; the result then reports
    /// zero deletions.
    pub async fn remove_from_cart(&self, id: i64, owner: &str) -> Result<DeleteResult, CartApiError> {
        let result = self.db.delete_cart_item(id, owner).await?;
        if result.deleted_count == 0 {
            debug!("🛒️ Cart item #{id} was not removed. It does not exist in {owner}'s cart.");
        }
        Ok(result)
    }
}
