//! `SqliteDatabase` is a concrete implementation of a Bistro engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the storage traits defined in the [`traits`]
//! module.
use std::fmt::Debug;

use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};

use super::db::{carts, menu, new_pool, payments, users};
use crate::{
    db_types::{
        AdminStats,
        CartItem,
        MenuItem,
        MenuItemUpdate,
        NewCartItem,
        NewMenuItem,
        NewPayment,
        NewUser,
        Payment,
        Registration,
        Review,
        Role,
        UserRecord,
    },
    traits::{
        AuthApiError,
        AuthManagement,
        CartApiError,
        CartManagement,
        DeleteManyResult,
        DeleteResult,
        InsertResult,
        MenuApiError,
        MenuManagement,
        PaymentApiError,
        PaymentManagement,
        Settlement,
        SettlementError,
        UpdateResult,
        UserApiError,
        UserManagement,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SqliteDatabase ({})", self.url)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    /// Creates the database file if it does not exist yet. Existing databases are left alone.
    pub async fn create_if_missing(url: &str) -> Result<(), sqlx::Error> {
        if !Sqlite::database_exists(url).await? {
            info!("🗃️ Database {url} does not exist. Creating it now.");
            Sqlite::create_database(url).await?;
        }
        Ok(())
    }

    /// Brings the schema up to date. Migrations that have already been applied are skipped.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        debug!("🗃️ Database migrations are up to date");
        Ok(())
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl AuthManagement for SqliteDatabase {
    async fn fetch_role_for_email(&self, email: &str) -> Result<Option<Role>, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        let role = users::fetch_role_for_email(email, &mut conn).await?;
        Ok(role)
    }
}

impl UserManagement for SqliteDatabase {
    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserApiError> {
        let mut conn = self.pool.acquire().await?;
        users::fetch_user_by_email(email, &mut conn).await
    }

    async fn insert_user_if_absent(&self, user: NewUser) -> Result<Registration, UserApiError> {
        let mut conn = self.pool.acquire().await?;
        users::insert_user_if_absent(user, &mut conn).await
    }

    async fn fetch_users_except(&self, email: &str) -> Result<Vec<UserRecord>, UserApiError> {
        let mut conn = self.pool.acquire().await?;
        users::fetch_users_except(email, &mut conn).await
    }

    async fn assign_role(&self, email: &str, role: Role) -> Result<bool, UserApiError> {
        let mut conn = self.pool.acquire().await?;
        users::assign_role(email, role, &mut conn).await
    }
}

impl MenuManagement for SqliteDatabase {
    async fn fetch_menu(&self) -> Result<Vec<MenuItem>, MenuApiError> {
        let mut conn = self.pool.acquire().await?;
        menu::fetch_menu(&mut conn).await
    }

    async fn fetch_menu_item(&self, id: i64) -> Result<Option<MenuItem>, MenuApiError> {
        let mut conn = self.pool.acquire().await?;
        menu::fetch_menu_item(id, &mut conn).await
    }

    async fn fetch_menu_items_for_admin(&self, admin_email: &str) -> Result<Vec<MenuItem>, MenuApiError> {
        let mut conn = self.pool.acquire().await?;
        menu::fetch_menu_items_for_admin(admin_email, &mut conn).await
    }

    async fn insert_menu_item(&self, item: NewMenuItem, admin_email: &str) -> Result<MenuItem, MenuApiError> {
        let mut conn = self.pool.acquire().await?;
        menu::insert_menu_item(item, admin_email, &mut conn).await
    }

    async fn update_menu_item(&self, id: i64, update: MenuItemUpdate) -> Result<UpdateResult, MenuApiError> {
        let mut conn = self.pool.acquire().await?;
        menu::update_menu_item(id, update, &mut conn).await
    }

    async fn delete_menu_item(&self, id: i64) -> Result<DeleteResult, MenuApiError> {
        let mut conn = self.pool.acquire().await?;
        menu::delete_menu_item(id, &mut conn).await
    }

    async fn fetch_reviews(&self) -> Result<Vec<Review>, MenuApiError> {
        let mut conn = self.pool.acquire().await?;
        menu::fetch_reviews(&mut conn).await
    }
}

impl CartManagement for SqliteDatabase {
    async fn fetch_cart_for_user(&self, email: &str) -> Result<Vec<CartItem>, CartApiError> {
        let mut conn = self.pool.acquire().await?;
        carts::fetch_cart_for_user(email, &mut conn).await
    }

    async fn insert_cart_item(&self, item: NewCartItem, owner: &str) -> Result<CartItem, CartApiError> {
        let mut conn = self.pool.acquire().await?;
        carts::insert_cart_item(item, owner, &mut conn).await
    }

    async fn delete_cart_item(&self, id: i64, owner: &str) -> Result<DeleteResult, CartApiError> {
        let mut conn = self.pool.acquire().await?;
        carts::delete_cart_item(id, owner, &mut conn).await
    }
}

impl PaymentManagement for SqliteDatabase {
    /// Takes a new payment, and in a single atomic transaction,
    /// * stores the payment record,
    /// * deletes the listed cart items that belong to the payer.
    ///
    /// If anything goes wrong the transaction is dropped, which rolls back both steps.
    async fn settle_payment(&self, payment: NewPayment) -> Result<Settlement, SettlementError> {
        let cart_ids = payment.unique_cart_ids();
        let mut tx = self.pool.begin().await?;
        let payment_id = payments::insert_payment(&payment, &mut tx)
            .await
            .map_err(|e| SettlementError::RolledBack(format!("Could not store the payment. {e}")))?;
        let deleted = carts::delete_cart_items_for_owner(&cart_ids, &payment.email, &mut tx)
            .await
            .map_err(|e| SettlementError::RolledBack(format!("Could not clear the cart. {e}")))?;
        tx.commit().await.map_err(|e| SettlementError::RolledBack(format!("Could not commit the settlement. {e}")))?;
        debug!("🗃️ Payment #{payment_id} settled. {deleted} of {} cart items removed", cart_ids.len());
        Ok(Settlement {
            payment_result: InsertResult::new(payment_id),
            delete_many_result: DeleteManyResult::new(deleted, cart_ids.len() as u64),
        })
    }

    async fn fetch_payments_for_email(&self, email: &str) -> Result<Vec<Payment>, PaymentApiError> {
        let mut conn = self.pool.acquire().await?;
        let payments = payments::fetch_payments_for_email(email, &mut conn).await?;
        Ok(payments)
    }

    async fn fetch_admin_stats(&self) -> Result<AdminStats, PaymentApiError> {
        let mut conn = self.pool.acquire().await?;
        let users = users::count_users(&mut conn).await?;
        let menu_items = menu::count_menu_items(&mut conn).await?;
        let (orders, total_revenue) = payments::payment_totals(&mut conn).await?;
        Ok(AdminStats { users, menu_items, orders, total_revenue })
    }
}
