use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, types::Json, FromRow, Row, Type};
use thiserror::Error;

//--------------------------------------        Role         ---------------------------------------------------------
/// The role attached to a user record. Only `Admin` grants access to the menu management and statistics endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
pub enum Role {
    Admin,
    #[default]
    Customer,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "Admin"),
            Role::Customer => write!(f, "Customer"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid role: {0}")]
pub struct ConversionError(String);

impl FromStr for Role {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Self::Admin),
            "Customer" => Ok(Self::Customer),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------     UserRecord      ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub photo: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// A registration request. There is deliberately no role field: every new user starts out as a `Customer`, and any
/// `role` supplied by a client is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

impl NewUser {
    pub fn new<S: Into<String>>(email: S) -> Self {
        Self { email: email.into(), name: None, photo: None }
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// The outcome of an insert-if-absent registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Created(i64),
    AlreadyExists,
}

//--------------------------------------      MenuItem       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub recipe: String,
    pub image: Option<String>,
    /// The admin that created the item. Always taken from the verified access token.
    pub admin_email: String,
}

/// A new menu item as submitted by an admin. The creator's email is supplied separately by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMenuItem {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub recipe: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Partial update of a menu item. Fields that are `None` are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub recipe: Option<String>,
}

impl MenuItemUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.category.is_none() && self.price.is_none() && self.recipe.is_none()
    }
}

//--------------------------------------       Review        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub name: String,
    pub details: String,
    pub rating: f64,
}

//--------------------------------------      CartItem       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: i64,
    pub user_email: String,
    pub menu_item_id: i64,
    pub name: String,
    pub image: Option<String>,
    pub price: f64,
}

/// A line item to add to a cart. The owner is always the authenticated user, so no email is accepted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub menu_item_id: i64,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    pub price: f64,
}

//--------------------------------------       Payment       ---------------------------------------------------------
/// A completed payment. Payments are never modified once they have been written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i64,
    pub email: String,
    pub price: f64,
    pub transaction_id: String,
    pub cart_ids: Vec<i64>,
    pub menu_item_ids: Vec<i64>,
    pub status: String,
    pub date: DateTime<Utc>,
}

impl<'r> FromRow<'r, SqliteRow> for Payment {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let cart_ids: Json<Vec<i64>> = row.try_get("cart_ids")?;
        let menu_item_ids: Json<Vec<i64>> = row.try_get("menu_item_ids")?;
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            price: row.try_get("price")?,
            transaction_id: row.try_get("transaction_id")?,
            cart_ids: cart_ids.0,
            menu_item_ids: menu_item_ids.0,
            status: row.try_get("status")?,
            date: row.try_get("date")?,
        })
    }
}

fn default_payment_status() -> String {
    "pending".to_string()
}

/// The payload submitted by the client once the gateway has confirmed a charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub email: String,
    pub price: f64,
    pub transaction_id: String,
    #[serde(default)]
    pub cart_ids: Vec<i64>,
    #[serde(default)]
    pub menu_item_ids: Vec<i64>,
    #[serde(default = "default_payment_status")]
    pub status: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl NewPayment {
    pub fn new<S: Into<String>>(email: S, price: f64, transaction_id: S) -> Self {
        Self {
            email: email.into(),
            price,
            transaction_id: transaction_id.into(),
            cart_ids: vec![],
            menu_item_ids: vec![],
            status: default_payment_status(),
            date: None,
        }
    }

    pub fn with_cart_ids(mut self, cart_ids: Vec<i64>) -> Self {
        self.cart_ids = cart_ids;
        self
    }

    pub fn with_menu_item_ids(mut self, menu_item_ids: Vec<i64>) -> Self {
        self.menu_item_ids = menu_item_ids;
        self
    }

    /// The cart ids with duplicates removed, in their original order.
    pub fn unique_cart_ids(&self) -> Vec<i64> {
        let mut seen = std::collections::HashSet::with_capacity(self.cart_ids.len());
        self.cart_ids.iter().copied().filter(|id| seen.insert(*id)).collect()
    }
}

//--------------------------------------     AdminStats      ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub users: i64,
    pub menu_items: i64,
    pub orders: i64,
    pub total_revenue: f64,
}
