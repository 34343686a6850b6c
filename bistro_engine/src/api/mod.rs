//! # Bistro engine public API
//!
//! The `api` module exposes the programmatic API for the Bistro engine. Each API wraps a backend that implements the
//! specific backend traits it needs, so that callers can pick and choose the functionality they want.
//!
//! * [`auth_api`] answers role questions for the role authorizer.
//! * [`user_api`] is the user directory: registration and lookups.
//! * [`menu_api`] manages menu items and serves reviews.
//! * [`cart_api`] manages per-user carts.
//! * [`payment_api`] settles payments against carts and reports payment history and admin statistics.
//! * [`payment_intent_api`] requests payment intents from the upstream payment gateway.
//!
//! # API usage
//!
//! ```rust,ignore
//! use bistro_engine::{SqliteDatabase, UserApi};
//! let db = SqliteDatabase::new_with_url("sqlite://data/bistro.db", 5).await?;
//! // SqliteDatabase implements UserManagement
//! let api = UserApi::new(db);
//! let user = api.user_by_email("alice@example.com").await?;
//! ```

pub mod auth_api;
pub mod cart_api;
pub mod menu_api;
pub mod payment_api;
pub mod payment_intent_api;
pub mod user_api;
