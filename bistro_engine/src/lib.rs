//! Bistro Engine
//!
//! The Bistro engine holds the core logic of the Bistro restaurant ordering backend. It knows nothing about HTTP.
//!
//! The library is divided into three main sections:
//! 1. Backend contracts ([`mod@traits`]) and the data types that flow through them ([`mod@db_types`]). Storage
//!    backends implement these traits in order to act as a backend for the Bistro server.
//! 2. The SQLite backend ([`SqliteDatabase`]). You should never need to access the database directly. Instead, use the
//!    public API provided by the engine.
//! 3. The engine public API ([`mod@api`]). This provides the user directory, menu, cart and payment settlement
//!    functionality, as well as the role lookups used to authorize requests.
pub mod api;
pub mod db_types;
pub mod helpers;
pub mod traits;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use api::{
    auth_api::AuthApi,
    cart_api::CartApi,
    menu_api::MenuApi,
    payment_api::PaymentApi,
    payment_intent_api::{PaymentIntentApi, PaymentIntentError},
    user_api::UserApi,
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
