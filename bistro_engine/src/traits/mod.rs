//! #  Backend contracts
//!
//! This module defines the behaviour that storage backends (and the payment gateway) must expose to be used by the
//! Bistro engine APIs.
//!
//! * [`AuthManagement`] is the narrow role lookup used by the role authorizer.
//! * [`UserManagement`] is the user directory: lookup by email and idempotent registration.
//! * [`MenuManagement`] stores menu items and serves reviews.
//! * [`CartManagement`] stores per-user cart line items.
//! * [`PaymentManagement`] records payments, settles carts and reports aggregate statistics.
//! * [`PaymentGateway`] creates payment intents on the upstream payment provider.
mod auth_management;
mod cart_management;
mod menu_management;
mod payment_gateway;
mod payment_management;
mod user_management;

mod data_objects;

pub use auth_management::{AuthApiError, AuthManagement};
pub use cart_management::{CartApiError, CartManagement};
pub use data_objects::{DeleteManyResult, DeleteResult, InsertResult, Settlement, UpdateResult};
pub use menu_management::{MenuApiError, MenuManagement};
pub use payment_gateway::{PaymentGateway, PaymentGatewayError, PaymentIntent};
pub use payment_management::{PaymentApiError, PaymentManagement, SettlementError};
pub use user_management::{UserApiError, UserManagement};
