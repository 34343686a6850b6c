use thiserror::Error;

use crate::{
    db_types::{AdminStats, NewPayment, Payment},
    traits::Settlement,
};

#[derive(Debug, Clone, Error)]
pub enum PaymentApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for PaymentApiError {
    fn from(e: sqlx::Error) -> Self {
        PaymentApiError::DatabaseError(e.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum SettlementError {
    #[error("Invalid payment: {0}")]
    InvalidPayment(String),
    #[error("Settlement was rolled back. {0}")]
    RolledBack(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for SettlementError {
    fn from(e: sqlx::Error) -> Self {
        SettlementError::DatabaseError(e.to_string())
    }
}

/// Recording payments, clearing the carts they pay for, and aggregate reporting over the whole store.
#[allow(async_fn_in_trait)]
pub trait PaymentManagement {
    /// In a single atomic transaction:
    /// * stores the payment record,
    /// * deletes every cart item listed in `payment.cart_ids` that belongs to `payment.email`.
    ///
    /// If either step fails, neither takes effect and [`SettlementError::RolledBack`] is returned. The number of cart
    /// rows deleted is reported alongside the number requested; it can be smaller when some of the items were already
    /// gone.
    async fn settle_payment(&self, payment: NewPayment) -> Result<Settlement, SettlementError>;

    async fn fetch_payments_for_email(&self, email: &str) -> Result<Vec<Payment>, PaymentApiError>;

    /// Counts users, menu items and payments and sums the revenue over all payments.
    async fn fetch_admin_stats(&self) -> Result<AdminStats, PaymentApiError>;
}
