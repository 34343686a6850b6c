use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{AdminStats, NewPayment, Payment},
    helpers::{validate_email, validate_price},
    traits::{PaymentApiError, PaymentManagement, Settlement, SettlementError},
};

/// `PaymentApi` records payments that the gateway has confirmed, clears the carts they cover, and reports on payment
/// history.
pub struct PaymentApi<B> {
    db: B,
}

impl<B: Debug> Debug for PaymentApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentApi ({:?})", self.db)
    }
}

impl<B> PaymentApi<B>
where B: PaymentManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Settles a payment.
    ///
    /// The payment record is inserted and every cart item in `cart_ids` owned by the payer is deleted, in one
    /// transaction. If fewer cart items were deleted than requested, the settlement still succeeds, but the
    /// shortfall is logged and reported in the returned [`Settlement`].
    pub async fn settle(&self, payment: NewPayment) -> Result<Settlement, SettlementError> {
        validate_email(&payment.email).map_err(SettlementError::InvalidPayment)?;
        validate_price(payment.price).map_err(SettlementError::InvalidPayment)?;
        if payment.transaction_id.trim().is_empty() {
            return Err(SettlementError::InvalidPayment("A transaction id is required".into()));
        }
        let email = payment.email.clone();
        let txid = payment.transaction_id.clone();
        let settlement = self.db.settle_payment(payment).await?;
        let deletions = settlement.delete_many_result;
        info!(
            "💰️ Payment {txid} from {email} recorded as #{}. {} of {} cart items cleared.",
            settlement.payment_result.inserted_id, deletions.deleted_count, deletions.requested_count
        );
        if !deletions.is_complete() {
            warn!(
                "💰️ Payment {txid} from {email} listed {} cart items that were already gone or belong to someone else.",
                deletions.shortfall()
            );
        }
        Ok(settlement)
    }

    pub async fn payments_for_email(&self, email: &str) -> Result<Vec<Payment>, PaymentApiError> {
        self.db.fetch_payments_for_email(email).await
    }

    pub async fn admin_stats(&self) -> Result<AdminStats, PaymentApiError> {
        let stats = self.db.fetch_admin_stats().await?;
        trace!("💰️ Admin stats: {stats:?}");
        Ok(stats)
    }
}
