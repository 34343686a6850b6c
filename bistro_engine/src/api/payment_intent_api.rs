use std::fmt::Debug;

use bistro_common::{AmountError, MinorUnits};
use log::*;
use thiserror::Error;

use crate::traits::{PaymentGateway, PaymentGatewayError};

#[derive(Debug, Clone, Error)]
pub enum PaymentIntentError {
    #[error("Invalid payment amount. {0}")]
    InvalidAmount(#[from] AmountError),
    #[error("{0}")]
    GatewayError(#[from] PaymentGatewayError),
}

/// `PaymentIntentApi` is the pre-payment step: it asks the payment gateway for an intent and hands back the client
/// secret. No local state is touched.
pub struct PaymentIntentApi<G> {
    gateway: G,
}

impl<G: Debug> Debug for PaymentIntentApi<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentIntentApi ({:?})", self.gateway)
    }
}

impl<G> PaymentIntentApi<G>
where G: PaymentGateway
{
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Creates a payment intent for `price`, given in major currency units. The amount is converted to minor units
    /// (truncating) before the gateway is contacted, so invalid prices never reach the gateway.
    pub async fn create_intent(&self, price: f64) -> Result<String, PaymentIntentError> {
        let amount = MinorUnits::try_from_major(price)?;
        debug!("💳️ Requesting a payment intent for {amount}");
        let intent = self.gateway.create_payment_intent(amount).await?;
        info!("💳️ Payment intent {} created for {} {}", intent.id, intent.amount, intent.currency);
        Ok(intent.client_secret)
    }
}
