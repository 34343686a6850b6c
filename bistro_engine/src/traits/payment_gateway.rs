use bistro_common::MinorUnits;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum PaymentGatewayError {
    #[error("The payment gateway rejected the request. {0}")]
    Rejected(String),
    #[error("The payment gateway could not be reached. {0}")]
    Unavailable(String),
    #[error("The payment gateway returned an unexpected response. {0}")]
    InvalidResponse(String),
}

/// An in-progress charge created on the upstream payment gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    /// The secret the client uses to confirm the payment. Never logged.
    pub client_secret: String,
    pub amount: MinorUnits,
    pub currency: String,
}

/// An upstream payment gateway that can create card payment intents in a fixed currency.
#[allow(async_fn_in_trait)]
pub trait PaymentGateway {
    async fn create_payment_intent(&self, amount: MinorUnits) -> Result<PaymentIntent, PaymentGatewayError>;
}
