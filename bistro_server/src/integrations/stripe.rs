//! Connects the Stripe REST client to the engine's [`PaymentGateway`] contract.
use bistro_common::MinorUnits;
use bistro_engine::traits::{PaymentGateway, PaymentGatewayError, PaymentIntent};
use log::*;
use stripe_tools::{StripeApi, StripeApiError};

#[derive(Clone, Debug)]
pub struct StripeGateway {
    api: StripeApi,
}

impl StripeGateway {
    pub fn new(api: StripeApi) -> Self {
        Self { api }
    }
}

/// Stripe reports declined or malformed requests with 4xx statuses. Anything else means it could not be reached or
/// misbehaved.
fn gateway_error(e: StripeApiError) -> PaymentGatewayError {
    match e {
        StripeApiError::QueryError { status, message } if status < 500 => {
            PaymentGatewayError::Rejected(format!("Error {status}. {message}"))
        },
        StripeApiError::QueryError { status, message } => {
            PaymentGatewayError::Unavailable(format!("Error {status}. {message}"))
        },
        StripeApiError::RestResponseError(s) | StripeApiError::Initialization(s) => PaymentGatewayError::Unavailable(s),
        StripeApiError::JsonError(s) => PaymentGatewayError::InvalidResponse(s),
        StripeApiError::InvalidAmount(a) => PaymentGatewayError::Rejected(format!("Invalid amount: {a}")),
    }
}

impl PaymentGateway for StripeGateway {
    async fn create_payment_intent(&self, amount: MinorUnits) -> Result<PaymentIntent, PaymentGatewayError> {
        let intent = self.api.create_payment_intent(amount).await.map_err(|e| {
            warn!("💳️ Stripe could not create a payment intent for {amount}. {e}");
            gateway_error(e)
        })?;
        Ok(PaymentIntent {
            id: intent.id,
            client_secret: intent.client_secret,
            amount: MinorUnits::from(intent.amount),
            currency: intent.currency,
        })
    }
}
