use serde::{Deserialize, Serialize};

/// The form body for `POST /payment_intents`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPaymentIntent {
    pub amount: i64,
    pub currency: String,
    #[serde(rename = "payment_method_types[]")]
    pub payment_method_types: String,
}

impl NewPaymentIntent {
    /// A payment intent restricted to card payments.
    pub fn card<S: Into<String>>(amount: i64, currency: S) -> Self {
        Self { amount, currency: currency.into(), payment_method_types: "card".to_string() }
    }
}

/// The fields of a Stripe `PaymentIntent` object that Bistro cares about.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentIntentResponse {
    pub id: String,
    pub client_secret: String,
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StripeErrorBody {
    pub error: StripeErrorDetail,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StripeErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}
