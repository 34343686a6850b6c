//! A small client for the parts of the Stripe API that Bistro uses: creating card payment intents.
mod api;
mod config;
mod error;

mod data_objects;

pub use api::StripeApi;
pub use config::StripeConfig;
pub use data_objects::{NewPaymentIntent, PaymentIntentResponse, StripeErrorBody, StripeErrorDetail};
pub use error::StripeApiError;
