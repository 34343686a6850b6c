use bistro_common::Secret;
use log::*;

pub const DEFAULT_STRIPE_API_URL: &str = "https://api.stripe.com/v1";
pub const DEFAULT_CURRENCY: &str = "inr";

#[derive(Debug, Clone, Default)]
pub struct StripeConfig {
    /// The base URL of the Stripe REST API, without a trailing slash.
    pub api_url: String,
    pub secret_key: Secret<String>,
    /// Every payment intent is created in this currency.
    pub currency: String,
}

impl StripeConfig {
    pub fn new<S: Into<String>>(api_url: S, secret_key: S, currency: S) -> Self {
        Self { api_url: api_url.into(), secret_key: Secret::new(secret_key.into()), currency: currency.into() }
    }

    pub fn new_from_env_or_default() -> Self {
        let api_url = std::env::var("BISTRO_STRIPE_API_URL").unwrap_or_else(|_| {
            debug!("BISTRO_STRIPE_API_URL not set, using {DEFAULT_STRIPE_API_URL}");
            DEFAULT_STRIPE_API_URL.to_string()
        });
        let secret_key = Secret::new(std::env::var("BISTRO_STRIPE_SECRET_KEY").unwrap_or_else(|_| {
            warn!("BISTRO_STRIPE_SECRET_KEY not set. Payment intents cannot be created until it is configured.");
            String::default()
        }));
        let currency = std::env::var("BISTRO_STRIPE_CURRENCY").map(|s| s.to_ascii_lowercase()).unwrap_or_else(|_| {
            debug!("BISTRO_STRIPE_CURRENCY not set, using {DEFAULT_CURRENCY}");
            DEFAULT_CURRENCY.to_string()
        });
        Self { api_url: api_url.trim_end_matches('/').to_string(), secret_key, currency }
    }
}
