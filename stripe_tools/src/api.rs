use std::sync::Arc;

use bistro_common::MinorUnits;
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::StripeConfig,
    data_objects::{NewPaymentIntent, PaymentIntentResponse, StripeErrorBody},
    StripeApiError,
};

#[derive(Clone)]
pub struct StripeApi {
    config: StripeConfig,
    client: Arc<Client>,
}

impl std::fmt::Debug for StripeApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StripeApi ({}, {})", self.config.api_url, self.config.currency)
    }
}

impl StripeApi {
    pub fn new(config: StripeConfig) -> Result<Self, StripeApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        let auth = format!("Bearer {}", config.secret_key.reveal());
        let mut val = HeaderValue::from_str(&auth).map_err(|e| StripeApiError::Initialization(e.to_string()))?;
        val.set_sensitive(true);
        headers.insert(AUTHORIZATION, val);
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| StripeApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url)
    }

    /// Sends a form-encoded request to the Stripe API. Non-success responses are returned as
    /// [`StripeApiError::QueryError`], using the message in Stripe's error object when there is one.
    pub async fn form_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, StripeApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {url}");
        let mut req = self.client.request(method, url);
        if let Some(body) = body {
            req = req.form(&body);
        }
        let response = req.send().await.map_err(|e| StripeApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| StripeApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let text = response.text().await.map_err(|e| StripeApiError::RestResponseError(e.to_string()))?;
            let message = serde_json::from_str::<StripeErrorBody>(&text)
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or(text);
            Err(StripeApiError::QueryError { status, message })
        }
    }

    /// Creates a card payment intent for `amount` minor units in the configured currency.
    pub async fn create_payment_intent(&self, amount: MinorUnits) -> Result<PaymentIntentResponse, StripeApiError> {
        if amount.value() <= 0 {
            return Err(StripeApiError::InvalidAmount(amount.value()));
        }
        let body = NewPaymentIntent::card(amount.value(), self.config.currency.as_str());
        debug!("Creating payment intent for {amount} {}", self.config.currency);
        let intent =
            self.form_query::<PaymentIntentResponse, _>(Method::POST, "/payment_intents", Some(body)).await?;
        info!("Created payment intent {}", intent.id);
        Ok(intent)
    }
}
