//! Access token issuing and verification.
//!
//! Access tokens are HS256-signed JWTs carrying the caller's email. They are issued by [`TokenIssuer`] from the
//! `/token` endpoint and checked by [`TokenVerifier`] in the guard middleware, which then attaches the decoded
//! [`JwtClaims`] to the request. Handlers receive the claims through the [`FromRequest`] extractor.
use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

/// Clock skew tolerated when checking expiry, in seconds.
const EXPIRY_LEEWAY: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<JwtClaims>().cloned();
        ready(claims.ok_or_else(|| {
            warn!("🔑️ No access token claims found in request extensions. Is the route missing its guards?");
            ServerError::AuthenticationError(AuthError::MissingToken)
        }))
    }
}

pub struct TokenIssuer {
    encoding_key: EncodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.access_token_secret.reveal().as_bytes());
        Self { encoding_key, ttl: config.token_ttl }
    }

    /// Issue a new access token for the given email.
    /// This method DOES NOT verify that the caller owns the email. That is left to the identity provider used by the
    /// client application.
    pub fn issue_token(&self, email: &str) -> Result<String, ServerError> {
        let now = Utc::now();
        let claims = JwtClaims { email: email.to_string(), iat: now.timestamp(), exp: (now + self.ttl).timestamp() };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ServerError::SigningError(e.to_string()))?;
        debug!("🔑️ Issued access token for {email}, valid until {}", claims.exp);
        Ok(token)
    }
}

pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.access_token_secret.reveal().as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = EXPIRY_LEEWAY;
        Self { decoding_key, validation }
    }

    /// Checks the signature and expiry of `token` and returns its claims.
    pub fn verify(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ValidationError("The access token has expired.".into()),
            ErrorKind::InvalidSignature => AuthError::ValidationError("The access token signature is invalid.".into()),
            _ => AuthError::PoorlyFormattedToken(format!("The access token could not be read. {e}")),
        })?;
        Ok(data.claims)
    }

    /// Extracts the token from an `Authorization: Bearer <token>` header value.
    pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
        let header = header.ok_or(AuthError::MissingToken)?;
        match header.split_once(' ') {
            Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
                Ok(token.trim())
            },
            _ => Err(AuthError::PoorlyFormattedToken("Expected a Bearer token in the Authorization header.".into())),
        }
    }
}
