//! Request guard middleware for the Bistro server.
//! This middleware can be placed on any route or service.
//!
//! Each route declares an ordered list of [`Guard`]s. They are evaluated in order and the first failure short-circuits
//! the request:
//! * [`Guard::VerifyToken`] checks the `Authorization: Bearer` access token and attaches the decoded [`JwtClaims`] to
//!   the request (401 on failure).
//! * [`Guard::MatchSelf`] requires a query parameter to equal the verified email (403 on mismatch or if it is absent).
//! * [`Guard::RequireAdmin`] looks up the verified email in the user directory and requires the `Admin` role (403
//!   otherwise, including for unknown users).
//!
//! Guards after `VerifyToken` only ever use the verified email, never an identity supplied by the client.
use std::{collections::HashMap, pin::Pin, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web,
    Error,
    HttpMessage,
};
use bistro_engine::{
    traits::{AuthApiError, AuthManagement},
    AuthApi,
};
use futures::{
    future::{ok, LocalBoxFuture, Ready},
    Future,
    FutureExt,
};
use log::*;

use crate::{
    auth::{JwtClaims, TokenVerifier},
    errors::{AuthError, ServerError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    VerifyToken,
    /// The named query parameter must equal the verified email.
    MatchSelf(&'static str),
    RequireAdmin,
}

/// Answers whether a verified email belongs to an admin.
///
/// The admin guard reaches the user directory through `web::Data<dyn RoleLookup>`, so that routes whose handlers use a
/// different backend (the payment gateway, for instance) can still share the same guard pipeline.
pub trait RoleLookup {
    fn check_admin<'a>(&'a self, email: &'a str) -> LocalBoxFuture<'a, Result<bool, AuthApiError>>;
}

impl<A: AuthManagement> RoleLookup for AuthApi<A> {
    fn check_admin<'a>(&'a self, email: &'a str) -> LocalBoxFuture<'a, Result<bool, AuthApiError>> {
        self.is_admin(email).boxed_local()
    }
}

pub struct GuardMiddlewareFactory {
    guards: Vec<Guard>,
}

impl GuardMiddlewareFactory {
    pub fn new(guards: &[Guard]) -> Self {
        GuardMiddlewareFactory { guards: guards.to_vec() }
    }
}

impl<S, B> Transform<S, ServiceRequest> for GuardMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = GuardMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(GuardMiddlewareService { guards: self.guards.clone(), service: Rc::new(service) })
    }
}

pub struct GuardMiddlewareService<S> {
    guards: Vec<Guard>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for GuardMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let guards = self.guards.clone();
        Box::pin(async move {
            for guard in guards {
                match guard {
                    Guard::VerifyToken => {
                        let claims = verify_token(&req)?;
                        trace!("🔑️ Access token verified for {}", claims.email);
                        req.extensions_mut().insert(claims);
                    },
                    Guard::MatchSelf(param) => {
                        let email = verified_email(&req)?;
                        match_self(&req, param, &email)?;
                    },
                    Guard::RequireAdmin => {
                        let email = verified_email(&req)?;
                        require_admin(&req, &email).await?;
                    },
                }
            }
            service.call(req).await
        })
    }
}

fn verify_token(req: &ServiceRequest) -> Result<JwtClaims, ServerError> {
    let verifier = req.app_data::<web::Data<TokenVerifier>>().ok_or_else(|| {
        error!("🔑️ No token verifier has been configured for this route");
        ServerError::ConfigurationError("Token verifier is not configured".into())
    })?;
    let header = req.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let token = TokenVerifier::bearer_token(header)?;
    let claims = verifier.verify(token).map_err(|e| {
        debug!("🔑️ Access token rejected. {e}");
        e
    })?;
    Ok(claims)
}

fn verified_email(req: &ServiceRequest) -> Result<String, ServerError> {
    req.extensions().get::<JwtClaims>().map(|c| c.email.clone()).ok_or_else(|| {
        warn!("🔑️ No access token claims found. VerifyToken must come first in the guard list.");
        ServerError::AuthenticationError(AuthError::MissingToken)
    })
}

fn match_self(req: &ServiceRequest, param: &str, email: &str) -> Result<(), ServerError> {
    let query = web::Query::<HashMap<String, String>>::from_query(req.query_string()).ok();
    match query.as_ref().and_then(|q| q.get(param)) {
        Some(value) if value == email => Ok(()),
        Some(value) => {
            info!("🔑️ {email} tried to access data for {value}. Denied.");
            Err(AuthError::IdentityMismatch.into())
        },
        None => {
            debug!("🔑️ Query parameter '{param}' is missing. Denied.");
            Err(AuthError::IdentityMismatch.into())
        },
    }
}

async fn require_admin(req: &ServiceRequest, email: &str) -> Result<(), ServerError> {
    let roles = req.app_data::<web::Data<dyn RoleLookup>>().cloned().ok_or_else(|| {
        error!("🔑️ No role lookup has been configured for this route");
        ServerError::ConfigurationError("Role lookup is not configured".into())
    })?;
    if roles.check_admin(email).await? {
        Ok(())
    } else {
        info!("🔑️ {email} is not an admin. Denied.");
        Err(AuthError::InsufficientPermissions("Admin access is required.".into()).into())
    }
}
