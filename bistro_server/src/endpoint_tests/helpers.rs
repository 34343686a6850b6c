use std::sync::Arc;

use actix_web::{
    body::to_bytes,
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use bistro_engine::{db_types::Role, AuthApi};
use chrono::Duration;
use log::debug;

use super::mocks::MockAuthManager;
use crate::{
    auth::{TokenIssuer, TokenVerifier},
    config::AuthConfig,
    middleware::RoleLookup,
    server::configure_extractors,
};

// DO NOT re-use this secret anywhere.
const TEST_SECRET: &str = "endpoint-test-secret-d1b1c0e7a24f4d3c9e0b";

pub fn get_auth_config() -> AuthConfig {
    AuthConfig::new(TEST_SECRET, Duration::hours(1))
}

pub fn issue_token(email: &str) -> String {
    TokenIssuer::new(&get_auth_config()).issue_token(email).expect("Failed to sign token")
}

pub fn bearer(email: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", issue_token(email)))
}

/// A role lookup backed by a mock that reports `role` for `email` and nothing for anyone else.
pub fn roles(email: &'static str, role: Role) -> web::Data<dyn RoleLookup> {
    let mut auth = MockAuthManager::new();
    auth.expect_fetch_role_for_email().returning(move |e| Ok((e == email).then_some(role)));
    let lookup: Arc<dyn RoleLookup> = Arc::new(AuthApi::new(auth));
    web::Data::from(lookup)
}

/// Sends `req` to an app set up with the test token verifier and the given configuration. Errors raised by the guard
/// middleware are rendered the same way the server renders them.
pub async fn send_request<F>(req: TestRequest, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    let app = App::new()
        .app_data(web::Data::new(TokenVerifier::new(&get_auth_config())))
        .configure(configure_extractors)
        .configure(configure);
    let service = test::init_service(app).await;
    let res = match test::try_call_service(&service, req.to_request()).await {
        Ok(res) => res.into_parts().1.map_into_boxed_body(),
        Err(e) => e.error_response(),
    };
    let status = res.status();
    let body = to_bytes(res.into_body()).await.expect("Failed to read response body");
    let body = String::from_utf8_lossy(&body).into_owned();
    debug!("Response: {status} {body}");
    (status, body)
}
