use actix_web::{http::StatusCode, test::TestRequest, web};
use bistro_engine::{db_types::UserRecord, UserApi};
use chrono::Duration;
use serde_json::{json, Value};

use super::{helpers::*, mocks::MockUserManager};
use crate::{
    auth::{TokenIssuer, TokenVerifier},
    config::AuthConfig,
    routes::{issue_token as token_route, UserRoute},
};

fn configure_user_route(cfg: &mut web::ServiceConfig) {
    let mut users = MockUserManager::new();
    users.expect_fetch_user_by_email().returning(|_| Ok(None::<UserRecord>));
    cfg.app_data(web::Data::new(UserApi::new(users))).service(UserRoute::<MockUserManager>::new());
}

#[actix_web::test]
async fn token_is_issued_for_valid_email() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/token").set_json(json!({"email": "alice@example.com", "name": "Alice"}));
    let (status, body) = send_request(req, |cfg| {
        cfg.app_data(web::Data::new(TokenIssuer::new(&get_auth_config()))).service(token_route);
    })
    .await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    let token = body["token"].as_str().unwrap();
    let claims = TokenVerifier::new(&get_auth_config()).verify(token).unwrap();
    assert_eq!(claims.email, "alice@example.com");
}

#[actix_web::test]
async fn token_is_refused_for_invalid_email() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/token").set_json(json!({"email": "not-an-email"}));
    let (status, body) = send_request(req, |cfg| {
        cfg.app_data(web::Data::new(TokenIssuer::new(&get_auth_config()))).service(token_route);
    })
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"message":"'not-an-email' is not a valid email address"}"#);
}

#[actix_web::test]
async fn missing_token() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/user?email=alice@example.com");
    let (status, body) = send_request(req, configure_user_route).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"message":"Unauthorized access. No access token was provided."}"#);
}

#[actix_web::test]
async fn garbage_token() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get()
        .uri("/user?email=alice@example.com")
        .insert_header(("Authorization", "Bearer made.up.nonsense"));
    let (status, body) = send_request(req, configure_user_route).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("Unauthorized access."), "was: {body}");
}

#[actix_web::test]
async fn wrong_auth_scheme() {
    let _ = env_logger::try_init().ok();
    let token = issue_token("alice@example.com");
    let req = TestRequest::get()
        .uri("/user?email=alice@example.com")
        .insert_header(("Authorization", format!("Basic {token}")));
    let (status, _) = send_request(req, configure_user_route).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn token_signed_with_another_secret() {
    let _ = env_logger::try_init().ok();
    let other = AuthConfig::new("some-other-secret", Duration::hours(1));
    let token = TokenIssuer::new(&other).issue_token("alice@example.com").unwrap();
    let req = TestRequest::get()
        .uri("/user?email=alice@example.com")
        .insert_header(("Authorization", format!("Bearer {token}")));
    let (status, body) = send_request(req, configure_user_route).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"message":"Unauthorized access. The access token signature is invalid."}"#);
}

#[actix_web::test]
async fn expired_token() {
    let _ = env_logger::try_init().ok();
    let expired = AuthConfig::new(get_auth_config().access_token_secret.reveal().as_str(), Duration::hours(-1));
    let token = TokenIssuer::new(&expired).issue_token("alice@example.com").unwrap();
    let req = TestRequest::get()
        .uri("/user?email=alice@example.com")
        .insert_header(("Authorization", format!("Bearer {token}")));
    let (status, body) = send_request(req, configure_user_route).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"message":"Unauthorized access. The access token has expired."}"#);
}

#[actix_web::test]
async fn valid_token_for_self() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/user?email=alice@example.com").insert_header(bearer("alice@example.com"));
    let (status, body) = send_request(req, configure_user_route).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "null");
}

#[actix_web::test]
async fn valid_token_for_someone_else() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/user?email=bob@example.com").insert_header(bearer("alice@example.com"));
    let (status, body) = send_request(req, configure_user_route).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, r#"{"message":"Forbidden access. The request does not match the authenticated user."}"#);
}

#[actix_web::test]
async fn self_match_needs_the_query_parameter() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/user").insert_header(bearer("alice@example.com"));
    let (status, _) = send_request(req, configure_user_route).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn health_check_is_public() {
    let _ = env_logger::try_init().ok();
    let (status, body) = send_request(TestRequest::get().uri("/health"), |cfg| {
        cfg.service(crate::routes::health);
    })
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}
