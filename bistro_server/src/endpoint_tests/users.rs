use actix_web::{http::StatusCode, test::TestRequest, web};
use bistro_engine::{
    db_types::{Registration, Role, UserRecord},
    traits::UserApiError,
    UserApi,
};
use chrono::Utc;
use serde_json::{json, Value};

use super::{helpers::*, mocks::MockUserManager};
use crate::routes::{RegisterRoute, UsersRoute};

fn user(id: i64, email: &str, role: Role) -> UserRecord {
    UserRecord { id, email: email.to_string(), name: None, photo: None, role, created_at: Utc::now() }
}

#[actix_web::test]
async fn register_new_user() {
    let _ = env_logger::try_init().ok();
    let mut users = MockUserManager::new();
    users
        .expect_insert_user_if_absent()
        .withf(|u| u.email == "carol@example.com" && u.name.as_deref() == Some("Carol"))
        .times(1)
        .returning(|_| Ok(Registration::Created(7)));
    let req = TestRequest::post()
        .uri("/users")
        .set_json(json!({"email": "carol@example.com", "name": "Carol", "role": "Admin"}));
    let (status, body) = send_request(req, move |cfg| {
        cfg.app_data(web::Data::new(UserApi::new(users))).service(RegisterRoute::<MockUserManager>::new());
    })
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"acknowledged":true,"insertedId":7}"#);
}

#[actix_web::test]
async fn register_existing_user() {
    let _ = env_logger::try_init().ok();
    let mut users = MockUserManager::new();
    users.expect_insert_user_if_absent().returning(|_| Ok(Registration::AlreadyExists));
    let req = TestRequest::post().uri("/users").set_json(json!({"email": "carol@example.com"}));
    let (status, body) = send_request(req, move |cfg| {
        cfg.app_data(web::Data::new(UserApi::new(users))).service(RegisterRoute::<MockUserManager>::new());
    })
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"message":"User already exists"}"#);
}

#[actix_web::test]
async fn register_with_malformed_body() {
    let _ = env_logger::try_init().ok();
    let users = MockUserManager::new();
    let req = TestRequest::post().uri("/users").set_json(json!({"name": "No email"}));
    let (status, body) = send_request(req, move |cfg| {
        cfg.app_data(web::Data::new(UserApi::new(users))).service(RegisterRoute::<MockUserManager>::new());
    })
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with(r#"{"message":"Could not read request body"#), "was: {body}");
}

#[actix_web::test]
async fn register_with_invalid_email() {
    let _ = env_logger::try_init().ok();
    let users = MockUserManager::new();
    let req = TestRequest::post().uri("/users").set_json(json!({"email": "carol"}));
    let (status, _) = send_request(req, move |cfg| {
        cfg.app_data(web::Data::new(UserApi::new(users))).service(RegisterRoute::<MockUserManager>::new());
    })
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

fn configure_users_route(users: MockUserManager, admin: &'static str, role: Role) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(UserApi::new(users)))
            .app_data(roles(admin, role))
            .service(UsersRoute::<MockUserManager>::new());
    }
}

#[actix_web::test]
async fn admin_lists_other_users() {
    let _ = env_logger::try_init().ok();
    let mut users = MockUserManager::new();
    users
        .expect_fetch_users_except()
        .withf(|email| email == "admin@example.com")
        .times(1)
        .returning(|_| Ok(vec![user(2, "bob@example.com", Role::Customer)]));
    let req = TestRequest::get().uri("/users?email=admin@example.com").insert_header(bearer("admin@example.com"));
    let (status, body) =
        send_request(req, configure_users_route(users, "admin@example.com", Role::Admin)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["email"], "bob@example.com");
    assert_eq!(body[0]["role"], "Customer");
}

#[actix_web::test]
async fn customers_cannot_list_users() {
    let _ = env_logger::try_init().ok();
    let users = MockUserManager::new();
    let req = TestRequest::get().uri("/users?email=bob@example.com").insert_header(bearer("bob@example.com"));
    let (status, body) = send_request(req, configure_users_route(users, "bob@example.com", Role::Customer)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, r#"{"message":"Forbidden access. Admin access is required."}"#);
}

#[actix_web::test]
async fn unknown_users_are_not_admins() {
    let _ = env_logger::try_init().ok();
    let users = MockUserManager::new();
    let req = TestRequest::get().uri("/users?email=ghost@example.com").insert_header(bearer("ghost@example.com"));
    let (status, _) = send_request(req, configure_users_route(users, "admin@example.com", Role::Admin)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn admins_still_need_to_match_themselves() {
    let _ = env_logger::try_init().ok();
    let users = MockUserManager::new();
    let req = TestRequest::get().uri("/users?email=other@example.com").insert_header(bearer("admin@example.com"));
    let (status, body) = send_request(req, configure_users_route(users, "admin@example.com", Role::Admin)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("does not match the authenticated user"), "was: {body}");
}

#[actix_web::test]
async fn backend_failures_are_server_errors() {
    let _ = env_logger::try_init().ok();
    let mut users = MockUserManager::new();
    users.expect_fetch_users_except().returning(|_| Err(UserApiError::DatabaseError("disk on fire".into())));
    let req = TestRequest::get().uri("/users?email=admin@example.com").insert_header(bearer("admin@example.com"));
    let (status, _) = send_request(req, configure_users_route(users, "admin@example.com", Role::Admin)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
