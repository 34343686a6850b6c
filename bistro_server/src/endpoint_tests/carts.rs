use actix_web::{http::StatusCode, test::TestRequest, web};
use bistro_engine::{db_types::CartItem, traits::DeleteResult, CartApi};
use serde_json::{json, Value};

use super::{helpers::*, mocks::MockCartManager};
use crate::routes::{AddToCartRoute, CartRoute, RemoveFromCartRoute};

fn line_item(id: i64, owner: &str) -> CartItem {
    CartItem {
        id,
        user_email: owner.to_string(),
        menu_item_id: 3,
        name: "Tomato soup".into(),
        image: None,
        price: 4.5,
    }
}

fn configure_cart(cart: MockCartManager) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(CartApi::new(cart)))
            .service(CartRoute::<MockCartManager>::new())
            .service(AddToCartRoute::<MockCartManager>::new())
            .service(RemoveFromCartRoute::<MockCartManager>::new());
    }
}

#[actix_web::test]
async fn fetch_own_cart() {
    let _ = env_logger::try_init().ok();
    let mut cart = MockCartManager::new();
    cart.expect_fetch_cart_for_user()
        .withf(|email| email == "alice@example.com")
        .returning(|email| Ok(vec![line_item(1, email), line_item(2, email)]));
    let req = TestRequest::get().uri("/cart?userEmail=alice@example.com").insert_header(bearer("alice@example.com"));
    let (status, body) = send_request(req, configure_cart(cart)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[1]["userEmail"], "alice@example.com");
}

#[actix_web::test]
async fn cannot_fetch_someone_elses_cart() {
    let _ = env_logger::try_init().ok();
    let cart = MockCartManager::new();
    let req = TestRequest::get().uri("/cart?userEmail=bob@example.com").insert_header(bearer("alice@example.com"));
    let (status, _) = send_request(req, configure_cart(cart)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The cart route matches on `userEmail`, not `email`
    let cart = MockCartManager::new();
    let req = TestRequest::get().uri("/cart?email=alice@example.com").insert_header(bearer("alice@example.com"));
    let (status, _) = send_request(req, configure_cart(cart)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn items_are_added_to_the_callers_cart() {
    let _ = env_logger::try_init().ok();
    let mut cart = MockCartManager::new();
    cart.expect_insert_cart_item()
        .withf(|item, owner| item.menu_item_id == 3 && owner == "alice@example.com")
        .times(1)
        .returning(|_, owner| Ok(line_item(21, owner)));
    let req = TestRequest::post().uri("/cart").insert_header(bearer("alice@example.com")).set_json(json!({
        "menuItemId": 3,
        "name": "Tomato soup",
        "price": 4.5,
        "userEmail": "bob@example.com"
    }));
    let (status, body) = send_request(req, configure_cart(cart)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"acknowledged":true,"insertedId":21}"#);
}

#[actix_web::test]
async fn adding_to_cart_needs_a_token() {
    let _ = env_logger::try_init().ok();
    let cart = MockCartManager::new();
    let req = TestRequest::post().uri("/cart").set_json(json!({"menuItemId": 3, "name": "Tomato soup", "price": 4.5}));
    let (status, _) = send_request(req, configure_cart(cart)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn removal_is_scoped_to_the_caller() {
    let _ = env_logger::try_init().ok();
    let mut cart = MockCartManager::new();
    cart.expect_delete_cart_item()
        .withf(|id, owner| *id == 21 && owner == "bob@example.com")
        .times(1)
        .returning(|_, _| Ok(DeleteResult::new(0)));
    let req = TestRequest::delete().uri("/cart/21").insert_header(bearer("bob@example.com"));
    let (status, body) = send_request(req, configure_cart(cart)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"acknowledged":true,"deletedCount":0}"#);
}
