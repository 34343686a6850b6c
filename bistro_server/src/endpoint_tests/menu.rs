use actix_web::{http::StatusCode, test::TestRequest, web};
use bistro_engine::{
    db_types::{MenuItem, Review, Role},
    traits::{DeleteResult, UpdateResult},
    MenuApi,
};
use serde_json::{json, Value};

use super::{helpers::*, mocks::MockMenuManager};
use crate::routes::{
    AddMenuItemRoute,
    AdminMenuItemsRoute,
    DeleteMenuItemRoute,
    MenuItemRoute,
    MenusRoute,
    ReviewsRoute,
    UpdateMenuItemRoute,
};

const ADMIN: &str = "chef@example.com";

fn soup(id: i64) -> MenuItem {
    MenuItem {
        id,
        name: "Tomato soup".into(),
        category: "soup".into(),
        price: 4.5,
        recipe: "Tomatoes, stock, basil".into(),
        image: None,
        admin_email: ADMIN.into(),
    }
}

fn configure_menu(menu: MockMenuManager) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(MenuApi::new(menu)))
            .app_data(roles(ADMIN, Role::Admin))
            .service(MenusRoute::<MockMenuManager>::new())
            .service(AdminMenuItemsRoute::<MockMenuManager>::new())
            .service(AddMenuItemRoute::<MockMenuManager>::new())
            .service(MenuItemRoute::<MockMenuManager>::new())
            .service(UpdateMenuItemRoute::<MockMenuManager>::new())
            .service(DeleteMenuItemRoute::<MockMenuManager>::new())
            .service(ReviewsRoute::<MockMenuManager>::new());
    }
}

#[actix_web::test]
async fn menu_is_public() {
    let _ = env_logger::try_init().ok();
    let mut menu = MockMenuManager::new();
    menu.expect_fetch_menu().returning(|| Ok(vec![soup(1), soup(2)]));
    let (status, body) = send_request(TestRequest::get().uri("/menus"), configure_menu(menu)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["adminEmail"], ADMIN);
}

#[actix_web::test]
async fn single_menu_item() {
    let _ = env_logger::try_init().ok();
    let mut menu = MockMenuManager::new();
    menu.expect_fetch_menu_item().returning(|id| Ok((id == 3).then(|| soup(3))));
    let (status, body) = send_request(TestRequest::get().uri("/menu-items/3"), configure_menu(menu)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["id"], 3);

    let mut menu = MockMenuManager::new();
    menu.expect_fetch_menu_item().returning(|_| Ok(None));
    let (status, body) = send_request(TestRequest::get().uri("/menu-items/99"), configure_menu(menu)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "null");
}

#[actix_web::test]
async fn menu_item_id_must_be_numeric() {
    let _ = env_logger::try_init().ok();
    let menu = MockMenuManager::new();
    let (status, body) = send_request(TestRequest::get().uri("/menu-items/soup"), configure_menu(menu)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Could not read request path"), "was: {body}");
}

#[actix_web::test]
async fn reviews_are_public() {
    let _ = env_logger::try_init().ok();
    let mut menu = MockMenuManager::new();
    menu.expect_fetch_reviews()
        .returning(|| Ok(vec![Review { id: 1, name: "Dana".into(), details: "Lovely".into(), rating: 4.5 }]));
    let (status, body) = send_request(TestRequest::get().uri("/reviews"), configure_menu(menu)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"[{"id":1,"name":"Dana","details":"Lovely","rating":4.5}]"#);
}

#[actix_web::test]
async fn admin_adds_menu_item_as_themselves() {
    let _ = env_logger::try_init().ok();
    let mut menu = MockMenuManager::new();
    menu.expect_insert_menu_item()
        .withf(|item, admin| item.name == "Tomato soup" && admin == ADMIN)
        .times(1)
        .returning(|_, _| Ok(soup(12)));
    let req = TestRequest::post()
        .uri(&format!("/menu-items?email={ADMIN}"))
        .insert_header(bearer(ADMIN))
        .set_json(json!({
            "name": "Tomato soup",
            "category": "soup",
            "price": 4.5,
            "recipe": "Tomatoes, stock, basil",
            "adminEmail": "someone-else@example.com"
        }));
    let (status, body) = send_request(req, configure_menu(menu)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"acknowledged":true,"insertedId":12}"#);
}

#[actix_web::test]
async fn customers_cannot_add_menu_items() {
    let _ = env_logger::try_init().ok();
    let menu = MockMenuManager::new();
    let req = TestRequest::post()
        .uri("/menu-items?email=bob@example.com")
        .insert_header(bearer("bob@example.com"))
        .set_json(json!({"name": "Free lunch", "category": "misc", "price": 0.01, "recipe": "none"}));
    let (status, _) = send_request(req, configure_menu(menu)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn menu_items_need_a_positive_price() {
    let _ = env_logger::try_init().ok();
    let menu = MockMenuManager::new();
    let req = TestRequest::post()
        .uri(&format!("/menu-items?email={ADMIN}"))
        .insert_header(bearer(ADMIN))
        .set_json(json!({"name": "Free lunch", "category": "misc", "price": 0.0, "recipe": "none"}));
    let (status, body) = send_request(req, configure_menu(menu)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Price must be a positive number"), "was: {body}");
}

#[actix_web::test]
async fn admin_lists_own_menu_items() {
    let _ = env_logger::try_init().ok();
    let mut menu = MockMenuManager::new();
    menu.expect_fetch_menu_items_for_admin().withf(|admin| admin == ADMIN).returning(|_| Ok(vec![soup(1)]));
    let req = TestRequest::get().uri(&format!("/menu-items?email={ADMIN}")).insert_header(bearer(ADMIN));
    let (status, body) = send_request(req, configure_menu(menu)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn admin_updates_menu_item() {
    let _ = env_logger::try_init().ok();
    let mut menu = MockMenuManager::new();
    menu.expect_update_menu_item()
        .withf(|id, update| *id == 4 && update.price == Some(6.0) && update.name.is_none())
        .times(1)
        .returning(|_, _| Ok(UpdateResult::new(1, 1)));
    let req = TestRequest::patch()
        .uri(&format!("/menu-items/4?email={ADMIN}"))
        .insert_header(bearer(ADMIN))
        .set_json(json!({"price": 6.0}));
    let (status, body) = send_request(req, configure_menu(menu)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"acknowledged":true,"matchedCount":1,"modifiedCount":1}"#);
}

#[actix_web::test]
async fn admin_deletes_menu_item() {
    let _ = env_logger::try_init().ok();
    let mut menu = MockMenuManager::new();
    menu.expect_delete_menu_item().withf(|id| *id == 4).times(1).returning(|_| Ok(DeleteResult::new(1)));
    let req = TestRequest::delete().uri(&format!("/menu-items/4?email={ADMIN}")).insert_header(bearer(ADMIN));
    let (status, body) = send_request(req, configure_menu(menu)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"acknowledged":true,"deletedCount":1}"#);
}

#[actix_web::test]
async fn deleting_needs_a_token() {
    let _ = env_logger::try_init().ok();
    let menu = MockMenuManager::new();
    let req = TestRequest::delete().uri(&format!("/menu-items/4?email={ADMIN}"));
    let (status, _) = send_request(req, configure_menu(menu)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
