use std::{sync::Arc, time::Duration};

use actix_web::{
    dev::Server,
    error::{JsonPayloadError, PathError, QueryPayloadError},
    http::KeepAlive,
    middleware::Logger,
    web,
    App,
    HttpRequest,
    HttpServer,
};
use bistro_engine::{AuthApi, CartApi, MenuApi, PaymentApi, PaymentIntentApi, SqliteDatabase, UserApi};
use log::*;
use stripe_tools::StripeApi;

use crate::{
    auth::{TokenIssuer, TokenVerifier},
    config::ServerConfig,
    errors::ServerError,
    integrations::stripe::StripeGateway,
    middleware::RoleLookup,
    routes::{
        health,
        issue_token,
        AddMenuItemRoute,
        AddToCartRoute,
        AdminMenuItemsRoute,
        AdminStatsRoute,
        CartRoute,
        CreatePaymentIntentRoute,
        DeleteMenuItemRoute,
        MenuItemRoute,
        MenusRoute,
        PaymentsRoute,
        RegisterRoute,
        RemoveFromCartRoute,
        ReviewsRoute,
        SettlePaymentRoute,
        UpdateMenuItemRoute,
        UserRoute,
        UsersRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    if config.create_database {
        SqliteDatabase::create_if_missing(&config.database_url)
            .await
            .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    }
    let db = SqliteDatabase::new_with_url(&config.database_url, config.max_connections)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(format!("Could not run migrations. {e}")))?;
    info!("🗃️ Database {} is ready", db.url());
    let stripe = StripeApi::new(config.stripe.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let gateway = StripeGateway::new(stripe);
    let srv = create_server_instance(config, db, gateway)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    gateway: StripeGateway,
) -> Result<Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let auth_api: Arc<dyn RoleLookup> = Arc::new(AuthApi::new(db.clone()));
        let users_api = UserApi::new(db.clone());
        let menu_api = MenuApi::new(db.clone());
        let cart_api = CartApi::new(db.clone());
        let payments_api = PaymentApi::new(db.clone());
        let intents_api = PaymentIntentApi::new(gateway.clone());
        let token_issuer = TokenIssuer::new(&config.auth);
        let token_verifier = TokenVerifier::new(&config.auth);
        let api_scope = web::scope("/api/v1")
            .service(issue_token)
            .service(RegisterRoute::<SqliteDatabase>::new())
            .service(UsersRoute::<SqliteDatabase>::new())
            .service(UserRoute::<SqliteDatabase>::new())
            .service(MenusRoute::<SqliteDatabase>::new())
            .service(AdminMenuItemsRoute::<SqliteDatabase>::new())
            .service(AddMenuItemRoute::<SqliteDatabase>::new())
            .service(MenuItemRoute::<SqliteDatabase>::new())
            .service(UpdateMenuItemRoute::<SqliteDatabase>::new())
            .service(DeleteMenuItemRoute::<SqliteDatabase>::new())
            .service(ReviewsRoute::<SqliteDatabase>::new())
            .service(CartRoute::<SqliteDatabase>::new())
            .service(AddToCartRoute::<SqliteDatabase>::new())
            .service(RemoveFromCartRoute::<SqliteDatabase>::new())
            .service(AdminStatsRoute::<SqliteDatabase>::new())
            .service(SettlePaymentRoute::<SqliteDatabase>::new())
            .service(PaymentsRoute::<SqliteDatabase>::new())
            .service(CreatePaymentIntentRoute::<StripeGateway>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("bistro::access_log"))
            .app_data(web::Data::from(auth_api))
            .app_data(web::Data::new(users_api))
            .app_data(web::Data::new(menu_api))
            .app_data(web::Data::new(cart_api))
            .app_data(web::Data::new(payments_api))
            .app_data(web::Data::new(intents_api))
            .app_data(web::Data::new(token_issuer))
            .app_data(web::Data::new(token_verifier))
            .configure(configure_extractors)
            .service(health)
            .service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}

/// Malformed bodies, paths and query strings are client errors and are reported with the usual `{message}` body.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|e: JsonPayloadError, _req: &HttpRequest| {
        ServerError::InvalidRequestBody(e.to_string()).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|e: PathError, _req: &HttpRequest| {
        ServerError::InvalidRequestPath(e.to_string()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|e: QueryPayloadError, _req: &HttpRequest| {
        ServerError::InvalidRequestQuery(e.to_string()).into()
    }));
}
