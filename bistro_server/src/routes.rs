//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests:
//! ```nocompile
//!     fn my_handler() -> impl Responder {
//!         std::thread::sleep(Duration::from_secs(5)); // <-- Bad practice! Will cause the current worker thread to
//! hang!
//!     }
//! ```
//! For this reason, any long, non-cpu-bound operation (e.g. I/O, database operations, etc.) should be expressed as
//! futures or asynchronous functions. Async handlers get executed concurrently by worker threads and thus don’t block
//! execution:
//!
//! ```nocompile
//!     async fn my_handler() -> impl Responder {
//!         tokio::time::sleep(Duration::from_secs(5)).await; // <-- Ok. Worker thread will handle other requests here
//!     }
//! ```
use actix_web::{get, post, web, HttpResponse, Responder};
use bistro_engine::{
    db_types::{MenuItemUpdate, NewCartItem, NewMenuItem, NewPayment, NewUser, Registration},
    helpers::validate_email,
    traits::{CartManagement, InsertResult, MenuManagement, PaymentGateway, PaymentManagement, UserManagement},
    CartApi,
    MenuApi,
    PaymentApi,
    PaymentIntentApi,
    UserApi,
};
use log::*;

use crate::{
    auth::{JwtClaims, TokenIssuer},
    data_objects::{ClientSecret, JsonResponse, PaymentIntentRequest, TokenRequest, TokenResponse},
    errors::{AuthError, ServerError},
    middleware::Guard,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:path),+) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:path),+ where guards [$($guards:expr),+])  => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::GuardMiddlewareFactory::new(&[$($guards),+]));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

/// The `email` query parameter used by the self-matching routes. The guards have already checked it against the
/// access token, so handlers only ever act on the verified email from [`JwtClaims`].
const EMAIL: &str = "email";
const USER_EMAIL: &str = "userEmail";

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Auth  ----------------------------------------------------
/// Route handler for the token endpoint
///
/// Issues a signed access token for the email in the request body. Tokens expire after a fixed period and do not
/// refresh. Protected routes expect the token in an `Authorization: Bearer <token>` header.
#[post("/token")]
pub async fn issue_token(
    body: web::Json<TokenRequest>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    let TokenRequest { email } = body.into_inner();
    trace!("💻️ Received token request for {email}");
    validate_email(&email).map_err(ServerError::ValidationError)?;
    let token = signer.issue_token(&email)?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

//----------------------------------------------   Users  ----------------------------------------------------
route!(register => Post "/users" impl UserManagement);
/// Route handler for user registration
///
/// Registration is idempotent. Registering an email that already exists succeeds with a message and leaves the
/// existing record (including its role) untouched. New users always get the `Customer` role.
pub async fn register<B: UserManagement>(
    body: web::Json<NewUser>,
    api: web::Data<UserApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let user = body.into_inner();
    debug!("💻️ POST register user {}", user.email);
    match api.register(user).await? {
        Registration::Created(id) => Ok(HttpResponse::Ok().json(InsertResult::new(id))),
        Registration::AlreadyExists => Ok(HttpResponse::Ok().json(JsonResponse::new("User already exists"))),
    }
}

route!(users => Get "/users" impl UserManagement where guards [Guard::VerifyToken, Guard::MatchSelf(EMAIL), Guard::RequireAdmin]);
/// Admins can list every user other than themselves.
pub async fn users<B: UserManagement>(
    claims: JwtClaims,
    api: web::Data<UserApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET users for {}", claims.email);
    let users = api.users_except(&claims.email).await?;
    Ok(HttpResponse::Ok().json(users))
}

route!(user => Get "/user" impl UserManagement where guards [Guard::VerifyToken, Guard::MatchSelf(EMAIL)]);
/// Fetches the caller's own user record, or `null` if they have not registered.
pub async fn user<B: UserManagement>(
    claims: JwtClaims,
    api: web::Data<UserApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET user {}", claims.email);
    let user = api.user_by_email(&claims.email).await?;
    Ok(HttpResponse::Ok().json(user))
}

//----------------------------------------------   Menu  ----------------------------------------------------
route!(menus => Get "/menus" impl MenuManagement);
pub async fn menus<B: MenuManagement>(api: web::Data<MenuApi<B>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET menus");
    let menu = api.menu().await?;
    Ok(HttpResponse::Ok().json(menu))
}

route!(menu_item => Get "/menu-items/{id}" impl MenuManagement);
/// Fetches a single menu item, or `null` if there is no item with that id.
pub async fn menu_item<B: MenuManagement>(
    path: web::Path<i64>,
    api: web::Data<MenuApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    trace!("💻️ GET menu item #{id}");
    let item = api.menu_item(id).await?;
    Ok(HttpResponse::Ok().json(item))
}

route!(admin_menu_items => Get "/menu-items" impl MenuManagement where guards [Guard::VerifyToken, Guard::MatchSelf(EMAIL), Guard::RequireAdmin]);
/// Lists the menu items created by the calling admin.
pub async fn admin_menu_items<B: MenuManagement>(
    claims: JwtClaims,
    api: web::Data<MenuApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET menu items for admin {}", claims.email);
    let items = api.menu_items_for_admin(&claims.email).await?;
    Ok(HttpResponse::Ok().json(items))
}

route!(add_menu_item => Post "/menu-items" impl MenuManagement where guards [Guard::VerifyToken, Guard::MatchSelf(EMAIL), Guard::RequireAdmin]);
/// Adds a menu item. The creating admin is always taken from the access token.
pub async fn add_menu_item<B: MenuManagement>(
    claims: JwtClaims,
    body: web::Json<NewMenuItem>,
    api: web::Data<MenuApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST menu item from {}", claims.email);
    let item = api.add_menu_item(body.into_inner(), &claims.email).await?;
    Ok(HttpResponse::Ok().json(InsertResult::new(item.id)))
}

route!(update_menu_item => Patch "/menu-items/{id}" impl MenuManagement where guards [Guard::VerifyToken, Guard::MatchSelf(EMAIL), Guard::RequireAdmin]);
/// Partially updates a menu item. Fields that are absent from the body are left unchanged.
pub async fn update_menu_item<B: MenuManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    body: web::Json<MenuItemUpdate>,
    api: web::Data<MenuApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ PATCH menu item #{id} by {}", claims.email);
    let result = api.update_menu_item(id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

route!(delete_menu_item => Delete "/menu-items/{id}" impl MenuManagement where guards [Guard::VerifyToken, Guard::MatchSelf(EMAIL), Guard::RequireAdmin]);
pub async fn delete_menu_item<B: MenuManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<MenuApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ DELETE menu item #{id} by {}", claims.email);
    let result = api.delete_menu_item(id).await?;
    Ok(HttpResponse::Ok().json(result))
}

route!(reviews => Get "/reviews" impl MenuManagement);
pub async fn reviews<B: MenuManagement>(api: web::Data<MenuApi<B>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET reviews");
    let reviews = api.reviews().await?;
    Ok(HttpResponse::Ok().json(reviews))
}

//----------------------------------------------   Cart  ----------------------------------------------------
route!(cart => Get "/cart" impl CartManagement where guards [Guard::VerifyToken, Guard::MatchSelf(USER_EMAIL)]);
pub async fn cart<B: CartManagement>(
    claims: JwtClaims,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET cart for {}", claims.email);
    let items = api.cart_for_user(&claims.email).await?;
    Ok(HttpResponse::Ok().json(items))
}

route!(add_to_cart => Post "/cart" impl CartManagement where guards [Guard::VerifyToken]);
/// Adds a line item to the caller's cart. The owner is always taken from the access token.
pub async fn add_to_cart<B: CartManagement>(
    claims: JwtClaims,
    body: web::Json<NewCartItem>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST cart item for {}", claims.email);
    let item = api.add_to_cart(body.into_inner(), &claims.email).await?;
    Ok(HttpResponse::Ok().json(InsertResult::new(item.id)))
}

route!(remove_from_cart => Delete "/cart/{id}" impl CartManagement where guards [Guard::VerifyToken]);
/// Removes a line item from the caller's cart. Items in other users' carts are never touched.
pub async fn remove_from_cart<B: CartManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ DELETE cart item #{id} for {}", claims.email);
    let result = api.remove_from_cart(id, &claims.email).await?;
    Ok(HttpResponse::Ok().json(result))
}

//----------------------------------------------   Payments  ----------------------------------------------------
route!(admin_stats => Get "/admin-stats" impl PaymentManagement where guards [Guard::VerifyToken, Guard::MatchSelf(EMAIL), Guard::RequireAdmin]);
pub async fn admin_stats<B: PaymentManagement>(
    claims: JwtClaims,
    api: web::Data<PaymentApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET admin stats for {}", claims.email);
    let stats = api.admin_stats().await?;
    Ok(HttpResponse::Ok().json(stats))
}

route!(settle_payment => Post "/payments" impl PaymentManagement where guards [Guard::VerifyToken]);
/// Route handler for payment settlement
///
/// Called by the client once the payment gateway has confirmed a charge. The payment is recorded and the cart items
/// it covers are removed in a single transaction. The `email` in the body must be the caller's own.
///
/// The response carries both the insert result and the cart deletion result. A `deletedCount` smaller than
/// `requestedCount` means some of the cart items were already gone.
pub async fn settle_payment<B: PaymentManagement>(
    claims: JwtClaims,
    body: web::Json<NewPayment>,
    api: web::Data<PaymentApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let payment = body.into_inner();
    debug!("💻️ POST payment {} from {}", payment.transaction_id, claims.email);
    if payment.email != claims.email {
        info!("💻️ {} tried to record a payment for {}. Denied.", claims.email, payment.email);
        return Err(AuthError::IdentityMismatch.into());
    }
    let settlement = api.settle(payment).await?;
    Ok(HttpResponse::Ok().json(settlement))
}

route!(payments => Get "/payments" impl PaymentManagement where guards [Guard::VerifyToken, Guard::MatchSelf(EMAIL)]);
pub async fn payments<B: PaymentManagement>(
    claims: JwtClaims,
    api: web::Data<PaymentApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET payments for {}", claims.email);
    let payments = api.payments_for_email(&claims.email).await?;
    Ok(HttpResponse::Ok().json(payments))
}

route!(create_payment_intent => Post "/payment-intents" impl PaymentGateway where guards [Guard::VerifyToken]);
/// Route handler for payment intent creation
///
/// `price` is given in major currency units and must be positive. The gateway is asked for a card payment intent for
/// the equivalent number of minor units and the resulting client secret is returned.
pub async fn create_payment_intent<G: PaymentGateway>(
    claims: JwtClaims,
    body: web::Json<PaymentIntentRequest>,
    api: web::Data<PaymentIntentApi<G>>,
) -> Result<HttpResponse, ServerError> {
    let PaymentIntentRequest { price } = body.into_inner();
    debug!("💻️ POST payment intent for {price} from {}", claims.email);
    let client_secret = api.create_intent(price).await?;
    Ok(HttpResponse::Ok().json(ClientSecret { client_secret }))
}
