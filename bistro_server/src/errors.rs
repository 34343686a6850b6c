use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use bistro_engine::{
    traits::{AuthApiError, CartApiError, MenuApiError, PaymentApiError, SettlementError, UserApiError},
    PaymentIntentError,
};
use log::error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("Could not read query parameters: {0}")]
    InvalidRequestQuery(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("{0}")]
    AuthenticationError(#[from] AuthError),
    #[error("Could not sign access token. {0}")]
    SigningError(String),
    #[error("The payment gateway could not complete the request. {0}")]
    GatewayError(String),
    #[error("The payment could not be settled. {0}")]
    SettlementError(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestQuery(_) => StatusCode::BAD_REQUEST,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => match e {
                AuthError::MissingToken => StatusCode::UNAUTHORIZED,
                AuthError::PoorlyFormattedToken(_) => StatusCode::UNAUTHORIZED,
                AuthError::ValidationError(_) => StatusCode::UNAUTHORIZED,
                AuthError::IdentityMismatch => StatusCode::FORBIDDEN,
                AuthError::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            },
            Self::GatewayError(_) => StatusCode::BAD_GATEWAY,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SigningError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SettlementError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("💻️ {self}");
        }
        HttpResponse::build(status)
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "message": self.to_string() }).to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Unauthorized access. No access token was provided.")]
    MissingToken,
    #[error("Unauthorized access. {0}")]
    PoorlyFormattedToken(String),
    #[error("Unauthorized access. {0}")]
    ValidationError(String),
    #[error("Forbidden access. The request does not match the authenticated user.")]
    IdentityMismatch,
    #[error("Forbidden access. {0}")]
    InsufficientPermissions(String),
}

impl From<AuthApiError> for ServerError {
    fn from(e: AuthApiError) -> Self {
        match e {
            AuthApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<UserApiError> for ServerError {
    fn from(e: UserApiError) -> Self {
        match e {
            UserApiError::InvalidUser(msg) => Self::ValidationError(msg),
            UserApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<MenuApiError> for ServerError {
    fn from(e: MenuApiError) -> Self {
        match e {
            MenuApiError::InvalidMenuItem(msg) => Self::ValidationError(msg),
            MenuApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<CartApiError> for ServerError {
    fn from(e: CartApiError) -> Self {
        match e {
            CartApiError::InvalidCartItem(msg) => Self::ValidationError(msg),
            CartApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<PaymentApiError> for ServerError {
    fn from(e: PaymentApiError) -> Self {
        match e {
            PaymentApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<SettlementError> for ServerError {
    fn from(e: SettlementError) -> Self {
        match e {
            SettlementError::InvalidPayment(msg) => Self::ValidationError(msg),
            e => Self::SettlementError(e.to_string()),
        }
    }
}

impl From<PaymentIntentError> for ServerError {
    fn from(e: PaymentIntentError) -> Self {
        match e {
            PaymentIntentError::InvalidAmount(e) => Self::ValidationError(e.to_string()),
            PaymentIntentError::GatewayError(e) => Self::GatewayError(e.to_string()),
        }
    }
}
