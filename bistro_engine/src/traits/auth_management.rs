use thiserror::Error;

use crate::db_types::Role;

#[derive(Debug, Clone, Error)]
pub enum AuthApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for AuthApiError {
    fn from(e: sqlx::Error) -> Self {
        AuthApiError::DatabaseError(e.to_string())
    }
}

/// Behaviour required by the role authorizer. Roles are read from the backend on every call and are never cached, so
/// a role change takes effect on the very next request.
#[allow(async_fn_in_trait)]
pub trait AuthManagement {
    /// Fetches the stored role for the given email. Returns `None` if there is no user with that email.
    async fn fetch_role_for_email(&self, email: &str) -> Result<Option<Role>, AuthApiError>;
}
