use thiserror::Error;

use crate::db_types::{NewUser, Registration, Role, UserRecord};

#[derive(Debug, Clone, Error)]
pub enum UserApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Invalid user record: {0}")]
    InvalidUser(String),
}

impl From<sqlx::Error> for UserApiError {
    fn from(e: sqlx::Error) -> Self {
        UserApiError::DatabaseError(e.to_string())
    }
}

/// The user directory. Users are keyed by their (unique) email address.
#[allow(async_fn_in_trait)]
pub trait UserManagement {
    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserApiError>;

    /// Inserts a new user with the `Customer` role, unless a user with the same email already exists. An existing
    /// record is never modified; in particular its role is left untouched.
    async fn insert_user_if_absent(&self, user: NewUser) -> Result<Registration, UserApiError>;

    /// Fetches every user record except the one belonging to `email`.
    async fn fetch_users_except(&self, email: &str) -> Result<Vec<UserRecord>, UserApiError>;

    /// Sets the role for the user with the given email. Returns `false` if no such user exists.
    async fn assign_role(&self, email: &str, role: Role) -> Result<bool, UserApiError>;
}
