//! Unifies API for the user directory.
use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewUser, Registration, Role, UserRecord},
    helpers::validate_email,
    traits::{UserApiError, UserManagement},
};

pub struct UserApi<B> {
    db: B,
}

impl<B: Debug> Debug for UserApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UserApi ({:?})", self.db)
    }
}

impl<B> UserApi<B>
where B: UserManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Registers a new user. Registering an email that already exists is not an error: the stored record is left
    /// untouched and [`Registration::AlreadyExists`] is returned.
    pub async fn register(&self, user: NewUser) -> Result<Registration, UserApiError> {
        validate_email(&user.email).map_err(UserApiError::InvalidUser)?;
        let result = self.db.insert_user_if_absent(user.clone()).await?;
        match result {
            Registration::Created(id) => info!("🧑️ New user {} registered with id {id}", user.email),
            Registration::AlreadyExists => debug!("🧑️ User {} already exists. Nothing to do.", user.email),
        }
        Ok(result)
    }

    pub async fn user_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserApiError> {
        self.db.fetch_user_by_email(email).await
    }

    /// All users other than `email`. Used by admins to manage everyone else.
    pub async fn users_except(&self, email: &str) -> Result<Vec<UserRecord>, UserApiError> {
        self.db.fetch_users_except(email).await
    }

    /// Changes a user's role. This is an operator action and is not exposed over HTTP.
    pub async fn assign_role(&self, email: &str, role: Role) -> Result<bool, UserApiError> {
        let updated = self.db.assign_role(email, role).await?;
        if updated {
            info!("🧑️ {email} now has the {role} role");
        } else {
            warn!("🧑️ Cannot assign {role} to {email}. No such user.");
        }
        Ok(updated)
    }
}
