use std::fmt::Debug;

use log::*;

use crate::{
    db_types::Role,
    traits::{AuthApiError, AuthManagement},
};

/// `AuthApi` answers authorization questions about verified identities.
pub struct AuthApi<B> {
    db: B,
}

impl<B: Debug> Debug for AuthApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthApi ({:?})", self.db)
    }
}

impl<B> AuthApi<B>
where B: AuthManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Returns true if the user with the given email currently holds the `Admin` role.
    ///
    /// An unknown email is not an error; it is simply not an admin.
    pub async fn is_admin(&self, email: &str) -> Result<bool, AuthApiError> {
        let role = self.db.fetch_role_for_email(email).await?;
        trace!("🔑️ Stored role for {email}: {role:?}");
        Ok(matches!(role, Some(Role::Admin)))
    }
}
