//! Sqlite database operations for the user directory.
//!
//! Generally clients should never call these methods directly, and prefer to use the [`UserManagement`] and
//! [`AuthManagement`] trait methods that are implemented on the [`SqliteDatabase`] struct instead.
use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewUser, Registration, Role, UserRecord},
    traits::UserApiError,
};

pub async fn fetch_user_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<UserRecord>, UserApiError> {
    let user = sqlx::query_as("SELECT * FROM users WHERE email = $1").bind(email).fetch_optional(conn).await?;
    Ok(user)
}

pub async fn fetch_role_for_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<Role>, sqlx::Error> {
    let role: Option<(Role,)> =
        sqlx::query_as("SELECT role FROM users WHERE email = $1").bind(email).fetch_optional(conn).await?;
    Ok(role.map(|r| r.0))
}

/// Inserts the user with the `Customer` role if the email is not already registered. The check and the insert happen
/// in one statement, so two concurrent registrations for the same email cannot both succeed.
pub async fn insert_user_if_absent(user: NewUser, conn: &mut SqliteConnection) -> Result<Registration, UserApiError> {
    let result = sqlx::query(
        r#"INSERT INTO users (email, name, photo, role) VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO NOTHING"#,
    )
    .bind(&user.email)
    .bind(user.name)
    .bind(user.photo)
    .bind(Role::Customer)
    .execute(conn)
    .await?;
    if result.rows_affected() == 0 {
        trace!("🧑️ {} is already registered", user.email);
        Ok(Registration::AlreadyExists)
    } else {
        let id = result.last_insert_rowid();
        debug!("🧑️ {} inserted with id {id}", user.email);
        Ok(Registration::Created(id))
    }
}

pub async fn fetch_users_except(email: &str, conn: &mut SqliteConnection) -> Result<Vec<UserRecord>, UserApiError> {
    let users = sqlx::query_as("SELECT * FROM users WHERE email != $1 ORDER BY id").bind(email).fetch_all(conn).await?;
    Ok(users)
}

pub async fn assign_role(email: &str, role: Role, conn: &mut SqliteConnection) -> Result<bool, UserApiError> {
    let result = sqlx::query("UPDATE users SET role = $1 WHERE email = $2").bind(role).bind(email).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count_users(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users").fetch_one(conn).await?;
    Ok(count)
}
