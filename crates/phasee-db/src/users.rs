//! Database operations for the `users` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{new_id, DbError};

/// Public columns of a `users` row. The password digest is never included.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// A user row together with its stored password digest, used only for login.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserCredentialsRow {
    #[sqlx(flatten)]
    pub user: UserRow,
    pub password_digest: String,
}

#[derive(Debug, Clone, Copy)]
pub struct NewUser<'a> {
    /// Already lower-cased by the caller.
    pub email: &'a str,
    pub password_digest: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UserProfileUpdate<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    /// `None` keeps the stored email.
    pub email: Option<&'a str>,
}

const USER_COLUMNS: &str = "id, email, first_name, last_name, created_at, last_login_at";

/// Insert a new active user and return it.
///
/// # Errors
///
/// Returns [`DbError`] on query failure; a duplicate email surfaces as a
/// unique violation (see [`DbError::is_unique_violation`]).
pub async fn create_user(pool: &PgPool, new: &NewUser<'_>) -> Result<UserRow, DbError> {
    Ok(sqlx::query_as::<_, UserRow>(&format!(
        "INSERT INTO users (id, email, password_digest, first_name, last_name) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING {USER_COLUMNS}"
    ))
    .bind(new_id())
    .bind(new.email)
    .bind(new.password_digest)
    .bind(new.first_name)
    .bind(new.last_name)
    .fetch_one(pool)
    .await?)
}

/// Look up an active user by id.
///
/// # Errors
///
/// Returns [`DbError`] on query failure.
pub async fn find_active_user(pool: &PgPool, user_id: &str) -> Result<Option<UserRow>, DbError> {
    Ok(sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND is_active = true"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?)
}

/// Fetch an active user and its password digest by (lower-cased) email.
///
/// # Errors
///
/// Returns [`DbError`] on query failure.
pub async fn find_login_user(
    pool: &PgPool,
    email: &str,
) -> Result<Option<UserCredentialsRow>, DbError> {
    Ok(sqlx::query_as::<_, UserCredentialsRow>(&format!(
        "SELECT {USER_COLUMNS}, password_digest FROM users \
         WHERE email = $1 AND is_active = true"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?)
}

/// Stamp `last_login_at` with the current time.
///
/// # Errors
///
/// Returns [`DbError`] on query failure.
pub async fn record_login(pool: &PgPool, user_id: &str) -> Result<(), DbError> {
    sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Update name and email of an active user.
///
/// Returns `false` when no active user has that id.
///
/// # Errors
///
/// Returns [`DbError`] on query failure; an email already used by another
/// account surfaces as a unique violation.
pub async fn update_user(
    pool: &PgPool,
    user_id: &str,
    update: &UserProfileUpdate<'_>,
) -> Result<bool, DbError> {
    let result = sqlx::query(
        "UPDATE users SET \
           first_name = $1, \
           last_name  = $2, \
           email      = COALESCE($3, email) \
         WHERE id = $4 AND is_active = true",
    )
    .bind(update.first_name)
    .bind(update.last_name)
    .bind(update.email)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
