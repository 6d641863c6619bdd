//! Database operations for the `user_settings` table.
//!
//! Values are stored as text; see [`phasee_core::settings`] for the encoding.

use sqlx::PgPool;

use crate::{new_id, DbError};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SettingRow {
    pub setting_key: String,
    pub setting_value: Option<String>,
}

/// Insert or replace the value stored under `(user_id, key)`.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn upsert_setting(
    pool: &PgPool,
    user_id: &str,
    key: &str,
    value: &str,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO user_settings (id, user_id, setting_key, setting_value, updated_at) \
         VALUES ($1, $2, $3, $4, NOW()) \
         ON CONFLICT (user_id, setting_key) DO UPDATE SET \
           setting_value = EXCLUDED.setting_value, \
           updated_at    = NOW()",
    )
    .bind(new_id())
    .bind(user_id)
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;
    Ok(())
}

/// All settings for a user, ordered by key.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn list_settings(pool: &PgPool, user_id: &str) -> Result<Vec<SettingRow>, DbError> {
    Ok(sqlx::query_as::<_, SettingRow>(
        "SELECT setting_key, setting_value FROM user_settings \
         WHERE user_id = $1 ORDER BY setting_key",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}
