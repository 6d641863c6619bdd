//! Database operations for the `ideas` table.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `ideas` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IdeaRow {
    pub id: String,
    pub visual: String,
    pub copy: String,
    pub why: String,
    pub assigned_date: Option<NaiveDate>,
    pub platform: Option<String>,
    pub accepted: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for [`upsert_idea`]. Every field except `id` is overwritten on conflict.
#[derive(Debug, Clone, Copy)]
pub struct NewIdea<'a> {
    pub id: &'a str,
    pub visual: &'a str,
    pub copy: &'a str,
    pub why: &'a str,
    pub assigned_date: Option<NaiveDate>,
    pub platform: Option<&'a str>,
    pub accepted: bool,
    pub user_id: Option<&'a str>,
}

/// Insert an idea, or replace every named field of the existing row with the same id.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn upsert_idea(pool: &PgPool, idea: &NewIdea<'_>) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO ideas (id, visual, copy, why, assigned_date, platform, accepted, user_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         ON CONFLICT (id) DO UPDATE SET \
           visual        = EXCLUDED.visual, \
           copy          = EXCLUDED.copy, \
           why           = EXCLUDED.why, \
           assigned_date = EXCLUDED.assigned_date, \
           platform      = EXCLUDED.platform, \
           accepted      = EXCLUDED.accepted, \
           user_id       = EXCLUDED.user_id",
    )
    .bind(idea.id)
    .bind(idea.visual)
    .bind(idea.copy)
    .bind(idea.why)
    .bind(idea.assigned_date)
    .bind(idea.platform)
    .bind(idea.accepted)
    .bind(idea.user_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Accepted ideas ordered by assigned date then creation time, optionally for one user.
///
/// Undated rows sort first.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn list_accepted_ideas(
    pool: &PgPool,
    user_id: Option<&str>,
) -> Result<Vec<IdeaRow>, DbError> {
    Ok(sqlx::query_as::<_, IdeaRow>(
        "SELECT id, visual, copy, why, assigned_date, platform, accepted, created_at \
         FROM ideas \
         WHERE accepted = true AND ($1::text IS NULL OR user_id = $1) \
         ORDER BY assigned_date ASC NULLS FIRST, created_at ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}
