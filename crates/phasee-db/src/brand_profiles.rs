//! Database operations for the `brand_profiles` table.

use chrono::{DateTime, Utc};
use phasee_core::BrandProfile;
use sqlx::PgPool;

use crate::{new_id, DbError};

/// A row from the `brand_profiles` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BrandProfileRow {
    pub id: String,
    pub user_id: String,
    pub brand_name: String,
    pub year_founded: String,
    pub industry: String,
    pub audience: String,
    pub tone: String,
    pub has_photography: bool,
    pub has_video: bool,
    pub has_design: bool,
    pub company_description: String,
    pub brand_culture: String,
    pub content_goals: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of [`save_brand_profile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedProfile {
    pub profile_id: String,
    /// `true` when a new row was inserted, `false` when existing rows were updated.
    pub created: bool,
}

/// Save a user's brand profile.
///
/// When the user already has profile rows, every one of them is overwritten
/// and the most recently updated id is returned. Otherwise a new row is
/// inserted. Missing optional text fields are stored as empty strings.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn save_brand_profile(
    pool: &PgPool,
    user_id: &str,
    profile: &BrandProfile,
) -> Result<SavedProfile, DbError> {
    let existing = sqlx::query_scalar::<_, String>(
        "SELECT id FROM brand_profiles WHERE user_id = $1 ORDER BY updated_at DESC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    let optional = |value: &Option<String>| value.clone().unwrap_or_default();

    if let Some(profile_id) = existing {
        sqlx::query(
            "UPDATE brand_profiles SET \
               brand_name = $1, year_founded = $2, industry = $3, audience = $4, tone = $5, \
               has_photography = $6, has_video = $7, has_design = $8, \
               company_description = $9, brand_culture = $10, content_goals = $11, \
               updated_at = NOW() \
             WHERE user_id = $12",
        )
        .bind(&profile.brand_name)
        .bind(&profile.year_founded)
        .bind(&profile.industry)
        .bind(&profile.audience)
        .bind(&profile.tone)
        .bind(profile.has_photography)
        .bind(profile.has_video)
        .bind(profile.has_design)
        .bind(optional(&profile.company_description))
        .bind(optional(&profile.brand_culture))
        .bind(optional(&profile.content_goals))
        .bind(user_id)
        .execute(pool)
        .await?;
        return Ok(SavedProfile {
            profile_id,
            created: false,
        });
    }

    let profile_id = new_id();
    sqlx::query(
        "INSERT INTO brand_profiles \
           (id, user_id, brand_name, year_founded, industry, audience, tone, \
            has_photography, has_video, has_design, company_description, brand_culture, \
            content_goals) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
    )
    .bind(&profile_id)
    .bind(user_id)
    .bind(&profile.brand_name)
    .bind(&profile.year_founded)
    .bind(&profile.industry)
    .bind(&profile.audience)
    .bind(&profile.tone)
    .bind(profile.has_photography)
    .bind(profile.has_video)
    .bind(profile.has_design)
    .bind(optional(&profile.company_description))
    .bind(optional(&profile.brand_culture))
    .bind(optional(&profile.content_goals))
    .execute(pool)
    .await?;

    Ok(SavedProfile {
        profile_id,
        created: true,
    })
}

/// Most recently updated brand profile for a user, if any.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn latest_brand_profile(
    pool: &PgPool,
    user_id: &str,
) -> Result<Option<BrandProfileRow>, DbError> {
    Ok(sqlx::query_as::<_, BrandProfileRow>(
        "SELECT id, user_id, brand_name, year_founded, industry, audience, tone, \
                has_photography, has_video, has_design, company_description, \
                brand_culture, content_goals, created_at, updated_at \
         FROM brand_profiles WHERE user_id = $1 \
         ORDER BY updated_at DESC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?)
}
