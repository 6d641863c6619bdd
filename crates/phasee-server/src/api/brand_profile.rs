use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use phasee_core::BrandProfile;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, non_blank, ApiError, ApiJson, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SaveProfileRequest {
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub profile: BrandProfile,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SaveProfileResponse {
    pub message: &'static str,
    pub profile_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ProfileDetail {
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

impl From<phasee_db::BrandProfileRow> for ProfileDetail {
    fn from(row: phasee_db::BrandProfileRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            brand_name: row.brand_name,
            year_founded: row.year_founded,
            industry: row.industry,
            audience: row.audience,
            tone: row.tone,
            has_photography: row.has_photography,
            has_video: row.has_video,
            has_design: row.has_design,
            company_description: row.company_description,
            brand_culture: row.brand_culture,
            content_goals: row.content_goals,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct ProfileResponse {
    pub profile: ProfileDetail,
}

/// POST /api/brand-profile
pub(super) async fn save_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    ApiJson(body): ApiJson<SaveProfileRequest>,
) -> Result<Json<SaveProfileResponse>, ApiError> {
    let user_id = non_blank(body.user_id.as_deref())
        .ok_or_else(|| ApiError::validation("User ID required"))?;

    let saved = phasee_db::save_brand_profile(&state.pool, user_id, &body.profile)
        .await
        .map_err(|e| map_db_error(&req_id.0, &e))?;

    let message = if saved.created {
        "Brand profile created successfully"
    } else {
        "Brand profile updated successfully"
    };
    Ok(Json(SaveProfileResponse {
        message,
        profile_id: saved.profile_id,
    }))
}

/// GET /api/brand-profile/{user_id}
pub(super) async fn get_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let row = phasee_db::latest_brand_profile(&state.pool, &user_id)
        .await
        .map_err(|e| map_db_error(&req_id.0, &e))?
        .ok_or_else(|| ApiError::not_found("Brand profile not found"))?;

    Ok(Json(ProfileResponse {
        profile: row.into(),
    }))
}
