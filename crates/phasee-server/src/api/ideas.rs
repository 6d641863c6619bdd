use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::NaiveDate;
use phasee_core::{parse_iso_date, Platform};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, non_blank, ApiError, ApiJson, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SaveIdeaRequest {
    pub id: Option<String>,
    #[serde(default)]
    pub visual: String,
    #[serde(default)]
    pub copy: String,
    #[serde(default)]
    pub why: String,
    pub assigned_date: Option<String>,
    pub platform: Option<String>,
    #[serde(default)]
    pub accepted: bool,
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct SaveIdeaResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct IdeaItem {
    pub id: String,
    pub visual: String,
    pub copy: String,
    pub why: String,
    pub assigned_date: Option<NaiveDate>,
    pub platform: Option<String>,
    pub accepted: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct IdeasResponse {
    pub ideas: Vec<IdeaItem>,
}

fn parse_assigned_date(raw: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    non_blank(raw)
        .map(parse_iso_date)
        .transpose()
        .map_err(|e| ApiError::validation(e.to_string()))
}

fn parse_platform(raw: Option<&str>) -> Result<Option<Platform>, ApiError> {
    non_blank(raw)
        .map(str::parse::<Platform>)
        .transpose()
        .map_err(|e| ApiError::validation(e.to_string()))
}

/// POST /api/ideas: upsert by id.
pub(super) async fn save_idea(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    ApiJson(body): ApiJson<SaveIdeaRequest>,
) -> Result<Json<SaveIdeaResponse>, ApiError> {
    let id = non_blank(body.id.as_deref()).ok_or_else(|| ApiError::validation("Missing id"))?;
    let assigned_date = parse_assigned_date(body.assigned_date.as_deref())?;
    let platform = parse_platform(body.platform.as_deref())?;

    phasee_db::upsert_idea(
        &state.pool,
        &phasee_db::NewIdea {
            id,
            visual: &body.visual,
            copy: &body.copy,
            why: &body.why,
            assigned_date,
            platform: platform.map(Platform::as_str),
            accepted: body.accepted,
            user_id: non_blank(body.user_id.as_deref()),
        },
    )
    .await
    .map_err(|e| map_db_error(&req_id.0, &e))?;

    Ok(Json(SaveIdeaResponse { ok: true }))
}

/// GET /api/ideas
pub(super) async fn list_all_ideas(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<IdeasResponse>, ApiError> {
    list_accepted(&state, &req_id, None).await
}

/// GET /api/ideas/{user_id}
pub(super) async fn list_user_ideas(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(user_id): Path<String>,
) -> Result<Json<IdeasResponse>, ApiError> {
    list_accepted(&state, &req_id, Some(&user_id)).await
}

async fn list_accepted(
    state: &AppState,
    req_id: &RequestId,
    user_id: Option<&str>,
) -> Result<Json<IdeasResponse>, ApiError> {
    let rows = phasee_db::list_accepted_ideas(&state.pool, user_id)
        .await
        .map_err(|e| map_db_error(&req_id.0, &e))?;

    let ideas = rows
        .into_iter()
        .map(|row| IdeaItem {
            id: row.id,
            visual: row.visual,
            copy: row.copy,
            why: row.why,
            assigned_date: row.assigned_date,
            platform: row.platform,
            accepted: row.accepted,
        })
        .collect();
    Ok(Json(IdeasResponse { ideas }))
}
