use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, map_unique_violation, non_blank, ApiError, ApiJson, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UserDetail {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub(super) struct UserResponse {
    pub user: UserDetail,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct MessageResponse {
    pub message: &'static str,
}

/// GET /api/users/{user_id}
pub(super) async fn get_user(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let row = phasee_db::find_active_user(&state.pool, &user_id)
        .await
        .map_err(|e| map_db_error(&req_id.0, &e))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(UserResponse {
        user: UserDetail {
            id: row.id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            created_at: row.created_at,
            last_login_at: row.last_login_at,
        },
    }))
}

/// PUT /api/users/{user_id}: overwrite names; a blank or missing email keeps the current one.
pub(super) async fn update_user(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(user_id): Path<String>,
    ApiJson(body): ApiJson<UpdateUserRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = non_blank(body.email.as_deref()).map(str::to_lowercase);
    let updated = phasee_db::update_user(
        &state.pool,
        &user_id,
        &phasee_db::UserProfileUpdate {
            first_name: body.first_name.as_deref().unwrap_or_default(),
            last_name: body.last_name.as_deref().unwrap_or_default(),
            email: email.as_deref(),
        },
    )
    .await
    .map_err(|e| map_unique_violation(&req_id.0, &e, "Email already exists"))?;

    if !updated {
        return Err(ApiError::not_found("User not found"));
    }
    Ok(Json(MessageResponse {
        message: "User updated successfully",
    }))
}
