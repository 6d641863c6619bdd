use axum::{
    extract::{Path, State},
    Extension, Json,
};
use phasee_core::settings::{decode_setting_value, encode_setting_value};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::middleware::RequestId;

use super::{map_db_error, non_blank, ApiError, ApiJson, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SaveSettingRequest {
    pub user_id: Option<String>,
    pub setting_key: Option<String>,
    #[serde(default)]
    pub setting_value: Value,
}

#[derive(Debug, Serialize)]
pub(super) struct SaveSettingResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub(super) struct SettingsResponse {
    pub settings: Map<String, Value>,
}

/// POST /api/settings
pub(super) async fn save_setting(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    ApiJson(body): ApiJson<SaveSettingRequest>,
) -> Result<Json<SaveSettingResponse>, ApiError> {
    let (Some(user_id), Some(key)) = (
        non_blank(body.user_id.as_deref()),
        non_blank(body.setting_key.as_deref()),
    ) else {
        return Err(ApiError::validation("User ID and setting key required"));
    };

    let stored = encode_setting_value(&body.setting_value);
    phasee_db::upsert_setting(&state.pool, user_id, key, &stored)
        .await
        .map_err(|e| map_db_error(&req_id.0, &e))?;

    Ok(Json(SaveSettingResponse {
        message: "Setting saved successfully",
    }))
}

/// GET /api/settings/{user_id}
pub(super) async fn list_settings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(user_id): Path<String>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let rows = phasee_db::list_settings(&state.pool, &user_id)
        .await
        .map_err(|e| map_db_error(&req_id.0, &e))?;

    let settings = rows
        .into_iter()
        .map(|row| {
            let value = decode_setting_value(row.setting_value.as_deref());
            (row.setting_key, value)
        })
        .collect();
    Ok(Json(SettingsResponse { settings }))
}
