use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use phasee_core::{GenerationBatch, IdeaDraft};
use phasee_generate::{
    GenerateError, GenerationRequest, IdeaGenerator, Optimization, OptimizeRequest,
};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiJson, AppState};

#[derive(Debug, Serialize)]
pub(super) struct GenerateResponse {
    pub ideas: Vec<IdeaDraft>,
}

fn generator(state: &AppState) -> Result<Arc<IdeaGenerator>, ApiError> {
    state
        .generator
        .clone()
        .ok_or_else(|| ApiError::new("upstream_error", GenerateError::MissingApiKey.to_string()))
}

fn upstream(req_id: &RequestId, error: &GenerateError) -> ApiError {
    tracing::warn!(request_id = %req_id.0, error = %error, "generation provider call failed");
    ApiError::new("upstream_error", error.to_string())
}

/// POST /api/generate
pub(super) async fn generate_ideas(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    ApiJson(body): ApiJson<GenerationRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    if !(1..=GenerationBatch::MAX_IDEAS).contains(&body.count) {
        return Err(ApiError::validation(format!(
            "count must be between 1 and {}",
            GenerationBatch::MAX_IDEAS
        )));
    }
    let generator = generator(&state)?;

    let outcome = generator
        .generate(&body)
        .await
        .map_err(|e| upstream(&req_id, &e))?;

    Ok(Json(GenerateResponse {
        ideas: outcome.into_drafts(),
    }))
}

/// POST /api/optimize
pub(super) async fn optimize_post(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    ApiJson(body): ApiJson<OptimizeRequest>,
) -> Result<Json<Optimization>, ApiError> {
    let generator = generator(&state)?;
    let optimization = generator
        .optimize(&body)
        .await
        .map_err(|e| upstream(&req_id, &e))?;
    Ok(Json(optimization))
}
