mod auth;
mod brand_profile;
mod generate;
mod ideas;
mod settings;
mod users;

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request, State},
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use phasee_generate::IdeaGenerator;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// `None` when no provider key is configured.
    pub generator: Option<Arc<IdeaGenerator>>,
    pub password_salt: Arc<str>,
}

/// Error response: a status-mapped code plus the `{ "error": message }` body.
#[derive(Debug)]
pub struct ApiError {
    code: &'static str,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    ok: bool,
    timestamp: DateTime<Utc>,
    database: &'static str,
}

impl ApiError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("not_found", message)
    }

    pub fn status(&self) -> StatusCode {
        match self.code {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (
            self.status(),
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// JSON body extractor whose rejections use the `{ "error": .. }` shape.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(&rejection)),
        }
    }
}

fn json_rejection(rejection: &JsonRejection) -> ApiError {
    ApiError::new("bad_request", rejection.body_text())
}

pub(super) fn map_db_error(request_id: &str, error: &phasee_db::DbError) -> ApiError {
    tracing::error!(request_id, error = %error, "database query failed");
    ApiError::new("internal_error", "database query failed")
}

/// Like [`map_db_error`], but a unique violation becomes a 409 with `message`.
pub(super) fn map_unique_violation(
    request_id: &str,
    error: &phasee_db::DbError,
    message: &str,
) -> ApiError {
    if error.is_unique_violation() {
        return ApiError::new("conflict", message);
    }
    map_db_error(request_id, error)
}

/// Treat absent and whitespace-only strings alike.
pub(super) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

fn api_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route(
            "/api/users/{user_id}",
            get(users::get_user).put(users::update_user),
        )
        .route("/api/brand-profile", post(brand_profile::save_profile))
        .route(
            "/api/brand-profile/{user_id}",
            get(brand_profile::get_profile),
        )
        .route("/api/settings", post(settings::save_setting))
        .route("/api/settings/{user_id}", get(settings::list_settings))
        .route("/api/generate", post(generate::generate_ideas))
        .route("/api/optimize", post(generate::optimize_post))
        .route(
            "/api/ideas",
            get(ideas::list_all_ideas).post(ideas::save_idea),
        )
        .route("/api/ideas/{user_id}", get(ideas::list_user_ideas))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(api_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    match phasee_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthData {
                ok: true,
                timestamp: Utc::now(),
                database: "ok",
            }),
        ),
        Err(e) => {
            tracing::warn!(request_id = %req_id.0, error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthData {
                    ok: false,
                    timestamp: Utc::now(),
                    database: "unavailable",
                }),
            )
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
