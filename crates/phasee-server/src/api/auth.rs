//! Registration and login. No session or token is issued; the client keeps
//! the returned user locally.

use axum::{extract::State, Extension, Json};
use phasee_core::User;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::middleware::RequestId;

use super::{map_db_error, map_unique_violation, non_blank, ApiError, ApiJson, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct AuthResponse {
    pub user: User,
    pub message: &'static str,
}

/// Hex SHA-256 of `salt || password`.
pub(super) fn password_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn public_user(row: phasee_db::UserRow) -> User {
    User {
        id: row.id,
        email: row.email,
        first_name: row.first_name,
        last_name: row.last_name,
    }
}

fn digests_match(stored: &str, candidate: &str) -> bool {
    stored.as_bytes().ct_eq(candidate.as_bytes()).into()
}

fn credentials<'a>(
    email: Option<&'a str>,
    password: Option<&'a str>,
) -> Result<(String, &'a str), ApiError> {
    match (non_blank(email), password.filter(|p| !p.is_empty())) {
        (Some(email), Some(password)) => Ok((email.to_lowercase(), password)),
        _ => Err(ApiError::validation("Email and password required")),
    }
}

/// POST /api/auth/register
pub(super) async fn register(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (email, password) = credentials(body.email.as_deref(), body.password.as_deref())?;
    let digest = password_digest(&state.password_salt, password);

    let row = phasee_db::create_user(
        &state.pool,
        &phasee_db::NewUser {
            email: &email,
            password_digest: &digest,
            first_name: body.first_name.as_deref().unwrap_or_default(),
            last_name: body.last_name.as_deref().unwrap_or_default(),
        },
    )
    .await
    .map_err(|e| map_unique_violation(&req_id.0, &e, "Email already exists"))?;

    tracing::info!(user_id = %row.id, "user registered");
    Ok(Json(AuthResponse {
        user: public_user(row),
        message: "User created successfully",
    }))
}

/// POST /api/auth/login
pub(super) async fn login(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (email, password) = credentials(body.email.as_deref(), body.password.as_deref())?;
    let invalid = || ApiError::new("unauthorized", "Invalid credentials");

    let creds = phasee_db::find_login_user(&state.pool, &email)
        .await
        .map_err(|e| map_db_error(&req_id.0, &e))?
        .ok_or_else(invalid)?;

    let candidate = password_digest(&state.password_salt, password);
    if !digests_match(&creds.password_digest, &candidate) {
        return Err(invalid());
    }

    phasee_db::record_login(&state.pool, &creds.user.id)
        .await
        .map_err(|e| map_db_error(&req_id.0, &e))?;

    Ok(Json(AuthResponse {
        user: public_user(creds.user),
        message: "Login successful",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_salted_hex_sha256() {
        // sha256("saltpassword")
        assert_eq!(
            password_digest("salt", "password"),
            "13601bda4ea78e55a07b98866d2be6be0744e3866f13c00c811cab608a28f322"
        );
        assert_ne!(
            password_digest("other", "password"),
            password_digest("salt", "password")
        );
    }

    #[test]
    fn digest_comparison() {
        let stored = password_digest("s", "hunter2");
        assert!(digests_match(&stored, &password_digest("s", "hunter2")));
        assert!(!digests_match(&stored, &password_digest("s", "hunter3")));
        assert!(!digests_match(&stored, ""));
    }

    #[test]
    fn credentials_require_both_fields_and_lowercase_email() {
        let (email, password) = credentials(Some(" Owner@Crumb.TEST "), Some("pw")).unwrap();
        assert_eq!(email, "owner@crumb.test");
        assert_eq!(password, "pw");

        assert!(credentials(None, Some("pw")).is_err());
        assert!(credentials(Some("a@b.c"), Some("")).is_err());
        assert!(credentials(Some("   "), Some("pw")).is_err());
    }
}
