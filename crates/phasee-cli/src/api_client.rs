//! Typed client for the phasee HTTP API.
//!
//! Every endpoint replies with a bare JSON payload on success and
//! `{ "error": message }` on failure; failures surface as
//! [`ApiClientError::Status`] carrying that message.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use phasee_core::{BrandProfile, Idea, IdeaDraft, Platform, User};
use phasee_generate::{GenerationRequest, Optimization, OptimizeRequest};
use reqwest::{Client, Response, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid API URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthReply {
    pub user: User,
    pub message: String,
}

/// Account details as returned by `GET /api/users/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedProfile {
    pub profile_id: String,
}

/// An accepted idea as stored on the server.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteIdea {
    pub id: String,
    pub visual: String,
    pub copy: String,
    pub assigned_date: Option<NaiveDate>,
    pub platform: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfilePayload<'a> {
    user_id: &'a str,
    #[serde(flatten)]
    profile: &'a BrandProfile,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdeaPayload<'a> {
    id: &'a str,
    visual: &'a str,
    copy: &'a str,
    why: &'a str,
    assigned_date: Option<NaiveDate>,
    platform: Platform,
    accepted: bool,
    user_id: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SettingPayload<'a> {
    user_id: &'a str,
    setting_key: &'a str,
    setting_value: &'a Value,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct MessageReply {
    message: String,
}

#[derive(Deserialize)]
struct UserReply {
    user: Account,
}

#[derive(Deserialize)]
struct ProfileReply {
    profile: BrandProfile,
}

#[derive(Deserialize)]
struct IdeasReply<T> {
    ideas: Vec<T>,
}

#[derive(Deserialize)]
struct SettingsReply {
    settings: Map<String, Value>,
}

/// Health report from `GET /api/health`.
#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub ok: bool,
    pub timestamp: DateTime<Utc>,
    pub database: String,
}

pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns [`ApiClientError::InvalidBaseUrl`] when `base_url` does not
    /// parse, or [`ApiClientError::Http`] if the client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ApiClientError> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized).map_err(|e| ApiClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> Result<Url, ApiClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiClientError::InvalidBaseUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiClientError> {
        let response = self.client.get(self.url(path)?).send().await?;
        decode(response).await
    }

    async fn post_json<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ApiClientError> {
        let response = self.client.post(self.url(path)?).json(body).send().await?;
        decode(response).await
    }

    /// # Errors
    ///
    /// Fails on transport errors and non-2xx replies.
    pub async fn health(&self) -> Result<Health, ApiClientError> {
        let response = self.client.get(self.url("api/health")?).send().await?;
        // 503 still carries a health body.
        if response.status() == reqwest::StatusCode::SERVICE_UNAVAILABLE {
            return Ok(response.json().await?);
        }
        decode(response).await
    }

    /// # Errors
    ///
    /// Fails on transport errors and non-2xx replies (409 for a taken email).
    pub async fn register(&self, registration: &Registration) -> Result<AuthReply, ApiClientError> {
        self.post_json("api/auth/register", registration).await
    }

    /// # Errors
    ///
    /// Fails on transport errors and non-2xx replies (401 for bad credentials).
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthReply, ApiClientError> {
        self.post_json("api/auth/login", &Credentials { email, password })
            .await
    }

    /// # Errors
    ///
    /// Fails on transport errors and non-2xx replies (404 for unknown users).
    pub async fn get_user(&self, user_id: &str) -> Result<Account, ApiClientError> {
        let reply: UserReply = self.get_json(&format!("api/users/{user_id}")).await?;
        Ok(reply.user)
    }

    /// # Errors
    ///
    /// Fails on transport errors and non-2xx replies.
    pub async fn update_user(
        &self,
        user_id: &str,
        update: &AccountUpdate,
    ) -> Result<String, ApiClientError> {
        let response = self
            .client
            .put(self.url(&format!("api/users/{user_id}"))?)
            .json(update)
            .send()
            .await?;
        let reply: MessageReply = decode(response).await?;
        Ok(reply.message)
    }

    /// # Errors
    ///
    /// Fails on transport errors and non-2xx replies.
    pub async fn save_brand_profile(
        &self,
        user_id: &str,
        profile: &BrandProfile,
    ) -> Result<SavedProfile, ApiClientError> {
        self.post_json("api/brand-profile", &ProfilePayload { user_id, profile })
            .await
    }

    /// # Errors
    ///
    /// Fails on transport errors and non-2xx replies (404 when no profile exists).
    pub async fn get_brand_profile(&self, user_id: &str) -> Result<BrandProfile, ApiClientError> {
        let reply: ProfileReply = self
            .get_json(&format!("api/brand-profile/{user_id}"))
            .await?;
        Ok(reply.profile)
    }

    /// Upsert an idea by id.
    ///
    /// # Errors
    ///
    /// Fails on transport errors and non-2xx replies.
    pub async fn save_idea(
        &self,
        idea: &Idea,
        user_id: Option<&str>,
    ) -> Result<(), ApiClientError> {
        let payload = IdeaPayload {
            id: &idea.id,
            visual: &idea.visual,
            copy: &idea.copy,
            why: &idea.why,
            assigned_date: idea.assigned_date,
            platform: idea.platform,
            accepted: idea.accepted,
            user_id,
        };
        let _: Value = self.post_json("api/ideas", &payload).await?;
        Ok(())
    }

    /// Accepted ideas stored on the server, for one user or everyone.
    ///
    /// # Errors
    ///
    /// Fails on transport errors and non-2xx replies.
    pub async fn list_ideas(
        &self,
        user_id: Option<&str>,
    ) -> Result<Vec<RemoteIdea>, ApiClientError> {
        let path = match user_id {
            Some(id) => format!("api/ideas/{id}"),
            None => "api/ideas".to_string(),
        };
        let reply: IdeasReply<RemoteIdea> = self.get_json(&path).await?;
        Ok(reply.ideas)
    }

    /// # Errors
    ///
    /// Fails on transport errors and non-2xx replies.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<IdeaDraft>, ApiClientError> {
        let reply: IdeasReply<IdeaDraft> = self.post_json("api/generate", request).await?;
        Ok(reply.ideas)
    }

    /// # Errors
    ///
    /// Fails on transport errors and non-2xx replies.
    pub async fn optimize(
        &self,
        request: &OptimizeRequest,
    ) -> Result<Optimization, ApiClientError> {
        self.post_json("api/optimize", request).await
    }

    /// # Errors
    ///
    /// Fails on transport errors and non-2xx replies.
    pub async fn save_setting(
        &self,
        user_id: &str,
        key: &str,
        value: &Value,
    ) -> Result<String, ApiClientError> {
        let reply: MessageReply = self
            .post_json(
                "api/settings",
                &SettingPayload {
                    user_id,
                    setting_key: key,
                    setting_value: value,
                },
            )
            .await?;
        Ok(reply.message)
    }

    /// # Errors
    ///
    /// Fails on transport errors and non-2xx replies.
    pub async fn list_settings(&self, user_id: &str) -> Result<Map<String, Value>, ApiClientError> {
        let reply: SettingsReply = self.get_json(&format!("api/settings/{user_id}")).await?;
        Ok(reply.settings)
    }
}

async fn decode<R: DeserializeOwned>(response: Response) -> Result<R, ApiClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => format!("HTTP {status}"),
    };
    Err(ApiClientError::Status {
        status: status.as_u16(),
        message,
    })
}
