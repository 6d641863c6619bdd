pub mod app_config;
pub mod board;
pub mod calendar;
pub mod config;
pub mod export;
pub mod fallback;
pub mod ideas;
pub mod plans;
pub mod profile;
pub mod repository;
pub mod scheduling;
pub mod settings;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use board::{BoardError, GenerationBatch, IdeaBoard};
pub use config::{load_app_config, load_app_config_from_env};
pub use ideas::{Idea, IdeaDraft, IdeaState, Platform};
pub use plans::PlanKey;
pub use profile::{BrandProfile, User};
pub use repository::{FileStorage, LocalRepository, MemoryStorage, SessionStorage};
pub use scheduling::{choose_acceptance_date, DateSelection};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid platform: {0}")]
    InvalidPlatform(String),

    #[error("invalid plan: {0}")]
    InvalidPlan(String),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("local storage I/O error at {path}: {source}")]
    StorageIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("local storage value for '{key}' is not valid JSON: {source}")]
    StorageDecode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse an ISO `YYYY-MM-DD` date string.
///
/// # Errors
///
/// Returns [`CoreError::InvalidDate`] when the input is not a calendar date.
pub fn parse_iso_date(raw: &str) -> Result<chrono::NaiveDate, CoreError> {
    chrono::NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| CoreError::InvalidDate(raw.to_string()))
}
