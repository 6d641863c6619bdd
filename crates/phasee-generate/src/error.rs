use thiserror::Error;

/// Errors returned by the generation client and service.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// No provider key was configured.
    #[error("Missing OPENAI_API_KEY")]
    MissingApiKey,

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The provider reply did not have the expected shape.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// A provider reply that could not be turned into typed output.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("reply has no message content")]
    MissingContent,

    #[error("reply is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected reply shape: {0}")]
    Shape(&'static str),
}
