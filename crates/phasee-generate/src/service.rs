use phasee_core::{AppConfig, IdeaDraft};

use crate::client::CompletionClient;
use crate::decode::{decode_drafts, decode_optimization, Optimization};
use crate::error::{DecodeError, GenerateError};
use crate::prompt::{generation_prompt, optimize_prompt, GenerationRequest, OptimizeRequest};

pub const GENERATION_TEMPERATURE: f32 = 0.9;
pub const OPTIMIZE_TEMPERATURE: f32 = 0.7;

/// Result of a generation call that reached the provider.
#[derive(Debug)]
pub enum GenerationOutcome {
    Ideas(Vec<IdeaDraft>),
    /// The provider answered but the reply was not a list of ideas.
    Unparseable(DecodeError),
}

impl GenerationOutcome {
    /// Drafts to return to the caller. An unparseable reply yields none.
    #[must_use]
    pub fn into_drafts(self) -> Vec<IdeaDraft> {
        match self {
            GenerationOutcome::Ideas(drafts) => drafts,
            GenerationOutcome::Unparseable(error) => {
                tracing::warn!(error = %error, "generation reply could not be decoded; returning no ideas");
                Vec::new()
            }
        }
    }
}

/// Prompt building, provider call and reply decoding in one place.
pub struct IdeaGenerator {
    client: CompletionClient,
}

impl IdeaGenerator {
    #[must_use]
    pub fn new(client: CompletionClient) -> Self {
        Self { client }
    }

    /// Build a generator from application config. Returns `Ok(None)` when no
    /// provider key is configured.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] if the HTTP client cannot be built or the
    /// base URL is invalid.
    pub fn from_app_config(config: &AppConfig) -> Result<Option<Self>, GenerateError> {
        let Some(api_key) = config.openai_api_key.as_deref() else {
            return Ok(None);
        };
        let client = CompletionClient::with_base_url(
            api_key,
            &config.llm_model,
            config.llm_timeout_secs,
            &config.llm_base_url,
        )?;
        Ok(Some(Self::new(client)))
    }

    /// Ask the provider for post ideas.
    ///
    /// The count is not repaired here: the outcome carries exactly what the
    /// provider produced.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] on transport or provider failure. A reply
    /// that cannot be decoded is not an error; see [`GenerationOutcome`].
    pub async fn generate(
        &self,
        req: &GenerationRequest,
    ) -> Result<GenerationOutcome, GenerateError> {
        let prompt = generation_prompt(req);
        let reply = match self.client.complete(&prompt, GENERATION_TEMPERATURE).await {
            Ok(reply) => reply,
            Err(GenerateError::Decode(error)) => return Ok(GenerationOutcome::Unparseable(error)),
            Err(error) => return Err(error),
        };

        let outcome = match decode_drafts(&reply) {
            Ok(drafts) => GenerationOutcome::Ideas(drafts),
            Err(error) => GenerationOutcome::Unparseable(error),
        };
        if let GenerationOutcome::Ideas(drafts) = &outcome {
            tracing::debug!(
                model = self.client.model(),
                requested = req.count,
                received = drafts.len(),
                "generation completed"
            );
        }
        Ok(outcome)
    }

    /// Ask the provider to improve one post.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] on transport or provider failure, and
    /// [`GenerateError::Decode`] when the reply is malformed.
    pub async fn optimize(&self, req: &OptimizeRequest) -> Result<Optimization, GenerateError> {
        let prompt = optimize_prompt(req);
        let reply = self.client.complete(&prompt, OPTIMIZE_TEMPERATURE).await?;
        Ok(decode_optimization(&reply)?)
    }
}
