//! Post-idea generation against an OpenAI-compatible chat-completions API.

pub mod client;
pub mod decode;
pub mod error;
pub mod prompt;
pub mod service;

pub use client::{CompletionClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use decode::{decode_drafts, decode_optimization, strip_code_fences, Optimization};
pub use error::{DecodeError, GenerateError};
pub use prompt::{
    generation_prompt, optimize_prompt, Complexity, GenerationRequest, OptimizeRequest,
    DEFAULT_IDEA_COUNT,
};
pub use service::{GenerationOutcome, IdeaGenerator};
