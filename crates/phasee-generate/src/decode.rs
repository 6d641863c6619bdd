//! Typed decoding of provider replies.
//!
//! Models often wrap JSON in a markdown fence or an envelope object, so both
//! are tolerated before decoding.

use phasee_core::IdeaDraft;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DecodeError;

/// Suggested improvements for a single post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Optimization {
    pub visual: String,
    pub copy: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub improvements: String,
}

/// Strip a surrounding markdown code fence (with or without a language tag), if any.
#[must_use]
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening line.
    let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Decode a generation reply into drafts.
///
/// Accepts a bare array or an object with an `ideas` array. An empty reply
/// decodes to no drafts.
///
/// # Errors
///
/// Returns [`DecodeError`] when the reply is not JSON or has another shape.
pub fn decode_drafts(text: &str) -> Result<Vec<IdeaDraft>, DecodeError> {
    let body = strip_code_fences(text);
    if body.is_empty() {
        return Ok(Vec::new());
    }
    let value: Value = serde_json::from_str(body)?;
    let items = match value {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => match map.remove("ideas") {
            Some(ideas @ Value::Array(_)) => ideas,
            _ => return Err(DecodeError::Shape("object reply has no `ideas` array")),
        },
        _ => return Err(DecodeError::Shape("expected a JSON array of ideas")),
    };
    Ok(serde_json::from_value(items)?)
}

/// Decode an optimization reply.
///
/// # Errors
///
/// Returns [`DecodeError`] when the reply is not a JSON object with at
/// least `visual` and `copy`.
pub fn decode_optimization(text: &str) -> Result<Optimization, DecodeError> {
    let body = strip_code_fences(text);
    if body.is_empty() {
        return Err(DecodeError::MissingContent);
    }
    Ok(serde_json::from_str(body)?)
}
