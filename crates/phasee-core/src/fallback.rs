//! Locally templated ideas used when generation is unavailable.

use crate::ideas::IdeaDraft;
use crate::profile::BrandProfile;

const SEED_LEN: usize = 4;

/// Derive a short, stable seed from an idea id.
#[must_use]
pub fn seed_from_id(id: &str) -> String {
    let seed: String = id
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(SEED_LEN)
        .collect::<String>()
        .to_ascii_lowercase();
    if seed.is_empty() {
        "0000".to_string()
    } else {
        seed
    }
}

/// Build a placeholder draft by interpolating profile fields.
///
/// The output depends only on its inputs, so the same idea id always yields
/// the same text.
#[must_use]
pub fn fallback_draft(profile: &BrandProfile, notes: &str, seed: &str) -> IdeaDraft {
    let base = format!(
        "{} • {}",
        or_default(&profile.industry, "Brand"),
        or_default(&profile.tone, "Friendly")
    );
    let caps = [
        (profile.has_photography, "photo"),
        (profile.has_video, "video"),
        (profile.has_design, "graphic"),
    ]
    .into_iter()
    .filter_map(|(enabled, label)| enabled.then_some(label))
    .collect::<Vec<_>>()
    .join("/");

    IdeaDraft {
        visual: format!("Visual: {} {seed}", or_default(&caps, "asset")),
        copy: format!(
            "Copy: {base} - {} ({seed})",
            or_default(notes, "engagement prompt")
        ),
        why: format!(
            "Placeholder built from your {} profile while idea generation is unavailable.",
            or_default(&profile.industry, "brand")
        ),
    }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default
    } else {
        trimmed
    }
}
