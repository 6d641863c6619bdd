//! Request types and prompt construction for generation and optimization.

use std::fmt::Write as _;

use chrono::NaiveDate;
use phasee_core::{BrandProfile, Platform};
use serde::{Deserialize, Serialize};

pub const DEFAULT_IDEA_COUNT: usize = 3;

/// How involved a single regenerated idea should be to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Standard,
    Elaborate,
}

impl Complexity {
    fn guidance(self) -> &'static str {
        match self {
            Complexity::Simple => {
                "Keep production minimal: one shot or one graphic, made in a few minutes."
            }
            Complexity::Standard => {
                "Aim for a typical post: a short sequence or a polished single visual."
            }
            Complexity::Elaborate => {
                "A richer concept is welcome: carousel, short video or a multi-step setup."
            }
        }
    }
}

impl std::str::FromStr for Complexity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Complexity::Simple),
            "standard" => Ok(Complexity::Standard),
            "elaborate" => Ok(Complexity::Elaborate),
            other => Err(format!("unknown complexity '{other}'")),
        }
    }
}

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default)]
    pub profile: BrandProfile,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default)]
    pub campaign: bool,
    #[serde(default)]
    pub source_dates: Vec<NaiveDate>,
    #[serde(default = "default_grounded")]
    pub grounded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            profile: BrandProfile::default(),
            notes: String::new(),
            count: DEFAULT_IDEA_COUNT,
            campaign: false,
            source_dates: Vec::new(),
            grounded: true,
            complexity: None,
        }
    }
}

fn default_count() -> usize {
    DEFAULT_IDEA_COUNT
}

fn default_grounded() -> bool {
    true
}

/// Body of `POST /api/optimize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    #[serde(default)]
    pub visual: String,
    #[serde(default)]
    pub copy: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<BrandProfile>,
}

/// Build the instruction block for idea generation.
#[must_use]
pub fn generation_prompt(req: &GenerationRequest) -> String {
    let count = req.count;
    let profile = &req.profile;
    let capabilities = profile.capabilities();
    let capabilities = if capabilities.is_empty() {
        "basic visuals".to_string()
    } else {
        capabilities.join(", ")
    };
    let notes = if req.notes.trim().is_empty() {
        "No specific notes provided"
    } else {
        req.notes.trim()
    };

    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "You are a creative social media strategist. Generate exactly {count} DIVERSE and \
         UNIQUE social media post ideas. Each idea must be clearly different from the others.\n"
    );
    let _ = writeln!(prompt, "BRAND PROFILE:\n{}\n", pretty_json(profile));
    let _ = writeln!(prompt, "ADDITIONAL NOTES: {notes}\n");

    let _ = writeln!(prompt, "CORE REQUIREMENTS:");
    let _ = writeln!(
        prompt,
        "- Match the brand's tone and industry\n\
         - Consider the target audience: {}\n\
         - Align with content goals: {}\n\
         - Suggest visuals that fit the available capabilities: {capabilities}\n",
        profile.audience_or_default(),
        profile.content_goals_or_default(),
    );

    prompt.push_str(
        "DIVERSITY REQUIREMENTS (CRITICAL):\n\
         - Each idea uses a DIFFERENT content format (educational, behind-the-scenes, \
         user-generated, testimonial, product showcase, storytelling, trending topic, \
         seasonal, community, question/poll)\n\
         - Vary the emotional tone across ideas (inspirational, humorous, informative, \
         nostalgic, urgent, celebratory)\n\
         - Use different visual styles (close-up, wide shot, flat lay, action shot, \
         before/after, carousel, video, graphic)\n\
         - Target different stages of the customer journey (awareness, consideration, \
         purchase, retention, advocacy)\n\
         - No repeated themes, near-identical setups or redundant messaging\n\
         - Each post serves its own strategic purpose\n\n",
    );

    if req.grounded {
        prompt.push_str(
            "PRACTICAL CONSTRAINTS:\n\
             - Favor realistic, low or no-cost ideas achievable with a smartphone and common items\n\
             - Avoid specialized equipment, studios, actors or complex locations\n\
             - Keep execution simple and quick\n\
             - Each idea specifies a simple, phone-friendly visual setup\n\n",
        );
    }

    if req.campaign {
        let dates = if req.source_dates.is_empty() {
            "multiple selected dates".to_string()
        } else {
            req.source_dates
                .iter()
                .map(NaiveDate::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        let _ = writeln!(
            prompt,
            "CAMPAIGN COHERENCE:\n\
             - Treat these posts as one cohesive campaign across: {dates}\n\
             - Keep a narrative thread or thematic connection between posts\n\
             - Vary angles while keeping a unifying theme (same launch, event or message)\n\
             - Each idea connects to the campaign goal while staying distinct\n"
        );
    }

    if let Some(complexity) = req.complexity {
        let _ = writeln!(prompt, "PRODUCTION EFFORT:\n- {}\n", complexity.guidance());
    }

    prompt.push_str(
        "QUALITY STANDARDS:\n\
         - Be specific and actionable in visual descriptions\n\
         - Write compelling, scroll-stopping copy under 280 characters\n\
         - Give strategic reasoning grounded in social media psychology\n\
         - Avoid generic advice or lazy content patterns\n\n\
         Return a JSON array of objects with:\n\
         - \"visual\": detailed, specific visual concept\n\
         - \"copy\": engaging post text (under 280 characters)\n\
         - \"why\": why this content works for the brand\n\n",
    );
    let _ = write!(
        prompt,
        "CRITICAL: Each of the {count} ideas must be completely different from the others.\n\n\
         Return ONLY the JSON array, no other text. The array length MUST equal {count}."
    );
    prompt
}

/// Build the instruction block for optimizing one post.
#[must_use]
pub fn optimize_prompt(req: &OptimizeRequest) -> String {
    let platform = req.platform.map_or("social media", Platform::as_str);
    let profile = req.profile.clone().unwrap_or_default();
    format!(
        "You are a social media optimization expert. Improve this content for {platform}:\n\n\
         CURRENT CONTENT:\n\
         Visual: {visual}\n\
         Copy: {copy}\n\n\
         BRAND CONTEXT:\n{context}\n\n\
         OPTIMIZATION GOALS:\n\
         - Increase engagement and reach\n\
         - Follow platform best practices for {platform}\n\
         - Keep the brand voice and tone\n\
         - Optimize for the target audience\n\n\
         Return a JSON object with:\n\
         - \"visual\": enhanced visual concept\n\
         - \"copy\": optimized post text\n\
         - \"hashtags\": array of 5-10 relevant hashtags\n\
         - \"improvements\": brief explanation of the changes\n\n\
         Return ONLY the JSON object, no other text.",
        visual = req.visual,
        copy = req.copy,
        context = pretty_json(&profile),
    )
}

fn pretty_json(profile: &BrandProfile) -> String {
    serde_json::to_string_pretty(profile).unwrap_or_else(|_| "{}".to_string())
}
