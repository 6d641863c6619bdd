use serde::{Deserialize, Serialize};

/// Descriptive fields about a business, used to steer idea generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandProfile {
    pub brand_name: String,
    pub year_founded: String,
    pub industry: String,
    pub audience: String,
    pub tone: String,
    pub has_photography: bool,
    pub has_video: bool,
    pub has_design: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_culture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_goals: Option<String>,
}

impl BrandProfile {
    /// Production capabilities in prompt wording (`photography`, `video`, `design`).
    #[must_use]
    pub fn capabilities(&self) -> Vec<&'static str> {
        [
            (self.has_photography, "photography"),
            (self.has_video, "video"),
            (self.has_design, "design"),
        ]
        .into_iter()
        .filter_map(|(enabled, name)| enabled.then_some(name))
        .collect()
    }

    #[must_use]
    pub fn audience_or_default(&self) -> &str {
        non_empty(&self.audience).unwrap_or("general audience")
    }

    #[must_use]
    pub fn content_goals_or_default(&self) -> &str {
        self.content_goals
            .as_deref()
            .and_then(non_empty)
            .unwrap_or("brand awareness")
    }
}

/// Public view of an account, as returned by the auth and user endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_profile_deserializes_with_defaults() {
        let profile: BrandProfile = serde_json::from_value(serde_json::json!({
            "industry": "Bakery",
            "tone": "Playful"
        }))
        .expect("deserialize");
        assert_eq!(profile.industry, "Bakery");
        assert_eq!(profile.tone, "Playful");
        assert!(!profile.has_video);
        assert!(profile.content_goals.is_none());
    }

    #[test]
    fn capabilities_list_enabled_flags_in_order() {
        let profile = BrandProfile {
            has_photography: true,
            has_design: true,
            ..BrandProfile::default()
        };
        assert_eq!(profile.capabilities(), vec!["photography", "design"]);
    }

    #[test]
    fn blank_audience_and_goals_fall_back() {
        let profile = BrandProfile {
            audience: "  ".to_string(),
            content_goals: Some(String::new()),
            ..BrandProfile::default()
        };
        assert_eq!(profile.audience_or_default(), "general audience");
        assert_eq!(profile.content_goals_or_default(), "brand awareness");
    }
}
