use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::CoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    #[default]
    Instagram,
    X,
}

impl Platform {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
            Platform::X => "x",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "facebook" => Ok(Platform::Facebook),
            "instagram" => Ok(Platform::Instagram),
            "x" | "twitter" => Ok(Platform::X),
            _ => Err(CoreError::InvalidPlatform(s.to_string())),
        }
    }
}

/// A generated post concept before it is placed on the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaDraft {
    pub visual: String,
    pub copy: String,
    #[serde(default)]
    pub why: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    pub id: String,
    pub visual: String,
    pub copy: String,
    #[serde(default)]
    pub why: String,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposed_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_date: Option<NaiveDate>,
    #[serde(default)]
    pub accepted: bool,
}

/// Lifecycle position of an idea on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdeaState {
    /// Not accepted; carries whatever date the board would place it on.
    Pending(Option<NaiveDate>),
    Scheduled(NaiveDate),
}

impl Idea {
    /// Build a pending idea from a draft.
    #[must_use]
    pub fn pending(
        id: impl Into<String>,
        draft: IdeaDraft,
        platform: Platform,
        proposed_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: id.into(),
            visual: draft.visual,
            copy: draft.copy,
            why: draft.why,
            platform,
            proposed_date,
            assigned_date: None,
            accepted: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> IdeaState {
        match (self.accepted, self.assigned_date) {
            (true, Some(date)) => IdeaState::Scheduled(date),
            _ => IdeaState::Pending(self.assigned_date.or(self.proposed_date)),
        }
    }

    #[must_use]
    pub fn is_scheduled_on(&self, date: NaiveDate) -> bool {
        self.state() == IdeaState::Scheduled(date)
    }

    /// Replace the creative fields while keeping identity, platform and dates.
    pub fn replace_content(&mut self, draft: IdeaDraft) {
        self.visual = draft.visual;
        self.copy = draft.copy;
        self.why = draft.why;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn draft() -> IdeaDraft {
        IdeaDraft {
            visual: "Flat lay of fresh croissants".to_string(),
            copy: "Warm from the oven".to_string(),
            why: "Sensory hook".to_string(),
        }
    }

    #[test]
    fn platform_parses_case_insensitively() {
        assert_eq!("Facebook".parse::<Platform>().unwrap(), Platform::Facebook);
        assert_eq!("X".parse::<Platform>().unwrap(), Platform::X);
        assert!("myspace".parse::<Platform>().is_err());
    }

    #[test]
    fn idea_serializes_with_camel_case_dates() {
        let mut idea = Idea::pending("a1", draft(), Platform::Instagram, Some(date("2024-06-01")));
        idea.assigned_date = Some(date("2024-06-02"));
        let json = serde_json::to_value(&idea).expect("serialize");
        assert_eq!(json["proposedDate"], "2024-06-01");
        assert_eq!(json["assignedDate"], "2024-06-02");
        assert_eq!(json["platform"], "instagram");
        assert_eq!(json["accepted"], false);
    }

    #[test]
    fn idea_without_optional_fields_deserializes() {
        let idea: Idea = serde_json::from_value(serde_json::json!({
            "id": "b2",
            "visual": "v",
            "copy": "c"
        }))
        .expect("deserialize");
        assert_eq!(idea.platform, Platform::Instagram);
        assert!(idea.why.is_empty());
        assert_eq!(idea.state(), IdeaState::Pending(None));
    }

    #[test]
    fn state_reports_scheduled_only_when_accepted_with_date() {
        let mut idea = Idea::pending("c3", draft(), Platform::X, Some(date("2024-06-01")));
        assert_eq!(idea.state(), IdeaState::Pending(Some(date("2024-06-01"))));

        idea.assigned_date = Some(date("2024-06-03"));
        assert_eq!(idea.state(), IdeaState::Pending(Some(date("2024-06-03"))));

        idea.accepted = true;
        assert_eq!(idea.state(), IdeaState::Scheduled(date("2024-06-03")));
        assert!(idea.is_scheduled_on(date("2024-06-03")));
    }

    #[test]
    fn replace_content_keeps_identity_and_dates() {
        let mut idea = Idea::pending("d4", draft(), Platform::Facebook, Some(date("2024-06-01")));
        idea.replace_content(IdeaDraft {
            visual: "new visual".to_string(),
            copy: "new copy".to_string(),
            why: "new why".to_string(),
        });
        assert_eq!(idea.id, "d4");
        assert_eq!(idea.platform, Platform::Facebook);
        assert_eq!(idea.proposed_date, Some(date("2024-06-01")));
        assert_eq!(idea.visual, "new visual");
    }
}
