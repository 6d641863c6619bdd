use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Subscription plan controlling how many calendar days may hold ideas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanKey {
    #[serde(rename = "free3")]
    Free3,
    #[default]
    #[serde(rename = "d30")]
    D30,
}

impl PlanKey {
    /// Number of distinct dates that may carry ideas under this plan.
    #[must_use]
    pub fn idea_allowance(self) -> usize {
        match self {
            PlanKey::Free3 => 3,
            PlanKey::D30 => 30,
        }
    }

    #[must_use]
    pub fn allows_campaigns(self) -> bool {
        matches!(self, PlanKey::D30)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PlanKey::Free3 => "free3",
            PlanKey::D30 => "d30",
        }
    }
}

impl std::fmt::Display for PlanKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "free3" => Ok(PlanKey::Free3),
            "d30" => Ok(PlanKey::D30),
            other => Err(CoreError::InvalidPlan(other.to_string())),
        }
    }
}
