//! Gap categorization results (derived per request, never persisted).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of misalignment between importance and fit.
/// Ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapCategory {
    Liability,
    Concern,
    Aligned,
}

impl GapCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Liability => "liability",
            Self::Concern => "concern",
            Self::Aligned => "aligned",
        }
    }
}

impl fmt::Display for GapCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `gap = importance - fit_score` and its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapAssessment {
    pub importance: u8,
    pub fit_score: u8,
    pub gap: i8,
    pub category: GapCategory,
}
