use serde::{Deserialize, Serialize};

/// Gap categorization thresholds.
///
/// `gap >= liability_min_gap` is a liability, `gap >= concern_min_gap` a
/// concern, anything lower is aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GapConfig {
    pub concern_min_gap: i8,
    pub liability_min_gap: i8,
}

impl Default for GapConfig {
    fn default() -> Self {
        Self {
            concern_min_gap: 1,
            liability_min_gap: 2,
        }
    }
}
