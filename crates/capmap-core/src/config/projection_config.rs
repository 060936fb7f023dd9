use serde::{Deserialize, Serialize};

/// Projection runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Upper bound on command-driven follow-up events drained per applied event.
    pub max_follow_up_events: usize,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            max_follow_up_events: 256,
        }
    }
}
