//! Strategy pillar configuration (read-only to the engine).

use serde::{Deserialize, Serialize};

use crate::ids::PillarId;

/// A named strategic dimension importance and fit are rated against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyPillar {
    pub id: PillarId,
    pub name: String,
    pub active: bool,
    pub fit_scoring_enabled: bool,
}
