//! Domain models shared by storage and the projection engine.

pub mod capability;
pub mod domain;
pub mod gap;
pub mod importance;
pub mod pillar;
pub mod realization;

pub use capability::{Capability, CapabilityLevel};
pub use domain::{BusinessDomain, DomainAssignment};
pub use gap::{GapAssessment, GapCategory};
pub use importance::{
    ApplicationFitScore, EffectiveImportance, FitScore, Importance, RatingOutOfRange,
    StrategyImportance,
};
pub use pillar::StrategyPillar;
pub use realization::{
    ApplicationComponent, Realization, RealizationLevel, RealizationOrigin, RealizationView,
    UnknownVariant,
};
