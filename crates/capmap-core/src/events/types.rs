//! Event payload types.

use serde::{Deserialize, Serialize};

use crate::ids::{BusinessDomainId, CapabilityId, ComponentId, PillarId, RealizationId};
use crate::models::{CapabilityLevel, FitScore, Importance, RealizationLevel};

/// Payload for `CapabilityCreated`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityCreatedEvent {
    pub capability_id: CapabilityId,
    pub name: String,
    pub parent_id: Option<CapabilityId>,
    pub level: CapabilityLevel,
}

/// Payload for `CapabilityRenamed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityRenamedEvent {
    pub capability_id: CapabilityId,
    pub name: String,
}

/// Payload for `CapabilityParentChanged`. `None` parent means L1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityParentChangedEvent {
    pub capability_id: CapabilityId,
    pub old_parent_id: Option<CapabilityId>,
    pub new_parent_id: Option<CapabilityId>,
}

/// Payload for `CapabilityDeleted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityDeletedEvent {
    pub capability_id: CapabilityId,
}

/// Payload for `BusinessDomainCreated`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDomainCreatedEvent {
    pub domain_id: BusinessDomainId,
    pub name: String,
}

/// Payload for `CapabilityAssignedToDomain` and `CapabilityUnassignedFromDomain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainAssignmentEvent {
    pub domain_id: BusinessDomainId,
    pub capability_id: CapabilityId,
}

/// Payload for `StrategyImportanceSet` and `StrategyImportanceUpdated`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyImportanceSetEvent {
    pub domain_id: BusinessDomainId,
    pub capability_id: CapabilityId,
    pub pillar_id: PillarId,
    pub importance: Importance,
    pub rationale: Option<String>,
}

/// Payload for `StrategyImportanceRemoved`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyImportanceRemovedEvent {
    pub domain_id: BusinessDomainId,
    pub capability_id: CapabilityId,
    pub pillar_id: PillarId,
}

/// Payload for `ApplicationComponentCreated` and `ApplicationComponentRenamed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationComponentEvent {
    pub component_id: ComponentId,
    pub name: String,
}

/// Payload for `ApplicationFitScoreSet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationFitScoreSetEvent {
    pub component_id: ComponentId,
    pub pillar_id: PillarId,
    pub score: FitScore,
    pub rationale: Option<String>,
}

/// Payload for `ApplicationFitScoreRemoved`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationFitScoreRemovedEvent {
    pub component_id: ComponentId,
    pub pillar_id: PillarId,
}

/// Payload for `SystemLinkedToCapability`. The realization id is minted by
/// the aggregate, which makes redelivery idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemLinkedToCapabilityEvent {
    pub realization_id: RealizationId,
    pub capability_id: CapabilityId,
    pub component_id: ComponentId,
    pub level: RealizationLevel,
    pub notes: Option<String>,
}

/// Payload for `SystemRealizationUpdated`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemRealizationUpdatedEvent {
    pub realization_id: RealizationId,
    pub level: RealizationLevel,
    pub notes: Option<String>,
}

/// Payload for `SystemRealizationDeleted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemRealizationDeletedEvent {
    pub realization_id: RealizationId,
}

/// Every event the projectors consume, as delivered by the event store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum DomainEvent {
    CapabilityCreated(CapabilityCreatedEvent),
    CapabilityRenamed(CapabilityRenamedEvent),
    CapabilityParentChanged(CapabilityParentChangedEvent),
    CapabilityDeleted(CapabilityDeletedEvent),
    BusinessDomainCreated(BusinessDomainCreatedEvent),
    CapabilityAssignedToDomain(DomainAssignmentEvent),
    CapabilityUnassignedFromDomain(DomainAssignmentEvent),
    StrategyImportanceSet(StrategyImportanceSetEvent),
    StrategyImportanceUpdated(StrategyImportanceSetEvent),
    StrategyImportanceRemoved(StrategyImportanceRemovedEvent),
    ApplicationComponentCreated(ApplicationComponentEvent),
    ApplicationComponentRenamed(ApplicationComponentEvent),
    ApplicationFitScoreSet(ApplicationFitScoreSetEvent),
    ApplicationFitScoreRemoved(ApplicationFitScoreRemovedEvent),
    SystemLinkedToCapability(SystemLinkedToCapabilityEvent),
    SystemRealizationUpdated(SystemRealizationUpdatedEvent),
    SystemRealizationDeleted(SystemRealizationDeletedEvent),
}

impl DomainEvent {
    /// Event type name as carried in the `type` tag.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::CapabilityCreated(_) => "CapabilityCreated",
            Self::CapabilityRenamed(_) => "CapabilityRenamed",
            Self::CapabilityParentChanged(_) => "CapabilityParentChanged",
            Self::CapabilityDeleted(_) => "CapabilityDeleted",
            Self::BusinessDomainCreated(_) => "BusinessDomainCreated",
            Self::CapabilityAssignedToDomain(_) => "CapabilityAssignedToDomain",
            Self::CapabilityUnassignedFromDomain(_) => "CapabilityUnassignedFromDomain",
            Self::StrategyImportanceSet(_) => "StrategyImportanceSet",
            Self::StrategyImportanceUpdated(_) => "StrategyImportanceUpdated",
            Self::StrategyImportanceRemoved(_) => "StrategyImportanceRemoved",
            Self::ApplicationComponentCreated(_) => "ApplicationComponentCreated",
            Self::ApplicationComponentRenamed(_) => "ApplicationComponentRenamed",
            Self::ApplicationFitScoreSet(_) => "ApplicationFitScoreSet",
            Self::ApplicationFitScoreRemoved(_) => "ApplicationFitScoreRemoved",
            Self::SystemLinkedToCapability(_) => "SystemLinkedToCapability",
            Self::SystemRealizationUpdated(_) => "SystemRealizationUpdated",
            Self::SystemRealizationDeleted(_) => "SystemRealizationDeleted",
        }
    }
}
