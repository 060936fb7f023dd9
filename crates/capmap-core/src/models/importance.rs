//! Importance ratings (explicit and effective) and application fit scores.

use std::fmt;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_RATING, MIN_RATING};
use crate::ids::{BusinessDomainId, CapabilityId, ComponentId, PillarId};

/// A rating value outside `MIN_RATING..=MAX_RATING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rating {0} outside 1..=5")]
pub struct RatingOutOfRange(pub i64);

macro_rules! rating {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "u8", into = "u8")]
        pub struct $name(u8);

        impl $name {
            pub fn new(value: u8) -> Result<Self, RatingOutOfRange> {
                if (MIN_RATING..=MAX_RATING).contains(&value) {
                    Ok(Self(value))
                } else {
                    Err(RatingOutOfRange(i64::from(value)))
                }
            }

            pub fn value(self) -> u8 {
                self.0
            }
        }

        impl TryFrom<u8> for $name {
            type Error = RatingOutOfRange;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(i64::from(self.0)))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                let raw = value.as_i64()?;
                u8::try_from(raw)
                    .map_err(|_| RatingOutOfRange(raw))
                    .and_then(Self::new)
                    .map_err(|e| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

rating!(
    /// Strategic importance of a capability to a pillar within a domain (1–5).
    Importance
);
rating!(
    /// How well a component serves a pillar (1–5).
    FitScore
);

/// User-authored rating at a specific (domain, capability, pillar).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyImportance {
    pub domain_id: BusinessDomainId,
    pub capability_id: CapabilityId,
    pub pillar_id: PillarId,
    pub importance: Importance,
    pub rationale: Option<String>,
}

/// Importance resolved for a capability by inheritance, with provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveImportance {
    pub capability_id: CapabilityId,
    pub pillar_id: PillarId,
    pub domain_id: BusinessDomainId,
    pub importance: Importance,
    pub source_capability_id: CapabilityId,
    pub source_capability_name: String,
    pub is_inherited: bool,
}

/// Fit of a component against a pillar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationFitScore {
    pub component_id: ComponentId,
    pub pillar_id: PillarId,
    pub score: FitScore,
    pub rationale: Option<String>,
}
