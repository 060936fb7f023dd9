//! Capability realizations by application components.

use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::ids::{CapabilityId, ComponentId, RealizationId};

/// Whether a realization was linked explicitly or propagated to an ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RealizationOrigin {
    Direct,
    Inherited,
}

/// How completely a component realizes a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RealizationLevel {
    Full,
    Partial,
    Planned,
}

/// Unknown enum discriminant read back from storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! text_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(UnknownVariant { kind: $kind, value: other.to_string() }),
                }
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e: UnknownVariant| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

text_enum!(RealizationOrigin, "realization origin", {
    Direct => "Direct",
    Inherited => "Inherited",
});

text_enum!(RealizationLevel, "realization level", {
    Full => "Full",
    Partial => "Partial",
    Planned => "Planned",
});

/// A realization row. `source_realization_id` is set only for inherited rows
/// and points at the direct realization that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Realization {
    pub id: RealizationId,
    pub capability_id: CapabilityId,
    pub component_id: ComponentId,
    pub level: RealizationLevel,
    pub origin: RealizationOrigin,
    pub source_realization_id: Option<RealizationId>,
    pub notes: Option<String>,
    pub linked_at: i64,
}

/// An application component (system) that can realize capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationComponent {
    pub id: ComponentId,
    pub name: String,
}

/// Realization row joined with the names a UI renders next to it.
/// `source_capability_name` is the capability holding the direct link an
/// inherited row was propagated from; it is `None` for direct rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealizationView {
    #[serde(flatten)]
    pub realization: Realization,
    pub component_name: Option<String>,
    pub source_capability_id: Option<CapabilityId>,
    pub source_capability_name: Option<String>,
}
