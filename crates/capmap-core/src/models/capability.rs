//! Capability tree nodes.

use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::errors::HierarchyError;
use crate::ids::CapabilityId;

/// Level of a capability in the four-level tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CapabilityLevel {
    L1,
    L2,
    L3,
    L4,
}

impl CapabilityLevel {
    pub const ALL: [CapabilityLevel; 4] = [Self::L1, Self::L2, Self::L3, Self::L4];

    /// 1-based depth (L1 = 1).
    pub fn depth(self) -> usize {
        match self {
            Self::L1 => 1,
            Self::L2 => 2,
            Self::L3 => 3,
            Self::L4 => 4,
        }
    }

    /// Level at the given 1-based depth, `None` beyond L4.
    pub fn from_depth(depth: usize) -> Option<Self> {
        match depth {
            1 => Some(Self::L1),
            2 => Some(Self::L2),
            3 => Some(Self::L3),
            4 => Some(Self::L4),
            _ => None,
        }
    }

    /// Level a direct child of this level must have.
    pub fn child(self) -> Option<Self> {
        Self::from_depth(self.depth() + 1)
    }

    pub fn is_root(self) -> bool {
        self == Self::L1
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::L1 => "L1",
            Self::L2 => "L2",
            Self::L3 => "L3",
            Self::L4 => "L4",
        }
    }
}

impl fmt::Display for CapabilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CapabilityLevel {
    type Err = HierarchyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L1" => Ok(Self::L1),
            "L2" => Ok(Self::L2),
            "L3" => Ok(Self::L3),
            "L4" => Ok(Self::L4),
            other => Err(HierarchyError::InvalidLevel(other.to_string())),
        }
    }
}

impl ToSql for CapabilityLevel {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for CapabilityLevel {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = value.as_str()?;
        raw.parse()
            .map_err(|e: HierarchyError| FromSqlError::Other(Box::new(e)))
    }
}

/// A node of the capability tree as stored in the read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capability {
    pub id: CapabilityId,
    pub name: String,
    pub level: CapabilityLevel,
    /// Empty iff `level == L1`.
    pub parent_id: Option<CapabilityId>,
}

impl Capability {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_levels_chain_to_l4() {
        assert_eq!(CapabilityLevel::L1.child(), Some(CapabilityLevel::L2));
        assert_eq!(CapabilityLevel::L3.child(), Some(CapabilityLevel::L4));
        assert_eq!(CapabilityLevel::L4.child(), None);
    }

    #[test]
    fn parse_rejects_unknown_level() {
        assert_eq!("L2".parse::<CapabilityLevel>().unwrap(), CapabilityLevel::L2);
        assert!(matches!(
            "L5".parse::<CapabilityLevel>(),
            Err(HierarchyError::InvalidLevel(_))
        ));
    }

    #[test]
    fn depth_round_trips() {
        for level in CapabilityLevel::ALL {
            assert_eq!(CapabilityLevel::from_depth(level.depth()), Some(level));
        }
        assert_eq!(CapabilityLevel::from_depth(0), None);
        assert_eq!(CapabilityLevel::from_depth(5), None);
    }
}
