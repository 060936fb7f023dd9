//! Strongly-typed string identifiers.
//!
//! Every id is an opaque string minted upstream by the aggregate that owns it.
//! The newtypes keep a capability id from being passed where a pillar id is
//! expected and bind directly to SQLite TEXT columns.

use std::fmt;

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw id.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the raw id.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the id, returning the raw string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                self.0.to_sql()
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                String::column_result(value).map(Self)
            }
        }
    };
}

string_id!(
    /// Tenant scope carried on every read and write.
    TenantId
);
string_id!(
    /// Node in the L1–L4 capability tree.
    CapabilityId
);
string_id!(
    /// Business domain that L1 capabilities are assigned to.
    BusinessDomainId
);
string_id!(
    /// Strategy pillar (strategic dimension).
    PillarId
);
string_id!(
    /// Application component that realizes capabilities.
    ComponentId
);
string_id!(
    /// Capability realization row.
    RealizationId
);
