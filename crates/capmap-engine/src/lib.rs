//! # capmap-engine
//!
//! Keeps the derived capability-map views consistent with the event stream:
//! effective importance (closest explicit rating up the tree, scoped to the
//! domains the L1 root is assigned to), domain assignments that follow a
//! capability when it stops being a root, and inherited realizations on
//! every ancestor of a linked capability.
//!
//! Every event is applied by [`ProjectionRuntime`] in one immediate
//! transaction. Each projector re-derives its rows from current
//! source-of-truth state, so redelivered and reordered events converge.

pub mod ancestry;
pub mod commands;
pub mod gap;
pub mod hierarchy;
pub mod pillars;
pub mod projectors;
pub mod reader;
pub mod recompute;
pub mod resolver;
pub mod runtime;

pub use ancestry::DomainAncestryChecker;
pub use commands::StoreCommandBus;
pub use gap::GapPolicy;
pub use hierarchy::{AncestorChain, HierarchyNavigator};
pub use pillars::{CachedPillarGateway, SqlitePillarGateway};
pub use reader::{CapabilityMapReader, StrategicFitEntry};
pub use recompute::{EffectiveImportanceRecomputer, RecomputeStats};
pub use resolver::{RatingResolver, ResolvedImportance};
pub use runtime::{ApplyReport, ProjectionRuntime, SkippedEvent};
