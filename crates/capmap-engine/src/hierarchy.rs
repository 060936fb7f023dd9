//! Hierarchy Navigator: read-side walks over the capability adjacency table.
//!
//! Nothing is cached. Every walk reads the connection it was given, which
//! inside a projection is the event's transaction, so it always sees the
//! tree as the event left it.

use std::collections::VecDeque;

use capmap_core::constants::MAX_HIERARCHY_DEPTH;
use capmap_core::errors::HierarchyError;
use capmap_core::ids::{CapabilityId, TenantId};
use capmap_core::models::Capability;
use capmap_storage::queries::capabilities;
use rusqlite::Connection;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

/// Self-to-root chain. Depth is capped at four, so it never spills.
pub type AncestorChain = SmallVec<[Capability; 4]>;

/// Tree walker bound to one connection and one tenant.
#[derive(Clone, Copy)]
pub struct HierarchyNavigator<'a> {
    conn: &'a Connection,
    tenant: &'a TenantId,
}

impl<'a> HierarchyNavigator<'a> {
    pub fn new(conn: &'a Connection, tenant: &'a TenantId) -> Self {
        Self { conn, tenant }
    }

    /// Fetch a capability, `None` when absent.
    pub fn find(&self, id: &CapabilityId) -> Result<Option<Capability>, HierarchyError> {
        Ok(capabilities::get_capability(self.conn, self.tenant, id)?)
    }

    /// Level, parent, and name of a capability.
    pub fn get_info(&self, id: &CapabilityId) -> Result<Capability, HierarchyError> {
        self.find(id)?
            .ok_or_else(|| HierarchyError::CapabilityNotFound(id.clone()))
    }

    /// Direct children, ordered by id.
    pub fn get_children(&self, id: &CapabilityId) -> Result<Vec<CapabilityId>, HierarchyError> {
        self.get_info(id)?;
        Ok(capabilities::get_children(self.conn, self.tenant, id)?
            .into_iter()
            .map(|c| c.id)
            .collect())
    }

    /// Ancestor-or-self chain, starting at `id` and ending at its L1 root.
    pub fn get_ancestor_chain(&self, id: &CapabilityId) -> Result<AncestorChain, HierarchyError> {
        let mut chain = AncestorChain::new();
        let mut seen = FxHashSet::default();
        let mut current = self.get_info(id)?;

        loop {
            if !seen.insert(current.id.clone()) {
                return Err(HierarchyError::CycleDetected {
                    capability_id: id.clone(),
                    parent_id: current.id,
                });
            }
            let parent_id = current.parent_id.clone();
            chain.push(current);
            if chain.len() > MAX_HIERARCHY_DEPTH {
                return Err(HierarchyError::DepthExceeded {
                    capability_id: id.clone(),
                    depth: chain.len(),
                });
            }
            match parent_id {
                None => return Ok(chain),
                Some(parent_id) => {
                    current = self.find(&parent_id)?.ok_or_else(|| {
                        HierarchyError::ParentNotFound {
                            capability_id: chain[chain.len() - 1].id.clone(),
                            parent_id,
                        }
                    })?;
                }
            }
        }
    }

    /// Strict ancestors of `id`, nearest first.
    pub fn get_ancestors(&self, id: &CapabilityId) -> Result<AncestorChain, HierarchyError> {
        let mut chain = self.get_ancestor_chain(id)?;
        chain.remove(0);
        Ok(chain)
    }

    /// All descendants at any depth, breadth first. Excludes `id` itself.
    pub fn get_subtree(&self, id: &CapabilityId) -> Result<Vec<CapabilityId>, HierarchyError> {
        self.get_info(id)?;
        Ok(self
            .subtree_with_depth(id)?
            .into_iter()
            .map(|(cap, _)| cap.id)
            .collect())
    }

    /// Descendants paired with their distance below `id` (children are 1).
    pub fn subtree_with_depth(
        &self,
        id: &CapabilityId,
    ) -> Result<Vec<(Capability, usize)>, HierarchyError> {
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        seen.insert(id.clone());
        let mut queue = VecDeque::from([(id.clone(), 0usize)]);

        while let Some((node, depth)) = queue.pop_front() {
            for child in capabilities::get_children(self.conn, self.tenant, &node)? {
                if !seen.insert(child.id.clone()) {
                    return Err(HierarchyError::CycleDetected {
                        capability_id: child.id,
                        parent_id: node,
                    });
                }
                if depth + 1 >= MAX_HIERARCHY_DEPTH {
                    return Err(HierarchyError::DepthExceeded {
                        capability_id: child.id,
                        depth: depth + 2,
                    });
                }
                queue.push_back((child.id.clone(), depth + 1));
                out.push((child, depth + 1));
            }
        }
        Ok(out)
    }

    /// `id` followed by every descendant.
    pub fn subtree_inclusive(&self, id: &CapabilityId) -> Result<Vec<CapabilityId>, HierarchyError> {
        let mut nodes = vec![id.clone()];
        nodes.extend(self.get_subtree(id)?);
        Ok(nodes)
    }

    /// The nearest L1 ancestor-or-self. Domain scoping and reassignment both
    /// resolve through this.
    pub fn nearest_l1_ancestor(&self, id: &CapabilityId) -> Result<Capability, HierarchyError> {
        let mut chain = self.get_ancestor_chain(id)?;
        chain
            .pop()
            .ok_or_else(|| HierarchyError::CapabilityNotFound(id.clone()))
    }

    /// Whether `candidate` lies strictly below `ancestor`.
    pub fn is_strict_descendant(
        &self,
        candidate: &CapabilityId,
        ancestor: &CapabilityId,
    ) -> Result<bool, HierarchyError> {
        if candidate == ancestor {
            return Ok(false);
        }
        Ok(self
            .get_ancestor_chain(candidate)?
            .iter()
            .any(|c| &c.id == ancestor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capmap_core::models::CapabilityLevel;
    use capmap_storage::DatabaseManager;

    fn insert(conn: &Connection, tenant: &TenantId, id: &str, level: CapabilityLevel, parent: Option<&str>) {
        let capability = Capability {
            id: CapabilityId::new(id),
            name: id.to_uppercase(),
            level,
            parent_id: parent.map(CapabilityId::new),
        };
        capabilities::insert_capability(conn, tenant, &capability).unwrap();
    }

    /// a > b > c, a > d, plus an orphan whose parent is missing.
    fn with_tree(f: impl FnOnce(HierarchyNavigator<'_>)) {
        let db = DatabaseManager::open_in_memory().unwrap();
        let tenant = TenantId::new("t");
        db.with_writer(|conn| {
            insert(conn, &tenant, "a", CapabilityLevel::L1, None);
            insert(conn, &tenant, "b", CapabilityLevel::L2, Some("a"));
            insert(conn, &tenant, "c", CapabilityLevel::L3, Some("b"));
            insert(conn, &tenant, "d", CapabilityLevel::L2, Some("a"));
            insert(conn, &tenant, "orphan", CapabilityLevel::L2, Some("gone"));
            f(HierarchyNavigator::new(conn, &tenant));
            Ok(())
        })
        .unwrap();
    }

    fn ids(chain: &[Capability]) -> Vec<&str> {
        chain.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn ancestor_chain_runs_self_to_root() {
        with_tree(|nav| {
            let chain = nav.get_ancestor_chain(&CapabilityId::new("c")).unwrap();
            assert_eq!(ids(&chain), ["c", "b", "a"]);
            assert!(!chain.spilled());
            assert_eq!(ids(&nav.get_ancestors(&CapabilityId::new("c")).unwrap()), ["b", "a"]);
            assert!(nav.get_ancestors(&CapabilityId::new("a")).unwrap().is_empty());
        });
    }

    #[test]
    fn subtree_is_breadth_first_and_excludes_self() {
        with_tree(|nav| {
            let subtree = nav.get_subtree(&CapabilityId::new("a")).unwrap();
            let subtree: Vec<&str> = subtree.iter().map(CapabilityId::as_str).collect();
            assert_eq!(subtree, ["b", "d", "c"]);

            let depths: Vec<usize> = nav
                .subtree_with_depth(&CapabilityId::new("a"))
                .unwrap()
                .into_iter()
                .map(|(_, depth)| depth)
                .collect();
            assert_eq!(depths, [1, 1, 2]);
            assert!(nav.get_subtree(&CapabilityId::new("c")).unwrap().is_empty());
        });
    }

    #[test]
    fn children_and_info() {
        with_tree(|nav| {
            let children = nav.get_children(&CapabilityId::new("a")).unwrap();
            assert_eq!(children, [CapabilityId::new("b"), CapabilityId::new("d")]);
            let info = nav.get_info(&CapabilityId::new("c")).unwrap();
            assert_eq!(info.level, CapabilityLevel::L3);
            assert_eq!(info.parent_id, Some(CapabilityId::new("b")));
        });
    }

    #[test]
    fn nearest_root_and_descendant_checks() {
        with_tree(|nav| {
            assert_eq!(nav.nearest_l1_ancestor(&CapabilityId::new("c")).unwrap().id.as_str(), "a");
            assert_eq!(nav.nearest_l1_ancestor(&CapabilityId::new("a")).unwrap().id.as_str(), "a");
            assert!(nav.is_strict_descendant(&CapabilityId::new("c"), &CapabilityId::new("a")).unwrap());
            assert!(!nav.is_strict_descendant(&CapabilityId::new("a"), &CapabilityId::new("a")).unwrap());
            assert!(!nav.is_strict_descendant(&CapabilityId::new("d"), &CapabilityId::new("b")).unwrap());
        });
    }

    #[test]
    fn missing_nodes_are_reported() {
        with_tree(|nav| {
            assert!(matches!(
                nav.get_info(&CapabilityId::new("nope")),
                Err(HierarchyError::CapabilityNotFound(_))
            ));
            assert!(matches!(
                nav.get_subtree(&CapabilityId::new("nope")),
                Err(HierarchyError::CapabilityNotFound(_))
            ));
            assert!(matches!(
                nav.get_ancestor_chain(&CapabilityId::new("orphan")),
                Err(HierarchyError::ParentNotFound { .. })
            ));
        });
    }
}
