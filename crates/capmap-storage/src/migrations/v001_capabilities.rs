//! V001: Capability tree, business domains, domain assignments.

pub const MIGRATION_SQL: &str = r#"
-- Capability tree as an adjacency table. parent_id is NULL iff level = 'L1'.
CREATE TABLE IF NOT EXISTS capabilities (
    tenant_id TEXT NOT NULL,
    id TEXT NOT NULL,
    name TEXT NOT NULL,
    level TEXT NOT NULL CHECK (level IN ('L1', 'L2', 'L3', 'L4')),
    parent_id TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (tenant_id, id)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_capabilities_parent
    ON capabilities(tenant_id, parent_id);

CREATE TABLE IF NOT EXISTS business_domains (
    tenant_id TEXT NOT NULL,
    id TEXT NOT NULL,
    name TEXT NOT NULL,
    capability_count INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (tenant_id, id)
) STRICT;

-- One row per (domain, L1 capability); the key forbids duplicates.
CREATE TABLE IF NOT EXISTS domain_capability_assignments (
    tenant_id TEXT NOT NULL,
    domain_id TEXT NOT NULL,
    capability_id TEXT NOT NULL,
    assigned_at INTEGER NOT NULL,
    PRIMARY KEY (tenant_id, domain_id, capability_id)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_assignments_capability
    ON domain_capability_assignments(tenant_id, capability_id);
"#;
