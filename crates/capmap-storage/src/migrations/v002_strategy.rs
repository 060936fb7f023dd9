//! V002: Strategy pillars, explicit and effective importance, fit scores.

pub const MIGRATION_SQL: &str = r#"
-- Pillar configuration, read through the pillar gateway.
CREATE TABLE IF NOT EXISTS strategy_pillars (
    tenant_id TEXT NOT NULL,
    id TEXT NOT NULL,
    name TEXT NOT NULL,
    active INTEGER NOT NULL DEFAULT 1,
    fit_scoring_enabled INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (tenant_id, id)
) STRICT;

-- User-authored ratings, at any capability level.
CREATE TABLE IF NOT EXISTS strategy_importance (
    tenant_id TEXT NOT NULL,
    domain_id TEXT NOT NULL,
    capability_id TEXT NOT NULL,
    pillar_id TEXT NOT NULL,
    importance INTEGER NOT NULL CHECK (importance BETWEEN 1 AND 5),
    rationale TEXT,
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (tenant_id, domain_id, capability_id, pillar_id)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_strategy_importance_capability
    ON strategy_importance(tenant_id, capability_id);

-- Derived view: closest explicit rating on the ancestor-or-self chain.
CREATE TABLE IF NOT EXISTS effective_importance (
    tenant_id TEXT NOT NULL,
    capability_id TEXT NOT NULL,
    pillar_id TEXT NOT NULL,
    domain_id TEXT NOT NULL,
    importance INTEGER NOT NULL CHECK (importance BETWEEN 1 AND 5),
    source_capability_id TEXT NOT NULL,
    source_capability_name TEXT NOT NULL,
    is_inherited INTEGER NOT NULL,
    computed_at INTEGER NOT NULL,
    PRIMARY KEY (tenant_id, capability_id, pillar_id, domain_id)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_effective_importance_source
    ON effective_importance(tenant_id, source_capability_id, pillar_id, domain_id);
CREATE INDEX IF NOT EXISTS idx_effective_importance_domain
    ON effective_importance(tenant_id, domain_id);

CREATE TABLE IF NOT EXISTS application_fit_scores (
    tenant_id TEXT NOT NULL,
    component_id TEXT NOT NULL,
    pillar_id TEXT NOT NULL,
    score INTEGER NOT NULL CHECK (score BETWEEN 1 AND 5),
    rationale TEXT,
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (tenant_id, component_id, pillar_id)
) STRICT;
"#;
