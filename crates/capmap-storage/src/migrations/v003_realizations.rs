//! V003: Application components and capability realizations.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS application_components (
    tenant_id TEXT NOT NULL,
    id TEXT NOT NULL,
    name TEXT NOT NULL,
    PRIMARY KEY (tenant_id, id)
) STRICT;

-- Direct rows are explicit links; Inherited rows are propagated copies on
-- ancestors and always reference the Direct row that produced them.
CREATE TABLE IF NOT EXISTS capability_realizations (
    tenant_id TEXT NOT NULL,
    id TEXT NOT NULL,
    capability_id TEXT NOT NULL,
    component_id TEXT NOT NULL,
    realization_level TEXT NOT NULL CHECK (realization_level IN ('Full', 'Partial', 'Planned')),
    origin TEXT NOT NULL CHECK (origin IN ('Direct', 'Inherited')),
    source_realization_id TEXT,
    notes TEXT,
    linked_at INTEGER NOT NULL,
    PRIMARY KEY (tenant_id, id),
    CHECK ((origin = 'Direct') = (source_realization_id IS NULL))
) STRICT;

CREATE UNIQUE INDEX IF NOT EXISTS idx_realizations_one_direct
    ON capability_realizations(tenant_id, capability_id, component_id)
    WHERE origin = 'Direct';
CREATE UNIQUE INDEX IF NOT EXISTS idx_realizations_one_inherited
    ON capability_realizations(tenant_id, capability_id, component_id)
    WHERE origin = 'Inherited';
CREATE INDEX IF NOT EXISTS idx_realizations_source
    ON capability_realizations(tenant_id, source_realization_id)
    WHERE source_realization_id IS NOT NULL;
CREATE INDEX IF NOT EXISTS idx_realizations_component
    ON capability_realizations(tenant_id, component_id);
"#;
