//! Tenant and projection contexts carried through every operation.

use rusqlite::Connection;

use crate::errors::ProjectionError;
use crate::ids::TenantId;
use crate::traits::{Cancellable, CancellationToken};

/// Tenant scope plus cancellation for one unit of work.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub tenant: TenantId,
    pub cancel: CancellationToken,
}

impl TenantContext {
    pub fn new(tenant: impl Into<TenantId>) -> Self {
        Self {
            tenant: tenant.into(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(tenant: impl Into<TenantId>, cancel: CancellationToken) -> Self {
        Self {
            tenant: tenant.into(),
            cancel,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// What a handler sees while projecting one event: the transaction's
/// connection and the tenant it must stay inside.
#[derive(Clone, Copy)]
pub struct ProjectionContext<'a> {
    pub conn: &'a Connection,
    pub tenant: &'a TenantContext,
}

impl<'a> ProjectionContext<'a> {
    pub fn new(conn: &'a Connection, tenant: &'a TenantContext) -> Self {
        Self { conn, tenant }
    }

    pub fn tenant_id(&self) -> &'a TenantId {
        &self.tenant.tenant
    }

    /// Bail out with `Cancelled` once the context has been cancelled.
    pub fn check_cancelled(&self) -> Result<(), ProjectionError> {
        if self.tenant.is_cancelled() {
            Err(ProjectionError::Cancelled)
        } else {
            Ok(())
        }
    }
}
