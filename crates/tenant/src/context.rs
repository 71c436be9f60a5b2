// Tenant context for request handling

use crate::error::{Result, TenantError};
use saas_models::TenantId;
use std::ops::Deref;

/// Request-scoped record of which tenant the current request acts for.
///
/// A fresh, empty context is created for every request and handed down the
/// call chain explicitly; nothing is stored in globals or thread-locals, so a
/// value set while serving one request cannot be observed by another one that
/// happens to run on the same worker afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantContext {
    tenant_id: Option<TenantId>,
}

impl TenantContext {
    /// Empty context: no tenant determined yet.
    pub fn new() -> Self {
        Self { tenant_id: None }
    }

    pub fn for_tenant(tenant_id: TenantId) -> Self {
        Self {
            tenant_id: Some(tenant_id),
        }
    }

    /// Associate `tenant_id` with this context, replacing any prior value.
    pub fn set(&mut self, tenant_id: TenantId) {
        tracing::debug!(tenant_id = %tenant_id, "Set tenant context");
        self.tenant_id = Some(tenant_id);
    }

    pub fn get(&self) -> Option<TenantId> {
        self.tenant_id
    }

    /// Remove the association. Clearing an empty context is a no-op.
    pub fn clear(&mut self) {
        if let Some(tenant_id) = self.tenant_id.take() {
            tracing::debug!(tenant_id = %tenant_id, "Cleared tenant context");
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.tenant_id.is_some()
    }

    /// Tenant of this context, or [`TenantError::Unresolved`] when empty.
    pub fn require(&self) -> Result<TenantId> {
        self.tenant_id.ok_or(TenantError::Unresolved)
    }

    /// Publish `tenant_id` (if any) and return a guard that clears the
    /// context when dropped.
    ///
    /// The guard is dropped on every exit path of the enclosing scope:
    /// normal return, early `?` return, panic unwinding, and cancellation of
    /// the future that owns it.
    pub fn enter(&mut self, tenant_id: Option<TenantId>) -> TenantGuard<'_> {
        match tenant_id {
            Some(tenant_id) => self.set(tenant_id),
            None => self.clear(),
        }
        TenantGuard { ctx: self }
    }

    /// Explicit scoped override, e.g. for an administrative sub-operation.
    ///
    /// Returns a separate context; `self` is left untouched, so the override
    /// ends when the returned value is dropped.
    pub fn with_override(&self, tenant_id: TenantId) -> TenantContext {
        tracing::info!(
            tenant_id = %tenant_id,
            previous = ?self.tenant_id,
            "Tenant context override"
        );
        TenantContext::for_tenant(tenant_id)
    }
}

/// Release handle returned by [`TenantContext::enter`].
#[derive(Debug)]
pub struct TenantGuard<'a> {
    ctx: &'a mut TenantContext,
}

impl TenantGuard<'_> {
    /// Owned copy of the published context, for handing to downstream code.
    pub fn snapshot(&self) -> TenantContext {
        self.ctx.clone()
    }
}

impl Deref for TenantGuard<'_> {
    type Target = TenantContext;

    fn deref(&self) -> &TenantContext {
        self.ctx
    }
}

impl Drop for TenantGuard<'_> {
    fn drop(&mut self) {
        self.ctx.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn test_set_get_clear() {
        let tenant = TenantId::generate();
        let mut ctx = TenantContext::new();
        assert_eq!(ctx.get(), None);

        ctx.set(tenant);
        assert_eq!(ctx.get(), Some(tenant));

        let other = TenantId::generate();
        ctx.set(other);
        assert_eq!(ctx.get(), Some(other));

        ctx.clear();
        assert_eq!(ctx.get(), None);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut ctx = TenantContext::new();
        ctx.clear();
        ctx.clear();
        assert!(!ctx.is_resolved());
    }

    #[test]
    fn test_require_fails_when_empty() {
        let ctx = TenantContext::new();
        assert!(matches!(ctx.require(), Err(TenantError::Unresolved)));

        let tenant = TenantId::generate();
        assert_eq!(TenantContext::for_tenant(tenant).require().unwrap(), tenant);
    }

    #[test]
    fn test_guard_clears_on_scope_exit() {
        let tenant = TenantId::generate();
        let mut ctx = TenantContext::new();
        {
            let guard = ctx.enter(Some(tenant));
            assert_eq!(guard.get(), Some(tenant));
            assert_eq!(guard.snapshot().get(), Some(tenant));
        }
        assert_eq!(ctx.get(), None);
    }

    #[test]
    fn test_guard_clears_on_panic() {
        let mut ctx = TenantContext::new();
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _guard = ctx.enter(Some(TenantId::generate()));
            panic!("handler blew up");
        }));

        assert!(result.is_err());
        assert_eq!(ctx.get(), None);
    }

    #[test]
    fn test_enter_without_tenant_leaves_context_empty() {
        let mut ctx = TenantContext::for_tenant(TenantId::generate());
        let guard = ctx.enter(None);
        assert!(!guard.is_resolved());
    }

    #[test]
    fn test_override_does_not_leak_into_outer_context() {
        let outer = TenantId::generate();
        let admin_target = TenantId::generate();
        let ctx = TenantContext::for_tenant(outer);

        {
            let scoped = ctx.with_override(admin_target);
            assert_eq!(scoped.get(), Some(admin_target));
        }
        assert_eq!(ctx.get(), Some(outer));
    }
}
