use saas_models::{TenantId, TenantOwned};
use saas_tenant::TenantContext;
use std::collections::HashSet;
use std::fmt;

/// Tenant predicate for one entity type.
///
/// Built purely from the [`TenantOwned`] metadata of `E`, so the same filter
/// works for every tenant-owned entity.
///
/// # Policy
///
/// | Tenant | Ids | Matches |
/// |--------|-----|---------|
/// | none | any | nothing (deny all) |
/// | `t` | none | rows with `tenant = t` |
/// | `t` | `{..}` | rows with `tenant = t AND id IN {..}` |
/// | `t` | `{}` | nothing |
pub struct ScopeFilter<E: TenantOwned> {
    tenant_id: Option<TenantId>,
    ids: Option<Vec<E::Id>>,
}

impl<E: TenantOwned> ScopeFilter<E> {
    pub fn for_tenant(tenant_id: TenantId) -> Self {
        Self {
            tenant_id: Some(tenant_id),
            ids: None,
        }
    }

    /// Filter for the tenant in `ctx`; an empty context yields a deny-all filter.
    pub fn for_context(ctx: &TenantContext) -> Self {
        Self {
            tenant_id: ctx.get(),
            ids: None,
        }
    }

    /// Matches nothing.
    pub fn deny_all() -> Self {
        Self {
            tenant_id: None,
            ids: None,
        }
    }

    /// Further restrict to the given identifiers.
    pub fn with_ids<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = E::Id>,
    {
        let mut seen = HashSet::new();
        self.ids = Some(ids.into_iter().filter(|id| seen.insert(*id)).collect());
        self
    }

    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    pub fn ids(&self) -> Option<&[E::Id]> {
        self.ids.as_deref()
    }

    pub fn is_deny_all(&self) -> bool {
        self.tenant_id.is_none() || self.ids.as_ref().is_some_and(|ids| ids.is_empty())
    }

    pub fn matches(&self, entity: &E) -> bool {
        let Some(tenant_id) = self.tenant_id else {
            return false;
        };
        if entity.tenant_id() != tenant_id {
            return false;
        }
        match &self.ids {
            Some(ids) => ids.contains(&entity.id()),
            None => true,
        }
    }
}

impl<E: TenantOwned> Clone for ScopeFilter<E> {
    fn clone(&self) -> Self {
        Self {
            tenant_id: self.tenant_id,
            ids: self.ids.clone(),
        }
    }
}

impl<E: TenantOwned> fmt::Debug for ScopeFilter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeFilter")
            .field("entity", &E::ENTITY)
            .field("tenant_id", &self.tenant_id)
            .field("ids", &self.ids)
            .finish()
    }
}
