use crate::error::{DatabaseError, Result};
use crate::scope::ScopeFilter;
use crate::store::EntityStore;
use saas_models::{Searchable, TenantId, TenantOwned};
use saas_tenant::TenantContext;
use std::marker::PhantomData;

/// Decorator over an [`EntityStore`] that confines every operation to the
/// tenant in the caller's [`TenantContext`].
pub struct TenantScopedRepository<E, S> {
    store: S,
    _entity: PhantomData<fn() -> E>,
}

impl<E, S> TenantScopedRepository<E, S>
where
    E: TenantOwned,
    S: EntityStore<E>,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn current_tenant(&self, ctx: &TenantContext, operation: &str) -> Result<TenantId> {
        ctx.get().ok_or_else(|| {
            tracing::warn!(
                entity = E::ENTITY,
                operation,
                "Rejected tenant-scoped operation without a resolved tenant"
            );
            DatabaseError::UnresolvedTenant
        })
    }

    fn scope(&self, ctx: &TenantContext, operation: &str) -> Result<ScopeFilter<E>> {
        self.current_tenant(ctx, operation)
            .map(ScopeFilter::for_tenant)
    }

    /// All rows owned by the current tenant.
    pub async fn find_all(&self, ctx: &TenantContext) -> Result<Vec<E>> {
        let filter = self.scope(ctx, "find_all")?;
        self.store.find_where(&filter).await
    }

    /// Rows among `ids` owned by the current tenant. Foreign or missing ids
    /// are silently absent from the result.
    pub async fn find_all_by_id<I>(&self, ctx: &TenantContext, ids: I) -> Result<Vec<E>>
    where
        I: IntoIterator<Item = E::Id> + Send,
    {
        let filter = self.scope(ctx, "find_all_by_id")?.with_ids(ids);
        if filter.is_deny_all() {
            return Ok(Vec::new());
        }
        self.store.find_where(&filter).await
    }

    /// `None` both for a missing id and for an id owned by another tenant.
    pub async fn find_by_id(&self, ctx: &TenantContext, id: E::Id) -> Result<Option<E>> {
        let rows = self.find_all_by_id(ctx, [id]).await?;
        Ok(rows.into_iter().next())
    }

    /// Like [`Self::find_by_id`] but maps absence to `DatabaseError::NotFound`.
    pub async fn get_by_id(&self, ctx: &TenantContext, id: E::Id) -> Result<E> {
        self.find_by_id(ctx, id)
            .await?
            .ok_or_else(|| DatabaseError::not_found(E::ENTITY, &id.to_string()))
    }

    /// Row of the current tenant holding `key` in the entity's unique column.
    pub async fn find_by_unique_key(&self, ctx: &TenantContext, key: &str) -> Result<Option<E>> {
        let filter = self.scope(ctx, "find_by_unique_key")?;
        self.store.find_by_unique_key(&filter, key).await
    }

    /// Number of rows owned by the current tenant.
    pub async fn count(&self, ctx: &TenantContext) -> Result<i64> {
        let filter = self.scope(ctx, "count")?;
        self.store.count_where(&filter).await
    }

    /// Keyword search restricted to the current tenant.
    pub async fn search(&self, ctx: &TenantContext, keyword: &str) -> Result<Vec<E>>
    where
        E: Searchable,
    {
        let filter = self.scope(ctx, "search")?;
        self.store.search_where(&filter, keyword).await
    }

    /// Create or update `entity`.
    ///
    /// Tenancy is never injected here: the caller stamps the owner before the
    /// first save. The entity must belong to the current tenant, and the
    /// store rejects replacing a row held by a different owner, so an update
    /// only goes through when the stored row, the entity and the context all
    /// name the same tenant.
    pub async fn save(&self, ctx: &TenantContext, entity: E) -> Result<E> {
        let tenant_id = self.current_tenant(ctx, "save")?;

        if !entity.is_owned_by(tenant_id) {
            tracing::warn!(
                entity = E::ENTITY,
                id = %entity.id(),
                tenant_id = %tenant_id,
                "Refused to save entity stamped with another tenant"
            );
            return Err(DatabaseError::ownership(E::ENTITY, &entity.id().to_string()));
        }

        let id = entity.id();
        self.store.save(entity).await.inspect_err(|e| {
            if matches!(e, DatabaseError::OwnershipViolation(_)) {
                tracing::warn!(
                    entity = E::ENTITY,
                    id = %id,
                    tenant_id = %tenant_id,
                    "Refused to overwrite row owned by another tenant"
                );
            }
        })
    }

    /// Delete `id` if the current tenant owns it.
    ///
    /// A foreign id yields the same `NotFound` as a missing one.
    pub async fn delete(&self, ctx: &TenantContext, id: E::Id) -> Result<()> {
        let tenant_id = self.current_tenant(ctx, "delete")?;

        if self.find_by_id(ctx, id).await?.is_none() {
            return Err(DatabaseError::not_found(E::ENTITY, &id.to_string()));
        }

        let filter = ScopeFilter::for_tenant(tenant_id).with_ids([id]);
        match self.store.delete_where(&filter).await? {
            0 => Err(DatabaseError::not_found(E::ENTITY, &id.to_string())),
            _ => {
                tracing::debug!(entity = E::ENTITY, id = %id, tenant_id = %tenant_id, "Deleted");
                Ok(())
            }
        }
    }
}
