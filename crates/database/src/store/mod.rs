//! Storage seam underneath the tenant-scoped repository.
//!
//! An [`EntityStore`] executes queries for one entity type and always ANDs the
//! supplied [`ScopeFilter`] into them. It never decides *which* tenant to use;
//! that is the job of [`crate::TenantScopedRepository`].

pub mod memory;
pub mod postgres;

use crate::error::Result;
use crate::scope::ScopeFilter;
use async_trait::async_trait;
use saas_models::{Searchable, TenantOwned};

pub use memory::InMemoryStore;
pub use postgres::{PgEntity, PgStore};

#[async_trait]
pub trait EntityStore<E: TenantOwned>: Send + Sync {
    async fn find_where(&self, filter: &ScopeFilter<E>) -> Result<Vec<E>>;

    async fn count_where(&self, filter: &ScopeFilter<E>) -> Result<i64>;

    /// Rows matching `filter` whose searchable columns contain `keyword`.
    async fn search_where(&self, filter: &ScopeFilter<E>, keyword: &str) -> Result<Vec<E>>
    where
        E: Searchable;

    /// Row matching `filter` whose [`TenantOwned::UNIQUE_COLUMN`] equals
    /// `key`, ignoring case. Always `None` for entities without a unique key.
    async fn find_by_unique_key(&self, filter: &ScopeFilter<E>, key: &str) -> Result<Option<E>>;

    /// Insert or replace by id.
    ///
    /// Replacing a row that is stored under a different tenant than
    /// `entity.tenant_id()` must fail with `OwnershipViolation` and leave the
    /// stored row unchanged. A second row of the same tenant with the same
    /// unique key must fail with `DuplicateEntry`.
    async fn save(&self, entity: E) -> Result<E>;

    /// Delete every row matching `filter`, returning the number removed.
    async fn delete_where(&self, filter: &ScopeFilter<E>) -> Result<u64>;
}
