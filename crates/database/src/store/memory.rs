use crate::error::{DatabaseError, Result};
use crate::scope::ScopeFilter;
use crate::store::EntityStore;
use async_trait::async_trait;
use saas_models::{Searchable, TenantOwned};
use tokio::sync::RwLock;

/// Process-local store, in insertion order.
///
/// Used by tests and by the API server when no database is configured.
#[derive(Debug)]
pub struct InMemoryStore<E> {
    rows: RwLock<Vec<E>>,
}

impl<E> InMemoryStore<E> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    pub fn with_rows(rows: Vec<E>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    /// Total rows across all tenants.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

impl<E> Default for InMemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: TenantOwned> EntityStore<E> for InMemoryStore<E> {
    async fn find_where(&self, filter: &ScopeFilter<E>) -> Result<Vec<E>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|row| filter.matches(row)).cloned().collect())
    }

    async fn count_where(&self, filter: &ScopeFilter<E>) -> Result<i64> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|row| filter.matches(row)).count() as i64)
    }

    async fn search_where(&self, filter: &ScopeFilter<E>, keyword: &str) -> Result<Vec<E>>
    where
        E: Searchable,
    {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|row| filter.matches(row) && row.matches_keyword(keyword))
            .cloned()
            .collect())
    }

    async fn find_by_unique_key(&self, filter: &ScopeFilter<E>, key: &str) -> Result<Option<E>> {
        let key = key.to_lowercase();
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|row| filter.matches(row) && row.unique_key().as_deref() == Some(key.as_str()))
            .cloned())
    }

    async fn save(&self, entity: E) -> Result<E> {
        let mut rows = self.rows.write().await;

        // Unique key is checked under the write lock
        if let (Some(column), Some(key)) = (E::UNIQUE_COLUMN, entity.unique_key()) {
            let taken = rows.iter().any(|row| {
                row.id() != entity.id()
                    && row.tenant_id() == entity.tenant_id()
                    && row.unique_key().as_deref() == Some(key.as_str())
            });
            if taken {
                return Err(DatabaseError::duplicate(E::ENTITY, column));
            }
        }

        match rows.iter_mut().find(|row| row.id() == entity.id()) {
            Some(existing) if existing.tenant_id() != entity.tenant_id() => {
                Err(DatabaseError::ownership(E::ENTITY, &entity.id().to_string()))
            }
            Some(existing) => {
                *existing = entity.clone();
                Ok(entity)
            }
            None => {
                rows.push(entity.clone());
                Ok(entity)
            }
        }
    }

    async fn delete_where(&self, filter: &ScopeFilter<E>) -> Result<u64> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| !filter.matches(row));
        Ok((before - rows.len()) as u64)
    }
}
