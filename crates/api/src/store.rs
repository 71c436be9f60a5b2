use async_trait::async_trait;
use saas_database::{EntityStore, InMemoryStore, PgStore, Result, ScopeFilter};
use saas_models::Talent;

/// Backing store picked at startup: Postgres when `DATABASE_URL` is set,
/// process memory otherwise.
pub enum TalentStore {
    Memory(InMemoryStore<Talent>),
    Postgres(PgStore<Talent>),
}

impl TalentStore {
    pub fn backend(&self) -> &'static str {
        match self {
            TalentStore::Memory(_) => "memory",
            TalentStore::Postgres(_) => "postgres",
        }
    }
}

#[async_trait]
impl EntityStore<Talent> for TalentStore {
    async fn find_where(&self, filter: &ScopeFilter<Talent>) -> Result<Vec<Talent>> {
        match self {
            TalentStore::Memory(store) => store.find_where(filter).await,
            TalentStore::Postgres(store) => store.find_where(filter).await,
        }
    }

    async fn count_where(&self, filter: &ScopeFilter<Talent>) -> Result<i64> {
        match self {
            TalentStore::Memory(store) => store.count_where(filter).await,
            TalentStore::Postgres(store) => store.count_where(filter).await,
        }
    }

    async fn search_where(
        &self,
        filter: &ScopeFilter<Talent>,
        keyword: &str,
    ) -> Result<Vec<Talent>> {
        match self {
            TalentStore::Memory(store) => store.search_where(filter, keyword).await,
            TalentStore::Postgres(store) => store.search_where(filter, keyword).await,
        }
    }

    async fn find_by_unique_key(
        &self,
        filter: &ScopeFilter<Talent>,
        key: &str,
    ) -> Result<Option<Talent>> {
        match self {
            TalentStore::Memory(store) => store.find_by_unique_key(filter, key).await,
            TalentStore::Postgres(store) => store.find_by_unique_key(filter, key).await,
        }
    }

    async fn save(&self, entity: Talent) -> Result<Talent> {
        match self {
            TalentStore::Memory(store) => store.save(entity).await,
            TalentStore::Postgres(store) => store.save(entity).await,
        }
    }

    async fn delete_where(&self, filter: &ScopeFilter<Talent>) -> Result<u64> {
        match self {
            TalentStore::Memory(store) => store.delete_where(filter).await,
            TalentStore::Postgres(store) => store.delete_where(filter).await,
        }
    }
}
