pub mod connection;
pub mod error;
pub mod repositories;
pub mod scope;
pub mod store;

pub use connection::{Database, DatabaseConfig, DEFAULT_DATABASE_URL};
pub use error::{DatabaseError, Result};
pub use repositories::talents::TalentRepository;
pub use scope::{ScopeFilter, TenantScopedRepository};
pub use store::{EntityStore, InMemoryStore, PgEntity, PgStore};
