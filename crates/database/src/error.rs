use saas_tenant::TenantError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("No tenant resolved for a tenant-scoped operation")]
    UnresolvedTenant,

    // Never shown to clients; surfaced as not found
    #[error("Ownership violation: {0}")]
    OwnershipViolation(String),

    #[error("Database error: {0}")]
    Other(String),
}

impl DatabaseError {
    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::NotFound(format!("{} with id {} not found", entity, id))
    }

    pub fn duplicate(entity: &str, field: &str) -> Self {
        Self::DuplicateEntry(format!("{} with {} already exists", entity, field))
    }

    pub fn ownership(entity: &str, id: &str) -> Self {
        Self::OwnershipViolation(format!("{} {} is owned by another tenant", entity, id))
    }

    /// Errors that must look identical to "not found" at the response boundary.
    pub fn is_not_found_like(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::OwnershipViolation(_))
    }
}

impl From<TenantError> for DatabaseError {
    fn from(err: TenantError) -> Self {
        match err {
            TenantError::Unresolved => Self::UnresolvedTenant,
        }
    }
}
