use saas_database::DatabaseError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    // Covers both missing rows and rows owned by another customer
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("No tenant resolved for this request")]
    UnresolvedTenant,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub(crate) fn from_database(entity: &'static str, err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(_) | DatabaseError::OwnershipViolation(_) => {
                Self::NotFound(entity)
            }
            DatabaseError::UnresolvedTenant => Self::UnresolvedTenant,
            DatabaseError::DuplicateEntry(msg) => Self::Duplicate(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::Validation(err.to_string())
    }
}
