pub mod error;
pub mod health;
pub mod talent;

// Re-export common types
pub use error::{ApiError, ErrorResponse};
