// Talent management on top of the tenant-scoped repository

pub mod error;
pub mod service;

pub use error::{Result, ServiceError};
pub use service::TalentService;
