// Tenant context propagation and per-request resolution

pub mod context;
pub mod error;
pub mod resolver;

pub use context::{TenantContext, TenantGuard};
pub use error::{Result, TenantError};
pub use resolver::{ExclusionList, Resolution, TenantResolver, DEFAULT_EXCLUDED_PREFIXES};
