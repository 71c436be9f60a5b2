pub mod auth;
pub mod tenant;

pub use auth::{require_auth, AuthUser};
pub use tenant::resolve_tenant;
