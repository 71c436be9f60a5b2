// Core modules
pub mod tenant;
pub mod talent;

// Re-export commonly used types
pub use tenant::{Searchable, TenantId, TenantOwned};
pub use talent::{NewTalent, Talent, UpdateTalent};
