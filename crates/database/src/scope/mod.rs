//! Tenant-scoped data access.
//!
//! [`ScopeFilter`] is the generic "belongs to current tenant" predicate and
//! [`TenantScopedRepository`] is the decorator that injects it into every
//! read, count, write and delete going to an [`crate::EntityStore`].
//!
//! # Policy
//!
//! - Missing tenant in the context: every operation fails closed with
//!   `DatabaseError::UnresolvedTenant` before any query is issued.
//! - Rows owned by another tenant are indistinguishable from missing rows.

mod filter;
mod repository;

pub use filter::ScopeFilter;
pub use repository::TenantScopedRepository;
