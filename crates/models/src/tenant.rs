use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of one customer organization (tenant).
///
/// Serialized as a bare UUID both on the wire and in the `customer_id`
/// columns, so it can be used directly in `FromRow` models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct TenantId(Uuid);

impl TenantId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for TenantId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TenantId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Capability implemented by every persisted record that belongs to exactly
/// one tenant.
///
/// The constants describe where the owning tenant and the primary key live in
/// storage, so scoped queries can be built for any implementing type without
/// per-entity query code. The tenant returned by [`TenantOwned::tenant_id`]
/// is assigned once at creation and must never change afterwards.
///
/// # Example
/// ```rust,ignore
/// impl TenantOwned for Invoice {
///     type Id = Uuid;
///     const ENTITY: &'static str = "Invoice";
///     const TABLE: &'static str = "invoices";
///     const ID_COLUMN: &'static str = "id";
///     const TENANT_COLUMN: &'static str = "customer_id";
///
///     fn id(&self) -> Uuid { self.id }
///     fn tenant_id(&self) -> TenantId { self.customer_id }
/// }
/// ```
pub trait TenantOwned: Clone + Send + Sync + 'static {
    type Id: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static;

    /// Human readable entity name, used in log lines and error messages.
    const ENTITY: &'static str;
    const TABLE: &'static str;
    const ID_COLUMN: &'static str;
    /// Column holding the owning tenant.
    const TENANT_COLUMN: &'static str;
    /// Column whose value is unique within a tenant, compared
    /// case-insensitively. `None` when the entity has no such key.
    const UNIQUE_COLUMN: Option<&'static str> = None;

    fn id(&self) -> Self::Id;

    fn tenant_id(&self) -> TenantId;

    fn is_owned_by(&self, tenant_id: TenantId) -> bool {
        self.tenant_id() == tenant_id
    }

    /// Lowercased value of [`TenantOwned::UNIQUE_COLUMN`] for this row.
    fn unique_key(&self) -> Option<String> {
        None
    }
}

/// Entities that support case-insensitive keyword search.
pub trait Searchable: TenantOwned {
    /// Text columns a keyword is matched against.
    const SEARCH_COLUMNS: &'static [&'static str];

    fn matches_keyword(&self, keyword: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_id_roundtrips_through_string() {
        let tenant = TenantId::generate();
        let parsed: TenantId = tenant.to_string().parse().expect("valid uuid");
        assert_eq!(parsed, tenant);
    }

    #[test]
    fn test_tenant_id_serializes_as_bare_uuid() {
        let uuid = Uuid::new_v4();
        let json = serde_json::to_string(&TenantId::new(uuid)).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
    }

    #[test]
    fn test_invalid_tenant_id_is_rejected() {
        assert!("not-a-tenant".parse::<TenantId>().is_err());
    }
}
