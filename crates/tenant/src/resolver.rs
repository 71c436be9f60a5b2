// Tenant resolution step
// Publishes the authenticated principal's tenant into the request context and
// releases it once downstream processing finishes.

use crate::context::TenantContext;
use saas_models::TenantId;
use std::future::Future;

/// Path prefixes that skip tenant resolution entirely.
pub const DEFAULT_EXCLUDED_PREFIXES: &[&str] = &[
    "/api/auth/",
    "/api/public/",
    "/v3/api-docs",
    "/swagger-ui",
    "/health",
];

/// Ordered list of literal path prefixes. First match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionList {
    prefixes: Vec<String>,
}

impl ExclusionList {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a comma separated list, ignoring blank entries.
    pub fn from_csv(value: &str) -> Self {
        Self::new(
            value
                .split(',')
                .map(str::trim)
                .filter(|prefix| !prefix.is_empty()),
        )
    }

    /// First prefix matching `path`, in list order.
    pub fn first_match(&self, path: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .map(String::as_str)
            .find(|prefix| path.starts_with(prefix))
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

impl Default for ExclusionList {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_PREFIXES.iter().copied())
    }
}

/// Outcome of resolving one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Path is on the exclusion list; the step does not run.
    Bypass { prefix: String },
    /// Principal carries a tenant.
    Resolved(TenantId),
    /// No tenant available; context stays empty.
    Anonymous,
}

#[derive(Debug, Clone, Default)]
pub struct TenantResolver {
    exclusions: ExclusionList,
}

impl TenantResolver {
    pub fn new(exclusions: ExclusionList) -> Self {
        Self { exclusions }
    }

    pub fn exclusions(&self) -> &ExclusionList {
        &self.exclusions
    }

    pub fn is_excluded(&self, path: &str) -> Option<&str> {
        self.exclusions.first_match(path)
    }

    pub fn resolve(&self, path: &str, principal_tenant: Option<TenantId>) -> Resolution {
        if let Some(prefix) = self.is_excluded(path) {
            return Resolution::Bypass {
                prefix: prefix.to_string(),
            };
        }
        match principal_tenant {
            Some(tenant_id) => Resolution::Resolved(tenant_id),
            None => Resolution::Anonymous,
        }
    }

    /// Run `downstream` with the tenant of this request published in `ctx`.
    ///
    /// `downstream` receives an owned snapshot of the context. `ctx` is
    /// cleared when this future completes, and also when it is dropped before
    /// completion or unwinds through a panic.
    pub async fn run<F, Fut, T>(
        &self,
        ctx: &mut TenantContext,
        path: &str,
        principal_tenant: Option<TenantId>,
        downstream: F,
    ) -> T
    where
        F: FnOnce(TenantContext) -> Fut,
        Fut: Future<Output = T>,
    {
        let tenant_id = match self.resolve(path, principal_tenant) {
            Resolution::Bypass { prefix } => {
                tracing::trace!(path, prefix = %prefix, "Tenant resolution skipped");
                None
            }
            Resolution::Resolved(tenant_id) => Some(tenant_id),
            Resolution::Anonymous => {
                tracing::debug!(path, "No tenant on principal, context left empty");
                None
            }
        };

        let guard = ctx.enter(tenant_id);
        downstream(guard.snapshot()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_exclusions() {
        let resolver = TenantResolver::default();

        assert_eq!(resolver.is_excluded("/api/auth/login"), Some("/api/auth/"));
        assert_eq!(resolver.is_excluded("/swagger-ui/index.html"), Some("/swagger-ui"));
        assert_eq!(resolver.is_excluded("/health"), Some("/health"));
        assert_eq!(resolver.is_excluded("/api/talents"), None);
        // literal prefix, not a segment match
        assert_eq!(resolver.is_excluded("/api/authors"), None);
    }

    #[test]
    fn test_first_match_wins() {
        let list = ExclusionList::new(["/api/", "/api/public/"]);
        assert_eq!(list.first_match("/api/public/ping"), Some("/api/"));
    }

    #[test]
    fn test_from_csv_skips_blanks() {
        let list = ExclusionList::from_csv(" /api/auth/ ,, /status ");
        assert_eq!(list.prefixes(), &["/api/auth/".to_string(), "/status".to_string()]);
    }

    #[test]
    fn test_resolve() {
        let resolver = TenantResolver::default();
        let tenant = TenantId::generate();

        assert_eq!(
            resolver.resolve("/api/talents", Some(tenant)),
            Resolution::Resolved(tenant)
        );
        assert_eq!(resolver.resolve("/api/talents", None), Resolution::Anonymous);
        assert_eq!(
            resolver.resolve("/api/auth/login", Some(tenant)),
            Resolution::Bypass {
                prefix: "/api/auth/".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_run_publishes_then_clears() {
        let resolver = TenantResolver::default();
        let tenant = TenantId::generate();
        let mut ctx = TenantContext::new();

        let seen = resolver
            .run(&mut ctx, "/api/talents", Some(tenant), |snapshot| async move {
                snapshot.get()
            })
            .await;

        assert_eq!(seen, Some(tenant));
        assert_eq!(ctx.get(), None);
    }

    #[tokio::test]
    async fn test_run_clears_after_error_exit() {
        let resolver = TenantResolver::default();
        let mut ctx = TenantContext::new();

        let result: std::result::Result<(), &str> = resolver
            .run(&mut ctx, "/api/talents", Some(TenantId::generate()), |_| async {
                Err("downstream failed")
            })
            .await;

        assert!(result.is_err());
        assert_eq!(ctx.get(), None);
    }

    #[tokio::test]
    async fn test_reused_context_never_sees_previous_tenant() {
        let resolver = TenantResolver::default();
        let first = TenantId::generate();
        let second = TenantId::generate();

        // One slot reused by two sequential requests on the same task
        let mut slot = TenantContext::new();

        let _: std::result::Result<(), ()> = resolver
            .run(&mut slot, "/api/talents", Some(first), |_| async { Err(()) })
            .await;

        assert_eq!(slot.get(), None, "request 2 must start with an empty context");

        let seen = resolver
            .run(&mut slot, "/api/talents", Some(second), |snapshot| async move {
                snapshot.get()
            })
            .await;
        assert_eq!(seen, Some(second));
        assert_eq!(slot.get(), None);
    }

    #[tokio::test]
    async fn test_cancelled_request_still_releases() {
        let resolver = TenantResolver::default();
        let mut ctx = TenantContext::new();

        {
            let fut = resolver.run(&mut ctx, "/api/talents", Some(TenantId::generate()), |_| {
                std::future::pending::<()>()
            });
            // Poll once so the guard is taken, then drop the future
            let mut fut = std::pin::pin!(fut);
            let timed_out = tokio::time::timeout(std::time::Duration::from_millis(10), &mut fut)
                .await
                .is_err();
            assert!(timed_out);
        }

        assert_eq!(ctx.get(), None);
    }

    #[tokio::test]
    async fn test_bypass_runs_without_tenant() {
        let resolver = TenantResolver::default();
        let mut ctx = TenantContext::new();

        let seen = resolver
            .run(&mut ctx, "/api/auth/login", Some(TenantId::generate()), |snapshot| async move {
                snapshot.get()
            })
            .await;

        assert_eq!(seen, None);
        assert_eq!(ctx.get(), None);
    }

    #[tokio::test]
    async fn test_bypass_drops_stale_tenant_in_slot() {
        let resolver = TenantResolver::default();
        let mut ctx = TenantContext::for_tenant(TenantId::generate());

        let seen = resolver
            .run(&mut ctx, "/api/auth/login", None, |snapshot| async move {
                snapshot.get()
            })
            .await;

        assert_eq!(seen, None);
        assert_eq!(ctx.get(), None);
    }
}
