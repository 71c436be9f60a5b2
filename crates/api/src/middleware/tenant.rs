use crate::middleware::auth::AuthUser;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use saas_tenant::TenantContext;
use std::sync::Arc;

/// Publish the caller's tenant for the rest of the request.
///
/// Runs after [`super::require_auth`]. Each request gets its own
/// [`TenantContext`]; handlers read it from the request extensions. The
/// context is cleared when the downstream future finishes, fails or is
/// dropped.
pub async fn resolve_tenant(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let principal_tenant = request
        .extensions()
        .get::<AuthUser>()
        .and_then(|user| user.customer_id);

    let mut ctx = TenantContext::new();
    state
        .resolver
        .run(&mut ctx, &path, principal_tenant, |snapshot| {
            request.extensions_mut().insert(snapshot);
            next.run(request)
        })
        .await
}
