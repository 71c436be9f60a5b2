use crate::handlers::{ApiError, ErrorResponse};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use saas_auth::{Claims, JwtService};
use saas_models::TenantId;
use std::sync::Arc;
use uuid::Uuid;

/// Authenticated user context
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    /// Customer the user belongs to. `None` for principals without one.
    pub customer_id: Option<TenantId>,
    pub email: String,
    pub role: Option<String>,
}

impl TryFrom<Claims> for AuthUser {
    type Error = ApiError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let user_id = claims
            .user_id()
            .map_err(|_| unauthorized("invalid_token", "Invalid user ID in token"))?;

        Ok(Self {
            user_id,
            customer_id: claims.tenant_id(),
            email: claims.email,
            role: claims.role,
        })
    }
}

fn unauthorized(error: &str, message: &str) -> ApiError {
    (StatusCode::UNAUTHORIZED, Json(ErrorResponse::new(error, message)))
}

/// Extract the bearer token from the Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("missing_auth_header", "Authorization header is required"))?
        .to_str()
        .map_err(|_| unauthorized("invalid_auth_header", "Invalid Authorization header format"))?;

    auth_header
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            unauthorized(
                "invalid_auth_scheme",
                "Authorization header must use Bearer scheme",
            )
        })
}

/// Validate JWT and return claims
pub fn validate_token(jwt: &JwtService, token: &str) -> Result<Claims, ApiError> {
    jwt.validate_access_token(token).map_err(|e| {
        tracing::debug!("Token validation failed: {}", e);
        unauthorized("invalid_token", "Invalid or expired token")
    })
}

/// Middleware to require authentication
pub async fn require_auth(
    State(state): State<Arc<crate::AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers)?;
    let claims = validate_token(&state.jwt, token)?;
    let user = AuthUser::try_from(claims)?;

    tracing::debug!(
        user_id = %user.user_id,
        email = %user.email,
        role = user.role.as_deref().unwrap_or("none"),
        "Authenticated request"
    );

    // Add user context to request extensions
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
