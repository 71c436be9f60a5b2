use crate::handlers::error::{service_error, tenant_required, ApiError};
use crate::middleware::AuthUser;
use crate::AppState;
use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use saas_models::{NewTalent, Talent, TenantId, UpdateTalent};
use saas_tenant::TenantContext;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    fn ok(message: &str, data: T) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data: Some(data),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub keyword: String,
}

fn customer_of(user: &AuthUser) -> Result<TenantId, ApiError> {
    user.customer_id.ok_or_else(tenant_required)
}

/// List the caller's talents
/// GET /api/talents
pub async fn list_talents(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<TenantContext>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Talent>>, ApiError> {
    let customer_id = customer_of(&user)?;

    let talents = state
        .talents
        .list(&ctx, customer_id)
        .await
        .map_err(service_error)?;

    Ok(Json(talents))
}

/// GET /api/talents/:id
pub async fn get_talent(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<TenantContext>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Talent>, ApiError> {
    let customer_id = customer_of(&user)?;

    let talent = state
        .talents
        .get(&ctx, id, customer_id)
        .await
        .map_err(service_error)?;

    Ok(Json(talent))
}

/// POST /api/talents
pub async fn create_talent(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<TenantContext>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<NewTalent>,
) -> Result<(StatusCode, Json<ApiResponse<Talent>>), ApiError> {
    let customer_id = customer_of(&user)?;

    let talent = state
        .talents
        .create(&ctx, customer_id, request)
        .await
        .map_err(service_error)?;

    tracing::debug!(talent_id = %talent.id, user_id = %user.user_id, "Talent created via API");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Talent created successfully", talent)),
    ))
}

/// PUT /api/talents/:id
pub async fn update_talent(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<TenantContext>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTalent>,
) -> Result<Json<ApiResponse<Talent>>, ApiError> {
    let customer_id = customer_of(&user)?;

    let talent = state
        .talents
        .update(&ctx, id, customer_id, request)
        .await
        .map_err(service_error)?;

    Ok(Json(ApiResponse::ok("Talent updated successfully", talent)))
}

/// DELETE /api/talents/:id
pub async fn delete_talent(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<TenantContext>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let customer_id = customer_of(&user)?;

    state
        .talents
        .delete(&ctx, id, customer_id)
        .await
        .map_err(service_error)?;

    Ok(Json(ApiResponse::ok("Talent deleted successfully", ())))
}

/// Keyword search over name, email and skills
/// GET /api/talents/search?keyword=
pub async fn search_talents(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<TenantContext>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Talent>>, ApiError> {
    let customer_id = customer_of(&user)?;

    let talents = state
        .talents
        .search(&ctx, customer_id, &query.keyword)
        .await
        .map_err(service_error)?;

    Ok(Json(talents))
}

/// GET /api/talents/count
pub async fn count_talents(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<TenantContext>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<i64>>, ApiError> {
    let customer_id = customer_of(&user)?;

    let count = state
        .talents
        .count(&ctx, customer_id)
        .await
        .map_err(service_error)?;

    Ok(Json(ApiResponse::ok("Talent count retrieved", count)))
}
