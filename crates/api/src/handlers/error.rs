use axum::{http::StatusCode, Json};
use saas_talent::ServiceError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
        }
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn not_found() -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("not_found", "Resource not found")),
    )
}

pub fn tenant_required() -> ApiError {
    (
        StatusCode::FORBIDDEN,
        Json(ErrorResponse::new(
            "tenant_required",
            "This operation requires a customer account",
        )),
    )
}

/// Map a service failure onto the wire.
///
/// Missing and foreign-owned records produce the exact same response so a
/// caller cannot probe for ids that belong to other customers. Internal
/// details are logged, never returned.
pub fn service_error(err: ServiceError) -> ApiError {
    match err {
        ServiceError::NotFound(_) => not_found(),
        ServiceError::UnresolvedTenant => tenant_required(),
        ServiceError::Validation(msg) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("validation_error", &msg)),
        ),
        ServiceError::Duplicate(msg) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("duplicate_entry", &msg)),
        ),
        ServiceError::Internal(msg) => {
            tracing::error!("Request failed: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(
                    "internal_error",
                    "An unexpected error occurred",
                )),
            )
        }
    }
}
