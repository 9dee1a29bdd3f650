//! Service-layer error type and its HTTP mapping.
//!
//! Every service operation returns `Result<_, ApiError>`; the axum
//! layer turns the failure class into a status code and a structured
//! `{ "success": false, "error": ... }` body. Nothing propagates to the
//! client uncaught.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input, rejected before any store or provider call.
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("{0}")]
    Forbidden(String),

    /// The referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A downstream provider failed in a way we could not work around.
    #[error("provider error: {0}")]
    Provider(String),

    /// Database failure. Details are logged, not returned.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Anything else. Details are logged, not returned.
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Provider(_) => StatusCode::BAD_GATEWAY,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Database(e) => tracing::error!(error = %e, "Database error"),
            ApiError::Internal(e) => tracing::error!(error = %e, "Internal error"),
            _ => {}
        }
        let body = Json(serde_json::json!({
            "success": false,
            "error": self.to_string(),
        }));
        (self.status(), body).into_response()
    }
}

/// Result alias for service operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_matches_taxonomy() {
        assert_eq!(
            ApiError::Validation("bad phone".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("lead").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Provider("timeout".into()).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn not_found_message_names_the_entity() {
        assert_eq!(ApiError::NotFound("lead").to_string(), "lead not found");
    }

    #[test]
    fn database_error_hides_details() {
        let err = ApiError::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(err.to_string(), "database error");
    }
}
