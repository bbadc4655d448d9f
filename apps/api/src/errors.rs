use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// No provider credential. Nothing was sent upstream.
    #[error("LLM not configured: {0}")]
    LlmNotConfigured(String),

    /// The provider call failed or returned something unreadable.
    #[error("Upstream error: {detail}")]
    Upstream { status: Option<u16>, detail: String },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Configuration(msg) => AppError::LlmNotConfigured(msg),
            LlmError::Upstream { status, body } => AppError::Upstream {
                status: Some(status),
                detail: body,
            },
            other => AppError::Upstream {
                status: None,
                detail: other.to_string(),
            },
        }
    }
}

/// Malformed bodies, unknown enum values and missing fields are client errors.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::LlmNotConfigured(msg) => {
                tracing::error!("LLM not configured: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "LLM_NOT_CONFIGURED",
                    "The AI provider is not configured on this server".to_string(),
                )
            }
            AppError::Upstream { status, detail } => {
                tracing::error!("Upstream error (status {status:?}): {detail}");
                let message = match status {
                    Some(code) => format!("The AI provider returned an error (status {code})"),
                    None => "The AI provider returned an unreadable response".to_string(),
                };
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", message)
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_maps_to_503() {
        let err: AppError = LlmError::Configuration("GEMINI_API_KEY is not set".to_string()).into();
        assert!(matches!(err, AppError::LlmNotConfigured(_)));
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_upstream_status_maps_to_502() {
        let err: AppError = LlmError::Upstream {
            status: 500,
            body: "internal".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Upstream { status: Some(500), .. }));
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_invalid_envelope_maps_to_502_without_status() {
        let err: AppError = LlmError::InvalidEnvelope("no text".to_string()).into();
        assert!(matches!(err, AppError::Upstream { status: None, .. }));
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let response = AppError::Validation("prompt_text cannot be empty".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
