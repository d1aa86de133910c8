//! API error handling
//!
//! Maps pipeline outcomes to status codes. Internal failures never carry
//! their cause to the caller; it is logged instead.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use weatherchat_core::ChatError;

/// Message returned for every 500.
pub const INTERNAL_ERROR_MESSAGE: &str = "Erro interno do servidor";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
    /// Machine-readable code
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Validation(msg) => Self::BadRequest(msg),
            err @ ChatError::NotFound { .. } => Self::NotFound(err.to_string()),
            err @ ChatError::Upstream(_) => Self::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weatherchat_core::{LlmError, WeatherError};

    #[test]
    fn chat_errors_map_to_status_classes() {
        let cases = [
            (ChatError::missing_prompt(), StatusCode::BAD_REQUEST),
            (ChatError::unresolved_city(), StatusCode::BAD_REQUEST),
            (
                ChatError::NotFound {
                    city: "Lisboa".into(),
                    source: WeatherError::RequestFailed("timeout".into()),
                },
                StatusCode::NOT_FOUND,
            ),
            (ChatError::Upstream(LlmError::EmptyResponse), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn not_found_keeps_city_in_message() {
        let err = ApiError::from(ChatError::NotFound {
            city: "Lisboa".into(),
            source: WeatherError::CityNotFound("Lisboa".into()),
        });
        assert!(matches!(err, ApiError::NotFound(msg) if msg.contains("Lisboa")));
    }

    #[test]
    fn error_response_serialization() {
        let resp = ErrorResponse {
            error: "Bad request".to_string(),
            code: "bad_request".to_string(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Bad request", "code": "bad_request" }));
    }
}
