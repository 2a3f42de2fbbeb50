//! JSON error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use minirag_core::AppError;
use minirag_knowledge::Notice;
use serde_json::json;

use crate::ask::AskRejection;

/// Error body returned by the JSON API: `{ "error": code, "message": text }`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let (status, code) = match &err {
            AppError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            AppError::Llm(_) => (StatusCode::SERVICE_UNAVAILABLE, "llm_error"),
            AppError::Retrieval(_) => (StatusCode::INTERNAL_SERVER_ERROR, "retrieval_error"),
            AppError::Render(_) => (StatusCode::INTERNAL_SERVER_ERROR, "render_error"),
            AppError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
            AppError::Serialization(_) => (StatusCode::BAD_REQUEST, "serialization_error"),
            AppError::Server(_) | AppError::Other(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        Self::new(status, code, err.to_string())
    }
}

impl From<AskRejection> for ApiError {
    fn from(rejection: AskRejection) -> Self {
        match rejection {
            AskRejection::Failed(err) => Self::from(err),
            other => {
                let notice = other.notice();
                let status = match notice {
                    Notice::DocumentsUnavailable => StatusCode::SERVICE_UNAVAILABLE,
                    _ => StatusCode::BAD_REQUEST,
                };
                Self::new(status, notice.code(), notice.message())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("API error ({}): {}", self.code, self.message);
        } else {
            tracing::debug!("API rejection ({}): {}", self.code, self.message);
        }

        let body = Json(json!({
            "error": self.code,
            "message": self.message,
        }));

        (self.status, body).into_response()
    }
}
