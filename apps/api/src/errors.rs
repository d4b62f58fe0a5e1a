use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::DocumentKind;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Please provide either a file or text input")]
    MissingInput,

    #[error("Unsupported file format. Please upload PDF, DOCX, or TXT file.")]
    UnsupportedFormat,

    #[error("Error reading {kind}: {message}")]
    CorruptDocument { kind: DocumentKind, message: String },

    #[error("File is too large. Max size is {max_bytes} bytes")]
    FileTooLarge { max_bytes: usize },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        };
        error_response(status, self.to_string())
    }
}

/// Builds the `{error, message, timestamp}` envelope shared by every failure path.
pub fn error_response(status: StatusCode, message: String) -> Response {
    let label = if status.is_server_error() {
        "Internal server error"
    } else {
        "Bad request"
    };

    let body = Json(json!({
        "error": label,
        "message": message,
        "timestamp": crate::routes::health::utc_timestamp(),
    }));

    (status, body).into_response()
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: Box<dyn Any + Send + 'static>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
