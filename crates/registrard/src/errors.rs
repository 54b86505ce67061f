use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use registrar_core::ServiceError;
use serde_json::json;
use std::fmt;

pub type AppResult<T> = Result<T, AppError>;

/// Message returned for request bodies that do not decode
pub const BAD_BODY_MESSAGE: &str = "Error processing request, expected {domain: string}";

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "message": self.message,
                "status": self.status.as_u16(),
            }
        }));

        (self.status, body).into_response()
    }
}

// Every classified failure surfaces as a 500; the kind only drives logging
impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        tracing::error!(kind = %err.kind(), status = ?err.status(), "request failed: {}", err);
        Self::internal(err.message())
    }
}

impl AppError {
    /// 400 for a request body that does not decode
    pub fn malformed_body(err: serde_json::Error) -> Self {
        tracing::warn!("rejected request body: {}", err);
        Self::bad_request(BAD_BODY_MESSAGE)
    }
}
