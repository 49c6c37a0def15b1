//! HTTP error mapping. Every failure renders as `{"message": "..."}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use swift_core::SwiftError;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub struct AppError(pub SwiftError);

impl From<SwiftError> for AppError {
    fn from(e: SwiftError) -> Self {
        Self(e)
    }
}

impl AppError {
    fn message(&self) -> String {
        match &self.0 {
            SwiftError::NotFound(subject) => format!("{subject} not found"),
            SwiftError::DuplicateKey(detail) => format!("SWIFT code already exists ({detail})"),
            SwiftError::Validation(msg) => msg.clone(),
            SwiftError::StoreUnavailable(_) => "Something went wrong!".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = ?self.0, "request failed");
        }
        (status, Json(MessageResponse::new(self.message()))).into_response()
    }
}
