use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use signet_capture::CaptureError;
use signet_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Request body exceeds {0} bytes")]
    PayloadTooLarge(usize),

    #[error("Invalid image payload: {0}")]
    MalformedPayload(#[from] CaptureError),

    #[error("No signature has been saved yet")]
    NotFound,

    #[error("Storage error: {0}")]
    Storage(StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => Self::NotFound,
            other => Self::Storage(other),
        }
    }
}

impl From<tokio::task::JoinError> for ServiceError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Internal(format!("Storage task failed: {}", e))
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, "InvalidRequest", self.to_string())
            }
            Self::PayloadTooLarge(_) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PayloadTooLarge", self.to_string())
            }
            Self::MalformedPayload(_) => {
                (StatusCode::BAD_REQUEST, "MalformedPayload", self.to_string())
            }
            Self::NotFound => (StatusCode::NOT_FOUND, "NotFound", self.to_string()),
            Self::Storage(_) | Self::Internal(_) => {
                tracing::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalError",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
