//! API error types with structured JSON responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pixflow_io::IoError;
use pixflow_ops::OpsError;
use serde::Serialize;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// The error.
    pub error: ErrorDetail,
}

/// Machine-readable code plus a human-readable message.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Stable code, e.g. `DECODE_FAILED`.
    pub code: &'static str,
    /// Description of what went wrong.
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed query string.
    #[error("invalid request: {0}")]
    BadRequest(String),
    /// The body is not a decodable PNG or JPEG.
    #[error("cannot decode image: {0}")]
    Decode(String),
    /// The decoded image cannot be normalized to RGBA8.
    #[error("unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),
    /// Kernel size, spread or stage order rejected.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// Only `POST` is routed.
    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),
    /// Body exceeds the configured limit.
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),
    /// Encoding failure, worker failure or other server-side fault.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status and stable code for this error.
    pub fn status_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Decode(_) => (StatusCode::BAD_REQUEST, "DECODE_FAILED"),
            ApiError::UnsupportedPixelFormat(_) => {
                (StatusCode::BAD_REQUEST, "UNSUPPORTED_PIXEL_FORMAT")
            }
            ApiError::InvalidParameter(_) => (StatusCode::BAD_REQUEST, "INVALID_PARAMETER"),
            ApiError::MethodNotAllowed(_) => (StatusCode::METHOD_NOT_ALLOWED, "METHOD_NOT_ALLOWED"),
            ApiError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_code();
        let message = match &self {
            ApiError::Internal(detail) => {
                tracing::error!(detail, "request failed");
                "An internal error occurred".to_string()
            }
            ApiError::BadRequest(detail)
            | ApiError::Decode(detail)
            | ApiError::UnsupportedPixelFormat(detail)
            | ApiError::InvalidParameter(detail)
            | ApiError::MethodNotAllowed(detail)
            | ApiError::PayloadTooLarge(detail) => {
                tracing::warn!(code, detail, "request rejected");
                detail.clone()
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<IoError> for ApiError {
    fn from(err: IoError) -> Self {
        match err {
            IoError::UnsupportedFormat(_) | IoError::DecodeError(_) => {
                ApiError::Decode(err.to_string())
            }
            IoError::Core(e) => ApiError::UnsupportedPixelFormat(e.to_string()),
            IoError::EncodeError(_) | IoError::Io(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<pixflow_core::Error> for ApiError {
    fn from(err: pixflow_core::Error) -> Self {
        match err {
            pixflow_core::Error::InvalidParameter(msg) => ApiError::InvalidParameter(msg),
            other => ApiError::UnsupportedPixelFormat(other.to_string()),
        }
    }
}

impl From<OpsError> for ApiError {
    fn from(err: OpsError) -> Self {
        match err {
            OpsError::InvalidParameter(msg) => ApiError::InvalidParameter(msg),
            OpsError::UnsupportedPixelFormat(msg) => ApiError::UnsupportedPixelFormat(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}
