//! Join gateway error types.
//!
//! Every failure leaves the server as `{"error": {"message": ...}}`. Domain
//! errors from the lower crates convert into [`ApiError`] with their message
//! intact.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use du_01_signed_request::SignedRequestError;
use du_02_join_orchestrator::{JoinError, RejectedJoinRequest};
use serde::Serialize;
use shared_types::{AddressError, ChainError};
use std::fmt;

/// HTTP-facing error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: ErrorBody<'a>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 400: anything wrong with the request or the join
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 413: body over `max_request_size`
    pub fn payload_too_large(limit: usize) -> Self {
        Self::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            format!("Request body exceeds limit of {limit} bytes"),
        )
    }

    pub fn not_found(path: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("Not found: {path}"))
    }

    /// 500: the detail is logged, not returned
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }

    /// The response body as a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "error": { "message": self.message } })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorEnvelope {
            error: ErrorBody {
                message: &self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

impl From<SignedRequestError> for ApiError {
    fn from(e: SignedRequestError) -> Self {
        Self::bad_request(e.to_string())
    }
}

impl From<AddressError> for ApiError {
    fn from(e: AddressError) -> Self {
        Self::bad_request(e.to_string())
    }
}

impl From<ChainError> for ApiError {
    fn from(e: ChainError) -> Self {
        Self::bad_request(e.to_string())
    }
}

impl From<RejectedJoinRequest> for ApiError {
    fn from(e: RejectedJoinRequest) -> Self {
        Self::bad_request(e.to_string())
    }
}

/// Retrieval, join and configuration errors all answer 400; a missing
/// chain client is still reported with its message so operators see it.
impl From<JoinError> for ApiError {
    fn from(e: JoinError) -> Self {
        Self::bad_request(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::bad_request(format!("Malformed request body: {e}"))
    }
}

/// Gateway-level errors (startup and serving, not per-request)
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Server stopped with an I/O error
    #[error("server error: {0}")]
    Server(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_shape() {
        let err = ApiError::bad_request("Invalid signature: signature is missing");
        assert_eq!(
            err.to_json(),
            json!({ "error": { "message": "Invalid signature: signature is missing" } })
        );
    }

    #[test]
    fn test_domain_errors_are_bad_requests() {
        let err: ApiError = SignedRequestError::InvalidTimestamp("stale".into()).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invalid timestamp: stale");

        let err: ApiError = AddressError::InvalidEthereumAddress {
            value: "0x12".into(),
        }
        .into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("0x12"));

        let err: ApiError = ChainError::Missing.into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_payload_too_large() {
        let err = ApiError::payload_too_large(16);
        assert_eq!(err.status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(err.message.contains("16 bytes"));
    }

    #[test]
    fn test_internal_hides_details() {
        let err = ApiError::internal();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Internal server error");
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::payload_too_large(1).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
