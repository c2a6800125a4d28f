//! Relay error types with HTTP status code mapping.
//!
//! [`RelayError`] is the central error type for the relay. Admission
//! failures surface to HTTP clients as structured JSON; receive and write
//! failures stay local to the affected connection and only reach the logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "no channel matches path: /nope/"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Relay error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status               |
/// |-----------|-----------------|---------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request           |
/// | 2000–2999 | Routing         | 404 Not Found             |
/// | 3000–3999 | Transport/Server| 500 / 502 / 504           |
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// A configured channel name is malformed.
    #[error("invalid channel name: {0}")]
    InvalidChannelName(String),

    /// No registered channel matches the request path.
    #[error("no channel matches path: {0}")]
    Unroutable(String),

    /// The channel is not registered.
    #[error("channel not found: {0}")]
    ChannelNotFound(String),

    /// The peer closed the connection.
    #[error("connection closed by peer")]
    PeerClosed,

    /// The underlying transport failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// A write did not complete before its deadline.
    #[error("write deadline exceeded")]
    WriteTimeout,

    /// Startup configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem or socket I/O failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidChannelName(_) => 1001,
            Self::Unroutable(_) => 2001,
            Self::ChannelNotFound(_) => 2002,
            Self::Internal(_) => 3000,
            Self::PeerClosed => 3001,
            Self::Transport(_) => 3002,
            Self::WriteTimeout => 3003,
            Self::Config(_) => 3004,
            Self::Io(_) => 3005,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidChannelName(_) => StatusCode::BAD_REQUEST,
            Self::Unroutable(_) | Self::ChannelNotFound(_) => StatusCode::NOT_FOUND,
            Self::Transport(_) => StatusCode::BAD_GATEWAY,
            Self::WriteTimeout => StatusCode::GATEWAY_TIMEOUT,
            Self::PeerClosed | Self::Config(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routing_errors_are_not_found() {
        assert_eq!(
            RelayError::Unroutable("/x".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RelayError::ChannelNotFound("/x/".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn codes_fall_in_their_ranges() {
        assert_eq!(
            RelayError::InvalidChannelName(String::new()).error_code() / 1000,
            1
        );
        assert_eq!(RelayError::Unroutable(String::new()).error_code() / 1000, 2);
        assert_eq!(RelayError::WriteTimeout.error_code() / 1000, 3);
    }

    #[test]
    fn into_response_carries_status() {
        let response = RelayError::Unroutable("/nope/".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
