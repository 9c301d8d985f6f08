//! Gateway error types with HTTP status code mapping.
//!
//! [`NotifyError`] is the central error type for both halves of the crate:
//! the client-side notification manager and the server-side gateway. Each
//! variant maps to a numeric code and, for the REST surface, an HTTP
//! status with a structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::transport::TransportState;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid request: message must not be empty",
///     "details": null
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
    /// Numeric error code (see code ranges below).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Central error enum for the notification system.
///
/// # Error Code Ranges
///
/// | Range     | Category          | HTTP Status                |
/// |-----------|-------------------|----------------------------|
/// | 1000–1999 | Validation        | 400 Bad Request            |
/// | 2000–2999 | Unknown/Not Found | 404 Not Found              |
/// | 3000–3999 | Internal          | 500 Internal Server Error  |
/// | 4000–4999 | Transport         | 502/503                    |
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// An inbound payload could not be parsed as a wire message.
    ///
    /// Always handled locally: the payload is logged and dropped, never
    /// surfaced to the user.
    #[error("malformed inbound payload: {0}")]
    MalformedInbound(String),

    /// Structurally valid JSON carrying an unrecognized message type.
    #[error("unknown message type: {0}")]
    UnknownMessageType(String),

    /// A send was attempted while the transport was not open.
    #[error("transport not ready: connection is {0}")]
    TransportNotReady(TransportState),

    /// The transport accepted the payload but failed to deliver it.
    #[error("transport send failed: {0}")]
    TransportSend(String),

    /// Alert construction or presentation failed.
    ///
    /// Caught after history/counter updates have landed, so a broken
    /// renderer never loses a notification.
    #[error("render failure: {0}")]
    RenderFailure(String),

    /// The audible cue could not be played. Fully silent to the user.
    #[error("audio cue unsupported: {0}")]
    AudioUnsupported(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl NotifyError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::MalformedInbound(_) => 1002,
            Self::UnknownMessageType(_) => 2001,
            Self::Internal(_) => 3000,
            Self::RenderFailure(_) => 3002,
            Self::AudioUnsupported(_) => 3003,
            Self::TransportNotReady(_) => 4001,
            Self::TransportSend(_) => 4002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::MalformedInbound(_) => StatusCode::BAD_REQUEST,
            Self::UnknownMessageType(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) | Self::RenderFailure(_) | Self::AudioUnsupported(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::TransportNotReady(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::TransportSend(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<serde_json::Error> for NotifyError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedInbound(err.to_string())
    }
}

impl IntoResponse for NotifyError {
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
