//! # Error Types
//!
//! Every way an upload can fail, and how each one is reported to the browser.
//!
//! ## Error Types
//! - `InvalidRequest` - the payload was rejected before the backend was contacted (400)
//! - `MethodNotAllowed` - wrong HTTP method on the upload route (405)
//! - `PayloadTooLarge` - request body over the configured limit (413)
//! - `Upstream` - the backend was unreachable, failed, or answered nonsense (500)
//! - `Internal` - anything else, including a panic while handling the request (500)
//!
//! All of them render as `{ "error": "...", "details": "..." }`.

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    /// Missing or undecodable audio payload.
    ///
    /// # Example
    /// ```
    /// # use track2tabs_relay::RelayError;
    /// let err = RelayError::InvalidRequest("No audio data provided".to_string());
    /// assert_eq!(err.to_string(), "Invalid upload: No audio data provided");
    /// ```
    #[error("Invalid upload: {0}")]
    InvalidRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Request body larger than `limit` bytes.
    #[error("Upload too large: limit is {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// The detection backend could not produce a timeline.
    ///
    /// `details` carries the backend's own explanation, verbatim, when there is one.
    #[error("{message}")]
    Upstream {
        message: String,
        details: Option<String>,
    },

    /// Unexpected failure inside the relay itself.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl RelayError {
    pub fn upstream(message: impl Into<String>, details: impl Into<String>) -> Self {
        RelayError::Upstream {
            message: message.into(),
            details: Some(details.into()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::Upstream { .. } | RelayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        match self {
            RelayError::InvalidRequest(reason) => ErrorBody {
                error: "Invalid upload".to_string(),
                details: Some(reason.clone()),
            },
            RelayError::MethodNotAllowed => ErrorBody {
                error: "Method not allowed".to_string(),
                details: None,
            },
            RelayError::PayloadTooLarge { limit } => ErrorBody {
                error: "Upload too large".to_string(),
                details: Some(format!("Request body exceeds the {} byte limit", limit)),
            },
            RelayError::Upstream { message, details } => ErrorBody {
                error: message.clone(),
                details: details.clone(),
            },
            RelayError::Internal(reason) => ErrorBody {
                error: "Internal server error".to_string(),
                details: Some(reason.clone()),
            },
        }
    }
}

/// Wire form of a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match self.status() {
            s if s.is_server_error() => log::warn!("Upload failed: {}", self),
            _ => log::info!("Upload rejected: {}", self),
        }
        (self.status(), Json(self.to_body())).into_response()
    }
}

/// Answer a panicked request with a structured 500 instead of a dropped connection.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let reason = if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "Unexpected failure while handling the request".to_string()
    };
    log::error!("Request handler panicked: {}", reason);
    RelayError::Internal(reason).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_distinct_per_category() {
        assert_eq!(RelayError::InvalidRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(RelayError::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            RelayError::PayloadTooLarge { limit: 10 }.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            RelayError::upstream("Backend unreachable", "refused").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_details_are_passed_verbatim() {
        let raw = r#"{"detail":"Chord detection failed: empty audio"}"#;
        let body = RelayError::upstream("Backend returned status 500", raw).to_body();
        assert_eq!(body.details.as_deref(), Some(raw));
    }

    #[test]
    fn test_body_omits_missing_details() {
        let json = serde_json::to_string(&RelayError::MethodNotAllowed.to_body()).unwrap();
        assert_eq!(json, r#"{"error":"Method not allowed"}"#);
    }

    #[test]
    fn test_panic_payload_becomes_internal_error() {
        let response = panic_response(Box::new(String::from("index out of bounds")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = panic_response(Box::new(42_u8));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_error_body() {
        let body = RelayError::Internal("boom".to_string()).to_body();
        assert_eq!(body.error, "Internal server error");
        assert_eq!(body.details.as_deref(), Some("boom"));
    }
}
