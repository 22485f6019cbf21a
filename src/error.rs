//! Error types for the facilitator client
//!
//! Every failure a caller can observe is one of the [`X402Error`] variants.
//! Input problems are detected locally and never reach the network; transport
//! failures are split into timeouts, connection problems, non-2xx answers and
//! responses that break the wire contract.

use crate::types::ErrorResponse;
use http::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, X402Error>;

/// Errors returned by the facilitator client
#[derive(Debug, Error)]
pub enum X402Error {
    /// Caller supplied input that violates the request contract
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// The facilitator did not answer within the configured timeout
    #[error("{endpoint} timed out after {timeout:?}")]
    Timeout {
        endpoint: &'static str,
        timeout: Duration,
    },

    /// The connection could not be established or was interrupted
    #[error("transport error on {endpoint}: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The facilitator answered with a non-2xx status
    #[error("{endpoint} returned HTTP {status}: {body}")]
    HttpStatus {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },

    /// The response body does not satisfy the wire contract
    #[error("protocol error on {endpoint}: {message}")]
    Protocol {
        endpoint: &'static str,
        message: String,
    },

    #[error("configuration error: {0}")]
    Config(String),

    /// The client was used after [`close`](crate::FacilitatorClient::close)
    #[error("facilitator client is closed")]
    ClientClosed,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
}

impl X402Error {
    /// Create a validation error for the given wire field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a protocol error for the given endpoint
    pub fn protocol(endpoint: &'static str, message: impl Into<String>) -> Self {
        Self::Protocol {
            endpoint,
            message: message.into(),
        }
    }

    /// Classify a reqwest failure into a timeout or a transport error
    pub(crate) fn from_reqwest(
        endpoint: &'static str,
        timeout: Duration,
        err: reqwest::Error,
    ) -> Self {
        if err.is_timeout() {
            Self::Timeout { endpoint, timeout }
        } else {
            Self::Transport {
                endpoint,
                source: err,
            }
        }
    }

    /// HTTP status carried by an [`X402Error::HttpStatus`] error
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Parse the facilitator's structured error body, if this is an HTTP status error
    /// and the body has the `{error, code, details}` shape.
    pub fn error_response(&self) -> Option<ErrorResponse> {
        match self {
            Self::HttpStatus { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }

    /// Whether repeating the same call may succeed.
    ///
    /// The client never retries on its own; this only classifies the failure.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Transport { .. } => true,
            Self::HttpStatus { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}
