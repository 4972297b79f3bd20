//! Error types for SUDS operations.
//!
//! Four families reach the caller:
//! - validation errors for incomplete requests, raised before any network activity
//! - transport errors, passed through exactly as the [`Transport`](crate::Transport) produced them
//! - protocol errors, when a successful exchange lacks the expected data
//! - domain rejections ([`SudsError::Rejected`]), business-rule refusals from
//!   the service or from local checks that mirror them

use suds_config::ConfigError;

/// Errors produced by a [`Transport`](crate::Transport) implementation.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be sent or the response body not read.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered with a non-success status code.
    #[error("HTTP error: status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, kept for diagnostics.
        body: String,
    },

    /// The response body is not valid JSON.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Failure reported by a custom transport.
    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }
}

/// Errors returned by the gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum SudsError {
    /// A required request field is missing or the input is malformed.
    #[error("{0}")]
    Validation(String),

    /// The transport failed; the error is untouched.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The exchange succeeded but the expected field is absent.
    #[error("No data received from SUDS.")]
    NoData,

    /// The payload is present but does not have the expected shape.
    #[error("Invalid response from SUDS: {0}")]
    InvalidResponse(String),

    /// The request was refused by a business rule.
    #[error("{0}")]
    Rejected(String),

    /// The service reported a failure without details.
    #[error("An error occured.")]
    Failed,

    /// Configuration or gateway setup problem.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl SudsError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Domain rejection, as opposed to transport or protocol failures.
    pub fn is_suds_error(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Successful exchange with an unusable payload.
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, Self::NoData | Self::InvalidResponse(_) | Self::Failed)
    }
}

/// Result type for gateway operations
pub type Result<T> = std::result::Result<T, SudsError>;
