//! Service error types

use thiserror::Error;

/// Failure of a call to the document service, classified so the session
/// can word the user-facing message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ServiceError {
    pub kind: ServiceErrorKind,
    pub message: String,
    /// HTTP status for `Http` failures
    pub status: Option<u16>,
}

impl ServiceError {
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    /// Non-2xx response, described as `HTTP <code>: <reason>`
    pub fn http(status: u16, reason: &str) -> Self {
        Self {
            kind: ServiceErrorKind::Http,
            message: format!("HTTP {status}: {reason}"),
            status: Some(status),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Network, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Decode, message)
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::http(status.as_u16(), status.canonical_reason().unwrap_or_default())
        } else {
            Self::network(err.to_string())
        }
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    /// The service answered with a non-2xx status
    Http,
    /// Connection, DNS, TLS or body transfer failure
    Network,
    /// Response body was not the expected JSON
    Decode,
}
