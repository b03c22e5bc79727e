//! Session runtime
//!
//! Executes the effects requested by the state machine: service calls,
//! the cosmetic progress ticker, the progress-hide timer and presentation
//! notifications.

mod executor;

#[cfg(test)]
pub mod testing;

pub use executor::{Session, SessionError, UploadOutcome};

use crate::config::ClientConfig;
use crate::service::{HttpDocumentService, LoggingService, ServiceError};

/// Session backed by the real HTTP service
pub type HttpSession = Session<LoggingService<HttpDocumentService>>;

impl HttpSession {
    /// Build a session against the configured service without touching the
    /// network
    pub fn connect(config: &ClientConfig) -> Result<Self, ServiceError> {
        let service = LoggingService::new(HttpDocumentService::new(config.clone())?);
        Ok(Session::new(config, service))
    }

    /// Connect and perform the initial document list load
    pub async fn open(config: &ClientConfig) -> Result<Self, ServiceError> {
        let session = Self::connect(config)?;
        if let Err(e) = session.refresh().await {
            tracing::warn!(error = %e, "Initial document load rejected");
        }
        Ok(session)
    }
}
