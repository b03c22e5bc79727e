//! Interface state types

use crate::config::{ClientConfig, ProgressConfig};
use crate::registry::DocumentList;
use crate::timeline::{MessageId, Timeline};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Identifies one in-flight question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifies one upload session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadId(Uuid);

impl UploadId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UploadId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// Upload display
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// Feedback line under the upload control
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub message: String,
}

impl StatusLine {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }
}

/// The upload currently owning the progress indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSession {
    pub id: UploadId,
    pub file_name: String,
    /// Simulated until settlement, then 100
    pub progress: u8,
    pub settled: bool,
}

impl UploadSession {
    pub fn new(id: UploadId, file_name: impl Into<String>) -> Self {
        Self {
            id,
            file_name: file_name.into(),
            progress: 0,
            settled: false,
        }
    }
}

// ============================================================================
// Interface state
// ============================================================================

/// Everything the presentation layer draws, as one explicit value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub timeline: Timeline,
    /// Question input field contents
    pub input: String,
    /// At least one document is known to be indexed
    pub qa_enabled: bool,
    pub documents: DocumentList,
    /// `None` once the progress indicator is hidden
    pub upload: Option<UploadSession>,
    pub upload_status: Option<StatusLine>,
    /// Name shown in the file picker until the upload settles
    pub selected_file: Option<String>,
    /// Placeholder entry of each question still awaiting its answer
    pub pending_questions: HashMap<RequestId, MessageId>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the ask control accepts a submission right now
    pub fn can_submit(&self) -> bool {
        self.qa_enabled && !self.input.trim().is_empty()
    }

    pub fn is_upload_session(&self, id: UploadId) -> bool {
        self.upload.as_ref().is_some_and(|s| s.id == id)
    }

    /// Percentage shown by the progress indicator, if visible
    pub fn progress(&self) -> Option<u8> {
        self.upload.as_ref().map(|s| s.progress)
    }
}

/// Immutable per-session settings used by transitions
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub progress: ProgressConfig,
    /// Delay between settlement and hiding the progress indicator
    pub status_display: Duration,
}

impl SessionContext {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            progress: config.progress,
            status_display: config.status_display(),
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(&ClientConfig::default())
    }
}
