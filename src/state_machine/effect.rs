//! Effects produced by state transitions

use super::state::{RequestId, StatusLine, UploadId};
use crate::service::FileUpload;
use serde::Serialize;
use std::time::Duration;

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send a question to the answering service
    SendQuestion {
        request_id: RequestId,
        question: String,
    },

    /// Send a PDF to the indexing service
    StartUpload { upload_id: UploadId, file: FileUpload },

    /// Start the cosmetic progress ticker for an upload
    StartProgressTicker { upload_id: UploadId },

    /// Stop the ticker; the upload has settled
    CancelProgressTicker { upload_id: UploadId },

    /// Hide the progress indicator after the display window
    ScheduleProgressHide { upload_id: UploadId, delay: Duration },

    /// Fetch the document list
    FetchDocuments,

    /// Tell the presentation layer something changed
    Notify(ViewEvent),
}

/// Signals for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewEvent {
    /// The timeline changed; scroll to the latest entry
    ScrollToLatest,
    InputCleared,
    SubmitEnabled { enabled: bool },
    Status { status: StatusLine },
    Progress { percent: u8 },
    ProgressHidden,
    FileSelectionCleared,
    DocumentsChanged,
}

impl Effect {
    pub fn notify(event: ViewEvent) -> Self {
        Effect::Notify(event)
    }

    pub fn status(status: StatusLine) -> Self {
        Effect::Notify(ViewEvent::Status { status })
    }

    pub fn progress(percent: u8) -> Self {
        Effect::Notify(ViewEvent::Progress { percent })
    }

    /// Whether executing this effect performs I/O or spawns work
    pub fn is_io(&self) -> bool {
        !matches!(self, Effect::Notify(_))
    }
}
