//! Events that can occur in a session

use super::state::{RequestId, UploadId};
use crate::registry::Document;
use crate::service::{AskReply, FileUpload, ServiceError, UploadReceipt};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    InputChanged {
        text: String,
    },
    QuestionSubmitted {
        request_id: RequestId,
        question: String,
    },
    UploadRequested {
        upload_id: UploadId,
        file: FileUpload,
    },
    RefreshRequested,

    // Service events
    AnswerReceived {
        request_id: RequestId,
        result: Result<AskReply, ServiceError>,
    },
    UploadSettled {
        upload_id: UploadId,
        file_name: String,
        result: Result<UploadReceipt, ServiceError>,
    },
    DocumentsLoaded {
        result: Result<Vec<Document>, ServiceError>,
    },

    // Timer events
    ProgressTick {
        upload_id: UploadId,
    },
    ProgressHideElapsed {
        upload_id: UploadId,
    },
}

impl Event {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Event::InputChanged { .. } => "input_changed",
            Event::QuestionSubmitted { .. } => "question_submitted",
            Event::UploadRequested { .. } => "upload_requested",
            Event::RefreshRequested => "refresh_requested",
            Event::AnswerReceived { .. } => "answer_received",
            Event::UploadSettled { .. } => "upload_settled",
            Event::DocumentsLoaded { .. } => "documents_loaded",
            Event::ProgressTick { .. } => "progress_tick",
            Event::ProgressHideElapsed { .. } => "progress_hide_elapsed",
        }
    }
}
