//! Pure state transition function
//!
//! Given the same state, context and event, `transition` always produces
//! the same new state and effects. All I/O happens in the runtime.

use super::effect::ViewEvent;
use super::state::{SessionContext, StatusLine, UiState, UploadSession};
use super::{Effect, Event};
use crate::service::{AskReply, ServiceError, UploadReceipt};
use crate::timeline::Role;
use crate::ui_text;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: UiState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: UiState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("No document has been indexed yet, upload a PDF first")]
    NoDocuments,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
pub fn transition(
    state: &UiState,
    context: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    let mut next = state.clone();
    let mut effects = Vec::new();

    match event {
        // ============================================================
        // Question input
        // ============================================================
        Event::InputChanged { text } => {
            next.input = text;
        }

        Event::QuestionSubmitted {
            request_id,
            question,
        } => {
            let question = question.trim();
            if question.is_empty() {
                return Ok(TransitionResult::new(next));
            }
            if !state.qa_enabled {
                return Err(TransitionError::NoDocuments);
            }
            if state.pending_questions.contains_key(&request_id) {
                return Err(TransitionError::InvalidTransition(format!(
                    "request {request_id} is already in flight"
                )));
            }

            next.timeline.append(Role::User, question);
            next.input.clear();
            let placeholder = next.timeline.append_transient(Role::Assistant);
            next.pending_questions.insert(request_id, placeholder);

            effects.push(Effect::notify(ViewEvent::InputCleared));
            effects.push(Effect::SendQuestion {
                request_id,
                question: question.to_string(),
            });
        }

        Event::AnswerReceived { request_id, result } => {
            let Some(placeholder) = next.pending_questions.remove(&request_id) else {
                return Err(TransitionError::InvalidTransition(format!(
                    "no question pending for request {request_id}"
                )));
            };
            next.timeline.retract(placeholder);
            let (role, content) = answer_entry(result);
            next.timeline.append(role, content);
        }

        // ============================================================
        // Upload
        // ============================================================
        Event::UploadRequested { upload_id, file } => {
            if file.is_pdf() {
                let status = StatusLine::info(ui_text::UPLOADING);
                next.upload = Some(UploadSession::new(upload_id, &file.name));
                next.selected_file = Some(file.name.clone());
                next.upload_status = Some(status.clone());

                effects.push(Effect::progress(0));
                effects.push(Effect::status(status));
                effects.push(Effect::StartProgressTicker { upload_id });
                effects.push(Effect::StartUpload { upload_id, file });
            } else {
                let status = StatusLine::error(ui_text::PDF_ONLY);
                next.upload_status = Some(status.clone());
                effects.push(Effect::status(status));
            }
        }

        Event::ProgressTick { upload_id } => {
            if let Some(session) = next
                .upload
                .as_mut()
                .filter(|s| s.id == upload_id && !s.settled)
            {
                let advanced = context.progress.advance(session.progress);
                if advanced != session.progress {
                    session.progress = advanced;
                    effects.push(Effect::progress(advanced));
                }
            }
        }

        Event::UploadSettled {
            upload_id,
            file_name,
            result,
        } => {
            effects.push(Effect::CancelProgressTicker { upload_id });

            // A superseded upload leaves the indicator and the file picker
            // to the newer one
            let current = next.is_upload_session(upload_id);
            if let Some(session) = next.upload.as_mut().filter(|_| current) {
                session.progress = 100;
                session.settled = true;
                effects.push(Effect::progress(100));
                effects.push(Effect::ScheduleProgressHide {
                    upload_id,
                    delay: context.status_display,
                });
            }

            let (status, indexed) = upload_status(&file_name, result);
            next.upload_status = Some(status.clone());
            effects.push(Effect::status(status));
            if current {
                next.selected_file = None;
                effects.push(Effect::notify(ViewEvent::FileSelectionCleared));
            }

            if indexed {
                next.qa_enabled = true;
                effects.push(Effect::FetchDocuments);
            }
        }

        Event::ProgressHideElapsed { upload_id } => {
            if next
                .upload
                .as_ref()
                .is_some_and(|s| s.id == upload_id && s.settled)
            {
                next.upload = None;
                effects.push(Effect::notify(ViewEvent::ProgressHidden));
            }
        }

        // ============================================================
        // Document registry
        // ============================================================
        Event::RefreshRequested => {
            effects.push(Effect::FetchDocuments);
        }

        Event::DocumentsLoaded { result } => {
            if let Some(any) = next.documents.reconcile(result) {
                next.qa_enabled = any;
            }
            effects.push(Effect::notify(ViewEvent::DocumentsChanged));
        }
    }

    let derived = derived_notifications(state, &next);
    Ok(TransitionResult::new(next)
        .with_effects(derived)
        .with_effects(effects))
}

/// Notifications implied by the difference between two states
fn derived_notifications(old: &UiState, new: &UiState) -> Vec<Effect> {
    let mut effects = Vec::new();
    if new.timeline.revision() != old.timeline.revision() {
        effects.push(Effect::notify(ViewEvent::ScrollToLatest));
    }
    if new.can_submit() != old.can_submit() {
        effects.push(Effect::notify(ViewEvent::SubmitEnabled {
            enabled: new.can_submit(),
        }));
    }
    effects
}

/// Terminal timeline entry for an answered (or failed) question
fn answer_entry(result: Result<AskReply, ServiceError>) -> (Role, String) {
    match result {
        Ok(AskReply {
            success: true,
            answer,
            ..
        }) => (Role::Assistant, answer.unwrap_or_default()),
        Ok(AskReply { error, .. }) => (
            Role::System,
            ui_text::server_error(error.as_deref().unwrap_or_default()),
        ),
        Err(e) => (Role::System, ui_text::request_failed(&e.message)),
    }
}

/// Status line for a settled upload, and whether the document was indexed
fn upload_status(
    file_name: &str,
    result: Result<UploadReceipt, ServiceError>,
) -> (StatusLine, bool) {
    match result {
        Ok(UploadReceipt {
            success: true,
            chunks,
            ..
        }) => (
            StatusLine::success(ui_text::upload_succeeded(
                file_name,
                chunks.unwrap_or_default(),
            )),
            true,
        ),
        Ok(UploadReceipt { error, .. }) => (
            StatusLine::error(ui_text::server_error(error.as_deref().unwrap_or_default())),
            false,
        ),
        Err(e) => (StatusLine::error(ui_text::upload_failed(&e.message)), false),
    }
}
