//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::transition::*;
use super::*;
use crate::registry::Document;
use crate::service::{AskReply, FileUpload, ServiceError, UploadReceipt};
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn step(state: &UiState, event: Event) -> UiState {
    transition(state, &SessionContext::default(), event)
        .map(|r| r.new_state)
        .unwrap_or_else(|_| state.clone())
}

fn ready_state() -> UiState {
    UiState {
        qa_enabled: true,
        ..UiState::default()
    }
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_non_pdf_name() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_ ]{1,12}(\\.(txt|docx|png|pdfx|pd|md))?"
}

fn arb_pdf_name() -> impl Strategy<Value = String> {
    ("[a-zA-Z0-9_ ]{1,12}", prop_oneof![Just(".pdf"), Just(".PDF"), Just(".Pdf")])
        .prop_map(|(stem, ext)| format!("{stem}{ext}"))
}

fn arb_blank() -> impl Strategy<Value = String> {
    "[ \t\n\r]{0,8}"
}

fn arb_service_error() -> impl Strategy<Value = ServiceError> {
    prop_oneof![
        (400u16..600).prop_map(|code| ServiceError::http(code, "Error")),
        "[a-z ]{1,20}".prop_map(ServiceError::network),
        "[a-z ]{1,20}".prop_map(ServiceError::decode),
    ]
}

fn arb_ask_result() -> impl Strategy<Value = Result<AskReply, ServiceError>> {
    prop_oneof![
        "[a-zA-Z \n]{0,40}".prop_map(|a| Ok(AskReply::answered(a))),
        "[a-zA-Z ]{0,20}".prop_map(|e| Ok(AskReply::failed(e))),
        arb_service_error().prop_map(Err),
    ]
}

fn arb_upload_result() -> impl Strategy<Value = Result<UploadReceipt, ServiceError>> {
    prop_oneof![
        (0u64..500).prop_map(|c| Ok(UploadReceipt::indexed(c))),
        "[a-zA-Z ]{0,20}".prop_map(|e| Ok(UploadReceipt::rejected(e))),
        arb_service_error().prop_map(Err),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn non_pdf_never_starts_an_upload(name in arb_non_pdf_name()) {
        let result = transition(
            &UiState::default(),
            &SessionContext::default(),
            Event::UploadRequested {
                upload_id: UploadId::new(),
                file: FileUpload::new(name, Vec::new()),
            },
        )
        .unwrap();
        prop_assert!(!result.effects.iter().any(Effect::is_io));
        prop_assert!(result.new_state.upload.is_none());
        prop_assert_eq!(
            result.new_state.upload_status.map(|s| s.kind),
            Some(StatusKind::Error)
        );
    }

    #[test]
    fn pdf_always_starts_an_upload(name in arb_pdf_name()) {
        let upload_id = UploadId::new();
        let result = transition(
            &UiState::default(),
            &SessionContext::default(),
            Event::UploadRequested {
                upload_id,
                file: FileUpload::new(name, Vec::new()),
            },
        )
        .unwrap();
        let started = result
            .effects
            .iter()
            .any(|e| matches!(e, Effect::StartUpload { upload_id: id, .. } if *id == upload_id));
        prop_assert!(started);
    }

    #[test]
    fn blank_question_leaves_timeline_unchanged(
        blank in arb_blank(),
        history in proptest::collection::vec("[a-z]{1,8}", 0..4),
    ) {
        let mut state = ready_state();
        for text in history {
            state.timeline.append(crate::timeline::Role::User, text);
        }
        let before = state.timeline.len();
        let result = transition(
            &state,
            &SessionContext::default(),
            Event::QuestionSubmitted { request_id: RequestId::new(), question: blank },
        )
        .unwrap();
        prop_assert_eq!(result.new_state.timeline.len(), before);
        prop_assert!(result.effects.is_empty());
    }

    #[test]
    fn completed_questions_leave_no_placeholders(
        questions in proptest::collection::vec("[a-z]{1,10}", 1..5),
        results in proptest::collection::vec(arb_ask_result(), 5),
        reverse in any::<bool>(),
    ) {
        let mut state = ready_state();
        let mut requests = Vec::new();
        for question in &questions {
            let request_id = RequestId::new();
            state = step(&state, Event::QuestionSubmitted {
                request_id,
                question: question.clone(),
            });
            requests.push(request_id);
        }
        prop_assert_eq!(state.timeline.transient_count(), questions.len());

        if reverse {
            requests.reverse();
        }
        for (request_id, result) in requests.into_iter().zip(results) {
            state = step(&state, Event::AnswerReceived { request_id, result });
        }

        prop_assert_eq!(state.timeline.transient_count(), 0);
        prop_assert!(state.pending_questions.is_empty());
        prop_assert_eq!(state.timeline.len(), questions.len() * 2);
    }

    #[test]
    fn progress_is_monotonic_and_capped(
        ticks in 0usize..40,
        result in arb_upload_result(),
        late_ticks in 0usize..5,
    ) {
        let upload_id = UploadId::new();
        let mut state = step(&UiState::default(), Event::UploadRequested {
            upload_id,
            file: FileUpload::new("a.pdf", Vec::new()),
        });

        let mut last = 0;
        for _ in 0..ticks {
            state = step(&state, Event::ProgressTick { upload_id });
            let progress = state.progress().unwrap();
            prop_assert!(progress >= last);
            prop_assert!(progress <= 90);
            last = progress;
        }

        state = step(&state, Event::UploadSettled {
            upload_id,
            file_name: "a.pdf".to_string(),
            result,
        });
        prop_assert_eq!(state.progress(), Some(100));

        for _ in 0..late_ticks {
            state = step(&state, Event::ProgressTick { upload_id });
        }
        prop_assert_eq!(state.progress(), Some(100));
    }

    #[test]
    fn submit_enabled_iff_documents_and_input(
        docs in proptest::collection::vec(("[a-z]{1,6}", 0u64..20), 0..3),
        input in "[a-z \t]{0,6}",
    ) {
        let documents: Vec<Document> = docs
            .into_iter()
            .map(|(name, chunks)| Document::new(format!("{name}.pdf"), chunks))
            .collect();
        let expected_gate = !documents.is_empty();
        let state = step(&UiState::default(), Event::DocumentsLoaded { result: Ok(documents) });
        let state = step(&state, Event::InputChanged { text: input.clone() });
        prop_assert_eq!(state.qa_enabled, expected_gate);
        prop_assert_eq!(state.can_submit(), expected_gate && !input.trim().is_empty());
    }

    #[test]
    fn finished_entries_are_never_removed(
        answers in proptest::collection::vec(arb_ask_result(), 1..4),
    ) {
        let mut state = ready_state();
        let mut finished = Vec::new();
        for result in answers {
            let request_id = RequestId::new();
            state = step(&state, Event::QuestionSubmitted {
                request_id,
                question: "q".to_string(),
            });
            state = step(&state, Event::AnswerReceived { request_id, result });
            finished.extend(
                state.timeline.entries().iter().filter(|m| !m.transient).map(|m| m.id),
            );
        }
        for id in finished {
            prop_assert!(state.timeline.get(id).is_some());
        }
    }
}
