//! Session executor
//!
//! Service calls run in spawned tasks. A task applies its own completion
//! event and then waits for the follow-up tasks that event started, so the
//! task handle of a user operation resolves once the whole chain has
//! settled. Callers only wait on those handles; dropping a caller never
//! aborts the work.

use crate::config::ClientConfig;
use crate::service::{DocumentService, FileUpload, ServiceError, UploadReceipt};
use crate::state_machine::{
    transition, Effect, Event, RequestId, SessionContext, TransitionError, UiState, UploadId,
    ViewEvent,
};
use crate::ui_text;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

const VIEW_CHANNEL_CAPACITY: usize = 128;

/// Error returned by session operations. Service failures never surface
/// here; they are recovered into the timeline or the status line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Rejected(#[from] TransitionError),
}

/// How a call to [`Session::submit`] ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Not a PDF; nothing was sent
    Rejected { reason: String },
    /// The service indexed the document
    Indexed { file_name: String, chunks: u64 },
    /// The service refused the file or the request failed
    Failed { message: String },
}

impl UploadOutcome {
    fn from_settlement(file_name: &str, result: &Result<UploadReceipt, ServiceError>) -> Self {
        match result {
            Ok(receipt) if receipt.success => UploadOutcome::Indexed {
                file_name: file_name.to_string(),
                chunks: receipt.chunks.unwrap_or_default(),
            },
            Ok(receipt) => UploadOutcome::Failed {
                message: receipt.error.clone().unwrap_or_default(),
            },
            Err(e) => UploadOutcome::Failed {
                message: e.message.clone(),
            },
        }
    }
}

/// Client session over any document service.
///
/// Cloning is cheap and every clone drives the same state. Operations may
/// run concurrently; the state lock is only held while a transition is
/// applied, never across an await.
pub struct Session<S: DocumentService + 'static> {
    inner: Arc<Inner<S>>,
}

struct Inner<S> {
    context: SessionContext,
    state: Mutex<UiState>,
    service: S,
    view_tx: broadcast::Sender<ViewEvent>,
    /// Cancellation handles of running progress tickers
    tickers: Mutex<HashMap<UploadId, CancellationToken>>,
    /// `submit` calls waiting for their upload to settle
    settlements: Mutex<HashMap<UploadId, oneshot::Sender<UploadOutcome>>>,
}

impl<S: DocumentService + 'static> Clone for Session<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Wait for spawned work to finish
async fn join(tasks: Vec<JoinHandle<()>>) {
    for task in tasks {
        if let Err(e) = task.await {
            tracing::error!(error = %e, "Session task failed");
        }
    }
}

impl<S: DocumentService + 'static> Session<S> {
    pub fn new(config: &ClientConfig, service: S) -> Self {
        let (view_tx, _) = broadcast::channel(VIEW_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                context: SessionContext::new(config),
                state: Mutex::new(UiState::new()),
                service,
                view_tx,
                tickers: Mutex::new(HashMap::new()),
                settlements: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Presentation-layer signals (scroll, progress, status, ...)
    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.inner.view_tx.subscribe()
    }

    /// Copy of the current interface state
    pub fn snapshot(&self) -> UiState {
        lock(&self.inner.state).clone()
    }

    pub fn service(&self) -> &S {
        &self.inner.service
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Mirror the question input field
    pub async fn set_input(&self, text: impl Into<String>) -> Result<(), SessionError> {
        self.run(Event::InputChanged { text: text.into() }).await
    }

    /// Ask a question and wait until its answer (or failure) is in the
    /// timeline. Blank questions are ignored. Dropping the returned future
    /// stops the wait; the question is still answered.
    pub async fn ask(&self, question: impl Into<String>) -> Result<(), SessionError> {
        self.run(Event::QuestionSubmitted {
            request_id: RequestId::new(),
            question: question.into(),
        })
        .await
    }

    /// Enter in the question field. Shift+Enter is left to the presentation
    /// layer (it inserts a newline).
    pub async fn press_enter(&self, shift: bool) -> Result<(), SessionError> {
        if shift {
            return Ok(());
        }
        let question = lock(&self.inner.state).input.clone();
        if question.trim().is_empty() {
            return Ok(());
        }
        self.ask(question).await
    }

    /// Upload a file and wait for the service to settle it. The registry is
    /// refreshed before this returns when indexing succeeded. Dropping the
    /// returned future does not cancel the upload.
    pub async fn submit(&self, file: FileUpload) -> Result<UploadOutcome, SessionError> {
        let upload_id = UploadId::new();
        let (settled_tx, settled_rx) = oneshot::channel();
        lock(&self.inner.settlements).insert(upload_id, settled_tx);

        let result = self.run(Event::UploadRequested { upload_id, file }).await;
        // Still registered when the file never left (validation or rejection)
        lock(&self.inner.settlements).remove(&upload_id);
        result?;

        Ok(settled_rx.await.unwrap_or_else(|_| UploadOutcome::Rejected {
            reason: ui_text::PDF_ONLY.to_string(),
        }))
    }

    /// Reload the document list
    pub async fn refresh(&self) -> Result<(), SessionError> {
        self.run(Event::RefreshRequested).await
    }

    // ========================================================================
    // Event dispatch
    // ========================================================================

    /// Dispatch a user event and wait for everything it started
    async fn run(&self, event: Event) -> Result<(), SessionError> {
        let tasks = self.dispatch(event)?;
        join(tasks).await;
        Ok(())
    }

    /// Apply an event and execute its effects. Returns the tasks started
    /// for service calls.
    fn dispatch(&self, event: Event) -> Result<Vec<JoinHandle<()>>, TransitionError> {
        let settlement = match &event {
            Event::UploadSettled {
                upload_id,
                file_name,
                result,
            } => Some((*upload_id, UploadOutcome::from_settlement(file_name, result))),
            _ => None,
        };

        let effects = self.apply(event)?;

        if let Some((upload_id, outcome)) = settlement {
            if let Some(waiter) = lock(&self.inner.settlements).remove(&upload_id) {
                // The submitter may have stopped waiting
                let _ = waiter.send(outcome);
            }
        }

        Ok(effects
            .into_iter()
            .filter_map(|effect| self.execute_effect(effect))
            .collect())
    }

    /// Run one pure transition under the state lock
    fn apply(&self, event: Event) -> Result<Vec<Effect>, TransitionError> {
        let name = event.name();
        let mut state = lock(&self.inner.state);
        match transition(&state, &self.inner.context, event) {
            Ok(result) => {
                tracing::debug!(
                    event = name,
                    effects = result.effects.len(),
                    "Applied transition"
                );
                *state = result.new_state;
                Ok(result.effects)
            }
            Err(e) => {
                tracing::warn!(event = name, error = %e, "Transition rejected");
                Err(e)
            }
        }
    }

    /// Dispatch an event raised outside any caller (timers, completions)
    /// and wait for the work it starts
    async fn complete(&self, event: Event) {
        let name = event.name();
        match self.dispatch(event) {
            Ok(tasks) => join(tasks).await,
            Err(e) => tracing::warn!(event = name, error = %e, "Dropping completion event"),
        }
    }

    fn notify(&self, event: ViewEvent) {
        // No subscriber is not an error
        let _ = self.inner.view_tx.send(event);
    }

    /// Run a service call in its own task and apply the event it yields
    fn spawn_call<F>(&self, call: F) -> JoinHandle<()>
    where
        F: Future<Output = Event> + Send + 'static,
    {
        let session = self.clone();
        tokio::spawn(async move {
            let event = call.await;
            session.complete(event).await;
        })
    }

    fn execute_effect(&self, effect: Effect) -> Option<JoinHandle<()>> {
        match effect {
            Effect::Notify(view_event) => {
                self.notify(view_event);
                None
            }

            Effect::SendQuestion {
                request_id,
                question,
            } => {
                tracing::info!(request_id = %request_id, "Sending question");
                let session = self.clone();
                Some(self.spawn_call(async move {
                    let result = session.inner.service.ask(&question).await;
                    Event::AnswerReceived { request_id, result }
                }))
            }

            Effect::StartUpload { upload_id, file } => {
                tracing::info!(upload_id = %upload_id, file = %file.name, "Starting upload");
                let session = self.clone();
                Some(self.spawn_call(async move {
                    let result = session.inner.service.upload(&file).await;
                    Event::UploadSettled {
                        upload_id,
                        file_name: file.name,
                        result,
                    }
                }))
            }

            Effect::FetchDocuments => {
                let session = self.clone();
                Some(self.spawn_call(async move {
                    let result = session.inner.service.list_documents().await;
                    Event::DocumentsLoaded { result }
                }))
            }

            Effect::StartProgressTicker { upload_id } => {
                self.start_ticker(upload_id);
                None
            }

            Effect::CancelProgressTicker { upload_id } => {
                if let Some(token) = lock(&self.inner.tickers).remove(&upload_id) {
                    token.cancel();
                }
                None
            }

            Effect::ScheduleProgressHide { upload_id, delay } => {
                let session = self.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    session
                        .complete(Event::ProgressHideElapsed { upload_id })
                        .await;
                });
                None
            }
        }
    }

    /// Cosmetic progress ticker. Runs independently of the upload request
    /// until cancelled at settlement.
    fn start_ticker(&self, upload_id: UploadId) {
        let token = CancellationToken::new();
        lock(&self.inner.tickers).insert(upload_id, token.clone());

        let session = self.clone();
        let period = self.inner.context.progress.tick();
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;

                    () = token.cancelled() => break,

                    _ = ticker.tick() => {
                        session.complete(Event::ProgressTick { upload_id }).await;
                    }
                }
            }
            tracing::debug!(upload_id = %upload_id, "Progress ticker stopped");
        });
    }
}
