//! Document Q&A client
//!
//! Client-side orchestration for a PDF question-answering service: upload
//! PDFs with simulated progress, keep the indexed document list current,
//! ask questions and render answers into a conversation timeline.
//!
//! The interface state lives in one [`UiState`] value driven by a pure
//! [`state_machine::transition`] function. A [`Session`] executes the
//! effects it requests against a [`DocumentService`] and broadcasts
//! [`ViewEvent`]s to whatever draws the interface.

pub mod config;
pub mod content;
pub mod registry;
pub mod runtime;
pub mod service;
pub mod state_machine;
pub mod timeline;
pub mod ui_text;

pub use config::{ClientConfig, ProgressConfig};
pub use content::{Rendered, Segment};
pub use registry::{Document, DocumentList};
pub use runtime::{HttpSession, Session, SessionError, UploadOutcome};
pub use service::{
    DocumentService, FileUpload, HttpDocumentService, LoggingService, ServiceError,
    ServiceErrorKind,
};
pub use state_machine::{StatusKind, StatusLine, UiState, ViewEvent};
pub use timeline::{Message, MessageId, Role, Timeline};
