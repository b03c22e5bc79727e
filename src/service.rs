//! Document service abstraction
//!
//! The remote collaborator of the client: it lists indexed documents,
//! indexes uploaded PDFs and answers questions. Only its request/response
//! contracts are modeled here.

mod error;
mod http;
mod types;

pub use error::{ServiceError, ServiceErrorKind};
pub use http::HttpDocumentService;
pub use types::{has_pdf_extension, AskReply, AskRequest, FileUpload, UploadReceipt};

use crate::registry::Document;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Calls the session makes against the service
#[async_trait]
pub trait DocumentService: Send + Sync {
    /// `GET` the indexed documents; an empty list is a valid answer
    async fn list_documents(&self) -> Result<Vec<Document>, ServiceError>;

    /// `POST` one PDF as multipart form data
    async fn upload(&self, file: &FileUpload) -> Result<UploadReceipt, ServiceError>;

    /// `POST` a question. A non-2xx status is an `Err`, distinct from a
    /// reply with `success: false`.
    async fn ask(&self, question: &str) -> Result<AskReply, ServiceError>;
}

#[async_trait]
impl<T: DocumentService + ?Sized> DocumentService for Arc<T> {
    async fn list_documents(&self) -> Result<Vec<Document>, ServiceError> {
        (**self).list_documents().await
    }

    async fn upload(&self, file: &FileUpload) -> Result<UploadReceipt, ServiceError> {
        (**self).upload(file).await
    }

    async fn ask(&self, question: &str) -> Result<AskReply, ServiceError> {
        (**self).ask(question).await
    }
}

/// Logging wrapper for document services
pub struct LoggingService<S> {
    inner: S,
}

impl<S: DocumentService> LoggingService<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

fn log_failure(operation: &str, started: Instant, error: &ServiceError) {
    tracing::error!(
        operation,
        duration_ms = %started.elapsed().as_millis(),
        kind = ?error.kind,
        status = ?error.status,
        error = %error.message,
        "Document service request failed"
    );
}

#[async_trait]
impl<S: DocumentService> DocumentService for LoggingService<S> {
    async fn list_documents(&self) -> Result<Vec<Document>, ServiceError> {
        let started = Instant::now();
        let result = self.inner.list_documents().await;
        match &result {
            Ok(documents) => tracing::info!(
                operation = "list_documents",
                duration_ms = %started.elapsed().as_millis(),
                documents = documents.len(),
                "Document list fetched"
            ),
            Err(e) => log_failure("list_documents", started, e),
        }
        result
    }

    async fn upload(&self, file: &FileUpload) -> Result<UploadReceipt, ServiceError> {
        let started = Instant::now();
        let result = self.inner.upload(file).await;
        match &result {
            Ok(receipt) => tracing::info!(
                operation = "upload",
                duration_ms = %started.elapsed().as_millis(),
                file = %file.name,
                bytes = file.bytes.len(),
                success = receipt.success,
                chunks = ?receipt.chunks,
                "Upload settled"
            ),
            Err(e) => log_failure("upload", started, e),
        }
        result
    }

    async fn ask(&self, question: &str) -> Result<AskReply, ServiceError> {
        let started = Instant::now();
        let result = self.inner.ask(question).await;
        match &result {
            Ok(reply) => tracing::info!(
                operation = "ask",
                duration_ms = %started.elapsed().as_millis(),
                question_chars = question.chars().count(),
                success = reply.success,
                "Question answered"
            ),
            Err(e) => log_failure("ask", started, e),
        }
        result
    }
}
