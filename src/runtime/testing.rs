//! Mock implementations for testing
//!
//! These mocks enable session testing without real I/O.

use crate::registry::Document;
use crate::service::{AskReply, DocumentService, FileUpload, ServiceError, UploadReceipt};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// A call made against the mock, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    ListDocuments,
    Upload { file_name: String },
    Ask { question: String },
}

/// A queued response and how long the mock sits on it
struct Scripted<T> {
    delay: Duration,
    result: Result<T, ServiceError>,
}

/// Mock document service with a small in-memory catalog.
///
/// A successful upload adds the file to the catalog, so the list fetched
/// afterwards contains it. Responses scripted for a file name or question
/// win over queued ones; with neither, uploads index one chunk and every
/// question gets a fixed answer.
#[derive(Default)]
pub struct MockDocumentService {
    catalog: Mutex<Vec<Document>>,
    lists: Mutex<VecDeque<Result<Vec<Document>, ServiceError>>>,
    uploads: Mutex<VecDeque<Scripted<UploadReceipt>>>,
    answers: Mutex<VecDeque<Scripted<AskReply>>>,
    uploads_by_name: Mutex<HashMap<String, Scripted<UploadReceipt>>>,
    answers_by_question: Mutex<HashMap<String, Scripted<AskReply>>>,
    calls: Mutex<Vec<ServiceCall>>,
}

impl MockDocumentService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: Vec<Document>) -> Self {
        let mock = Self::new();
        *mock.catalog.lock().unwrap() = documents;
        mock
    }

    /// Replace the catalog for the next list call only
    pub fn queue_list(&self, result: Result<Vec<Document>, ServiceError>) {
        self.lists.lock().unwrap().push_back(result);
    }

    pub fn queue_upload(&self, result: Result<UploadReceipt, ServiceError>) {
        self.uploads.lock().unwrap().push_back(Scripted {
            delay: Duration::ZERO,
            result,
        });
    }

    pub fn queue_answer(&self, result: Result<AskReply, ServiceError>) {
        self.answers.lock().unwrap().push_back(Scripted {
            delay: Duration::ZERO,
            result,
        });
    }

    /// Answer uploads of `file_name` after `delay`
    pub fn script_upload(
        &self,
        file_name: &str,
        delay: Duration,
        result: Result<UploadReceipt, ServiceError>,
    ) {
        self.uploads_by_name
            .lock()
            .unwrap()
            .insert(file_name.to_string(), Scripted { delay, result });
    }

    /// Answer `question` after `delay`
    pub fn script_answer(
        &self,
        question: &str,
        delay: Duration,
        result: Result<AskReply, ServiceError>,
    ) {
        self.answers_by_question
            .lock()
            .unwrap()
            .insert(question.to_string(), Scripted { delay, result });
    }

    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ServiceCall::ListDocuments))
            .count()
    }

    fn record(&self, call: ServiceCall) {
        self.calls.lock().unwrap().push(call);
    }
}

async fn settle<T>(scripted: Scripted<T>) -> Result<T, ServiceError> {
    if !scripted.delay.is_zero() {
        tokio::time::sleep(scripted.delay).await;
    }
    scripted.result
}

#[async_trait]
impl DocumentService for MockDocumentService {
    async fn list_documents(&self) -> Result<Vec<Document>, ServiceError> {
        self.record(ServiceCall::ListDocuments);
        if let Some(result) = self.lists.lock().unwrap().pop_front() {
            return result;
        }
        Ok(self.catalog.lock().unwrap().clone())
    }

    async fn upload(&self, file: &FileUpload) -> Result<UploadReceipt, ServiceError> {
        self.record(ServiceCall::Upload {
            file_name: file.name.clone(),
        });
        let keyed = self.uploads_by_name.lock().unwrap().remove(&file.name);
        let scripted = keyed.or_else(|| self.uploads.lock().unwrap().pop_front());
        let result = match scripted {
            Some(scripted) => settle(scripted).await,
            None => Ok(UploadReceipt::indexed(1)),
        };
        if let Ok(receipt) = &result {
            if receipt.success {
                self.catalog.lock().unwrap().push(Document::new(
                    file.name.clone(),
                    receipt.chunks.unwrap_or_default(),
                ));
            }
        }
        result
    }

    async fn ask(&self, question: &str) -> Result<AskReply, ServiceError> {
        self.record(ServiceCall::Ask {
            question: question.to_string(),
        });
        let keyed = self.answers_by_question.lock().unwrap().remove(question);
        let scripted = keyed.or_else(|| self.answers.lock().unwrap().pop_front());
        match scripted {
            Some(scripted) => settle(scripted).await,
            None => Ok(AskReply::answered("mock answer")),
        }
    }
}
