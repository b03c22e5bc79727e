//! HTTP implementation of the document service

use super::types::{AskReply, AskRequest, FileUpload, UploadReceipt};
use super::{DocumentService, ServiceError};
use crate::config::ClientConfig;
use crate::registry::Document;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};

/// Talks to the indexing/answering service over HTTP.
///
/// No request timeout is set: a request runs until the transport itself
/// gives up.
pub struct HttpDocumentService {
    client: Client,
    config: ClientConfig,
}

impl HttpDocumentService {
    pub fn new(config: ClientConfig) -> Result<Self, ServiceError> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: ClientConfig) -> Self {
        Self { client, config }
    }
}

fn status_error(status: StatusCode) -> ServiceError {
    ServiceError::http(status.as_u16(), status.canonical_reason().unwrap_or_default())
}

#[async_trait]
impl DocumentService for HttpDocumentService {
    async fn list_documents(&self) -> Result<Vec<Document>, ServiceError> {
        let url = self.config.endpoint(&self.config.documents_path);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }

        Ok(response.json::<Vec<Document>>().await?)
    }

    async fn upload(&self, file: &FileUpload) -> Result<UploadReceipt, ServiceError> {
        let url = self.config.endpoint(&self.config.upload_path);
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str("application/pdf")?;
        let form = Form::new().part(self.config.upload_field.clone(), part);

        let response = self.client.post(&url).multipart(form).send().await?;

        // Rejections come back as a JSON receipt with a 4xx/5xx status, so
        // the body is read before the status is considered.
        let status = response.status();
        let body = response.bytes().await?;
        match serde_json::from_slice::<UploadReceipt>(&body) {
            Ok(receipt) => Ok(receipt),
            Err(_) if !status.is_success() => Err(status_error(status)),
            Err(e) => Err(ServiceError::decode(e.to_string())),
        }
    }

    async fn ask(&self, question: &str) -> Result<AskReply, ServiceError> {
        let url = self.config.endpoint(&self.config.ask_path);
        let response = self
            .client
            .post(&url)
            .header("X-Requested-With", "XMLHttpRequest")
            .json(&AskRequest { question })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }

        Ok(response.json::<AskReply>().await?)
    }
}
