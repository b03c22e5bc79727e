//! Document registry view
//!
//! Client-side snapshot of the documents the service has indexed. The
//! service owns the list; the client only replaces it wholesale.

use crate::ui_text;
use serde::{Deserialize, Serialize};

/// An indexed document as reported by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "chunks", alias = "chunkCount", default)]
    pub chunk_count: u64,
}

impl Document {
    pub fn new(name: impl Into<String>, chunk_count: u64) -> Self {
        Self {
            id: None,
            name: name.into(),
            chunk_count,
        }
    }

    /// Second line of a document row
    pub fn summary(&self) -> String {
        ui_text::chunk_summary(self.chunk_count)
    }
}

/// What the registry panel shows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentList {
    /// Nothing fetched yet
    #[default]
    Loading,
    Loaded { documents: Vec<Document> },
    LoadFailed,
}

impl DocumentList {
    pub fn documents(&self) -> &[Document] {
        match self {
            DocumentList::Loaded { documents } => documents,
            DocumentList::Loading | DocumentList::LoadFailed => &[],
        }
    }

    /// Fixed text shown instead of rows, if any
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            DocumentList::Loaded { documents } if documents.is_empty() => {
                Some(ui_text::NO_DOCUMENTS)
            }
            DocumentList::LoadFailed => Some(ui_text::LOAD_FAILED),
            DocumentList::Loading | DocumentList::Loaded { .. } => None,
        }
    }

    /// Replace the view with a fetch result. Returns whether any document
    /// exists when the fetch succeeded, `None` when it failed (the query
    /// gate is then left as it was).
    pub fn reconcile<E>(&mut self, result: Result<Vec<Document>, E>) -> Option<bool> {
        match result {
            Ok(documents) => {
                let any = !documents.is_empty();
                *self = DocumentList::Loaded { documents };
                Some(any)
            }
            Err(_) => {
                *self = DocumentList::LoadFailed;
                None
            }
        }
    }
}
