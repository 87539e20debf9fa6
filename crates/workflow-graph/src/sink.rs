//! Document sink collaborator interface
//!
//! The engine never talks to the remote platform itself. Whatever persists
//! workflows remotely implements [`DocumentSink`] and only ever sees the
//! JSON document form.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::codec::{from_document, to_document, WorkflowDocument};
use crate::error::{GraphError, Result};
use crate::workflow::Workflow;

/// Accepts and returns workflow documents by opaque remote id
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Store a document, returning the id it can be fetched by
    async fn submit_document(&self, document: &WorkflowDocument) -> Result<String>;

    /// Fetch a previously submitted document
    async fn fetch_document(&self, remote_id: &str) -> Result<WorkflowDocument>;
}

/// In-process sink keyed by random UUIDs
///
/// Cloning shares the same storage.
#[derive(Clone, Default)]
pub struct MemoryDocumentSink {
    documents: Arc<RwLock<HashMap<String, WorkflowDocument>>>,
}

impl MemoryDocumentSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentSink for MemoryDocumentSink {
    async fn submit_document(&self, document: &WorkflowDocument) -> Result<String> {
        let remote_id = uuid::Uuid::new_v4().to_string();
        self.documents
            .write()
            .await
            .insert(remote_id.clone(), document.clone());
        log::debug!("Stored workflow document {}", remote_id);
        Ok(remote_id)
    }

    async fn fetch_document(&self, remote_id: &str) -> Result<WorkflowDocument> {
        self.documents
            .read()
            .await
            .get(remote_id)
            .cloned()
            .ok_or_else(|| GraphError::Sink(format!("no document with id '{}'", remote_id)))
    }
}

impl Workflow {
    /// Encode this workflow and submit it to a sink
    pub async fn persist(&self, sink: &dyn DocumentSink) -> Result<String> {
        sink.submit_document(&to_document(self)).await
    }

    /// Fetch a document from a sink and rebuild the workflow
    pub async fn restore(sink: &dyn DocumentSink, remote_id: &str) -> Result<Workflow> {
        let document = sink.fetch_document(remote_id).await?;
        from_document(&document)
    }
}
