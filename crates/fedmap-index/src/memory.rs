//! In-memory index for testing and ephemeral use.
//!
//! [`InMemoryIndex`] keeps documents in a `BTreeMap` keyed by identifier
//! behind a `RwLock`. Data is lost when the index is dropped.

use std::collections::BTreeMap;
use std::sync::RwLock;

use tracing::debug;

use crate::document::IndexDocument;
use crate::error::{IndexError, IndexResult};
use crate::traits::IndexSink;

#[derive(Debug, Default)]
pub struct InMemoryIndex {
    documents: RwLock<BTreeMap<String, IndexDocument>>,
}

impl InMemoryIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a document by identifier.
    pub fn query_id(&self, id: &str) -> IndexResult<Option<IndexDocument>> {
        let documents = self
            .documents
            .read()
            .map_err(|e| IndexError::Unavailable(format!("lock poisoned: {e}")))?;
        Ok(documents.get(id).cloned())
    }

    /// All documents, sorted by identifier.
    pub fn documents(&self) -> IndexResult<Vec<IndexDocument>> {
        let documents = self
            .documents
            .read()
            .map_err(|e| IndexError::Unavailable(format!("lock poisoned: {e}")))?;
        Ok(documents.values().cloned().collect())
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.documents.read().map(|d| d.len()).unwrap_or(0)
    }

    /// Returns `true` if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IndexSink for InMemoryIndex {
    fn submit(&self, document: IndexDocument) -> IndexResult<()> {
        if document.id.is_empty() {
            return Err(IndexError::Rejected {
                id: document.id,
                reason: "empty identifier".into(),
            });
        }
        let mut documents = self
            .documents
            .write()
            .map_err(|e| IndexError::Unavailable(format!("lock poisoned: {e}")))?;
        debug!(id = %document.id, "indexed document");
        documents.insert(document.id.clone(), document);
        Ok(())
    }

    fn delete_all(&self) -> IndexResult<()> {
        let mut documents = self
            .documents
            .write()
            .map_err(|e| IndexError::Unavailable(format!("lock poisoned: {e}")))?;
        debug!(count = documents.len(), "cleared index");
        documents.clear();
        Ok(())
    }
}
