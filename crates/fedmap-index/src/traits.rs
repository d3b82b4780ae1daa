use crate::document::IndexDocument;
use crate::error::IndexResult;

/// Destination for projected records.
///
/// Submitting a document whose id is already indexed replaces the earlier
/// entry, so reindexing the same record twice is harmless.
pub trait IndexSink: Send + Sync {
    /// Add or replace one document.
    fn submit(&self, document: IndexDocument) -> IndexResult<()>;

    /// Drop every document.
    fn delete_all(&self) -> IndexResult<()>;
}
