//! Error types for the index crate.

/// Errors that can occur while submitting to an index.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The document was rejected by the index.
    #[error("document {id} rejected: {reason}")]
    Rejected { id: String, reason: String },

    /// The index could not be reached or failed internally.
    #[error("index unavailable: {0}")]
    Unavailable(String),

    /// Serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
