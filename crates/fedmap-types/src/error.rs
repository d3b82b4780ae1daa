use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid resource id {id:?}: {reason}")]
    InvalidId { id: String, reason: String },

    #[error("invalid resource uri {uri:?}: {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("serialization error: {0}")]
    Serialization(String),
}
