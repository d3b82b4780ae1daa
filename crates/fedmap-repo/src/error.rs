use fedmap_types::ResourceUri;

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The addressed resource does not exist.
    #[error("resource not found: {0}")]
    NotFound(ResourceUri),

    /// A create targeted an address that is already occupied.
    #[error("resource already exists: {0}")]
    AlreadyExists(ResourceUri),

    /// The resource exists but is of the wrong kind for the operation.
    #[error("resource {uri} is not a {expected}")]
    KindMismatch { uri: ResourceUri, expected: String },

    /// The address lies outside the repository base.
    #[error("address outside repository: {0}")]
    InvalidAddress(String),

    /// Repository is read-only or otherwise refusing writes.
    #[error("repository is read-only")]
    ReadOnly,

    /// Failure reported by the underlying transport.
    #[error("transport error: {0}")]
    Transport(String),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Configuration could not be read or is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error reading local files (configuration).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;
