//! Error types for the model crate.

use fedmap_types::{Cardinality, ResourceId, Scalar};

/// Mistakes in a model declaration.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Datastream-backed attributes were declared without a datastream id.
    #[error("attributes {fields:?} on {model} must name a datastream")]
    MissingDatastream { model: String, fields: Vec<String> },

    /// An association and an attribute share a name.
    #[error("{name} is declared twice on {model}")]
    Conflict { model: String, name: String },
}

/// Errors surfaced by records, the registry and the repository workflows.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Read or write of a name that is neither an association nor a
    /// registered attribute.
    #[error("unknown attribute `{name}` for {model}")]
    UnknownAttribute { model: String, name: String },

    /// A sequence written to a single-valued attribute, or a scalar written
    /// to a multi-valued one.
    #[error("attribute `{name}` on {model} is declared {expected}")]
    CardinalityMismatch {
        model: String,
        name: String,
        expected: Cardinality,
    },

    /// An association was given something other than record references.
    #[error("association `{name}` only accepts record references, got {found}")]
    InvalidReference { name: String, found: Scalar },

    /// The identity of a persisted record cannot change.
    #[error("id of persisted record {0} is read-only")]
    ReadOnlyId(ResourceId),

    /// No graph resource exists for the id.
    #[error("record not found: {0}")]
    NotFound(ResourceId),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("invalid identifier: {0}")]
    Type(#[from] fedmap_types::TypeError),

    #[error("repository error: {0}")]
    Repository(#[from] fedmap_repo::RepositoryError),

    #[error("rdf error: {0}")]
    Rdf(#[from] fedmap_rdf::RdfError),

    #[error("index error: {0}")]
    Index(#[from] fedmap_index::IndexError),

    /// A datastream field document could not be read or written.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for model results.
pub type ModelResult<T> = Result<T, ModelError>;
