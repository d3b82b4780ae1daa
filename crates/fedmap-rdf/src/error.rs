//! Error types for RDF handling.

use thiserror::Error;

/// Errors that can occur while parsing or converting RDF.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RdfError {
    /// A line of N-Triples input could not be parsed.
    #[error("n-triples syntax error on line {line}: {reason}")]
    Syntax { line: usize, reason: String },

    /// A term could not be converted into an attribute value.
    #[error("cannot convert term {term} to a value: {reason}")]
    Conversion { term: String, reason: String },
}

/// Convenience type alias for RDF operations.
pub type RdfResult<T> = std::result::Result<T, RdfError>;
