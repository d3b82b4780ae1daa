//! RDF support for fedmap.
//!
//! Object records keep part of their state as triples attached to the
//! record's subject. This crate provides the term model, the [`GraphStore`]
//! boundary with an in-memory [`Graph`], and an N-Triples reader/writer used
//! for repository responses such as fixity reports.
//!
//! # Modules
//!
//! - [`term`] — [`Term`] and [`Triple`], plus scalar conversion
//! - [`graph`] — [`GraphStore`] trait and the ordered in-memory [`Graph`]
//! - [`ntriples`] — Line-based N-Triples parsing and serialization
//! - [`vocab`] — Predicate IRIs used by the mapping layer

pub mod error;
pub mod graph;
pub mod ntriples;
pub mod term;
pub mod vocab;

pub use error::{RdfError, RdfResult};
pub use graph::{Graph, GraphStore};
pub use term::{Term, Triple};
