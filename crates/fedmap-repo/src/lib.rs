//! Repository client boundary for fedmap.
//!
//! The mapping layer never speaks a wire protocol itself. Everything it
//! needs from the backing repository goes through [`RepositoryClient`]:
//! datastream create/update/profile/content, graph-backed resources,
//! containment listing, and fixity checks.
//!
//! # Backends
//!
//! - [`InMemoryRepository`] -- containment tree held in memory, for tests and
//!   embedding
//!
//! # Design Rules
//!
//! 1. Calls are blocking; timeouts and cancellation belong to the backend.
//! 2. Failures are returned unchanged, never retried here.
//! 3. Datastreams are non-graph children of their object (`object/dsid`).
//! 4. Fixity responses are N-Triples, in whichever vocabulary the
//!    repository version speaks.

pub mod config;
pub mod error;
pub mod memory;
pub mod profile;
pub mod traits;

pub use config::{FixityVocabulary, RepositoryConfig};
pub use error::{RepositoryError, RepositoryResult};
pub use memory::InMemoryRepository;
pub use profile::{ControlGroup, DatastreamPayload, DatastreamProfile, ResourceKind};
pub use traits::RepositoryClient;
