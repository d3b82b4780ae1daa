//! Search-index projection boundary for fedmap.
//!
//! Records are projected into flat [`IndexDocument`]s and handed to an
//! [`IndexSink`]. Querying belongs to the index itself; this crate only
//! carries the submission contract and an in-memory sink for tests.
//!
//! # Key Types
//!
//! - [`IndexDocument`] -- Identifier plus ordered JSON fields
//! - [`IndexSink`] -- Trait every index backend implements
//! - [`InMemoryIndex`] -- `RwLock`-backed sink keyed by identifier

pub mod document;
pub mod error;
pub mod memory;
pub mod traits;

pub use document::IndexDocument;
pub use error::{IndexError, IndexResult};
pub use memory::InMemoryIndex;
pub use traits::IndexSink;
