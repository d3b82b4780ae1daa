//! Object mapping for fedmap.
//!
//! Maps domain records onto a repository that keeps part of each record as
//! triples in the record's graph and part as fields inside named,
//! versioned datastreams. Both appear to application code as ordinary
//! attributes with declared cardinality and change tracking.
//!
//! # Key Types
//!
//! - [`Fedmap`] -- Entry point bound to one repository
//! - [`ModelType`] -- Declared attributes, associations and datastreams
//! - [`AttributeRegistry`] -- Per-type attribute table, copy-on-first-write
//! - [`ObjectRecord`] -- One record: graph, datastreams and change tracking
//! - [`Datastream`] -- Lifecycle of one versioned content unit
//! - [`FixityService`] -- Checksum verification against the repository
//!
//! # Design Rules
//!
//! 1. Names resolve as association, then graph property, then datastream field.
//! 2. Shape mismatches are rejected before anything is written.
//! 3. Repository failures propagate unchanged and leave change tracking as it was.
//! 4. A fixity report without a recognized outcome is a failed check.

pub mod association;
pub mod datastream;
pub mod descendants;
pub mod dirty;
pub mod error;
pub mod fedmap;
pub mod fixity;
pub mod model;
pub mod record;
pub mod registry;

#[cfg(test)]
pub(crate) mod testing;

pub use association::{Association, ReferenceAssociation};
pub use datastream::{Datastream, FieldDocument, FIELD_DOCUMENT_MIME_TYPE};
pub use descendants::{descendant_uris, reindex_everything};
pub use dirty::{AttributeChange, DirtyTracker};
pub use error::{ModelError, ModelResult, RegistryError};
pub use fedmap::{Fedmap, BASE_MODEL};
pub use fixity::{parse_fixity_response, FixityService, FIXITY_SUCCESS};
pub use model::{
    ContainedModel, ContainsSpec, DatastreamSpec, ModelCatalog, ModelType, ModelTypeBuilder,
};
pub use record::{ObjectRecord, ID_ATTRIBUTE};
pub use registry::{AttributeDescriptor, AttributeRegistry, Storage};
