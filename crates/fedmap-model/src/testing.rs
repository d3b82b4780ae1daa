//! Shared fixtures for unit tests.

use std::sync::Arc;

use fedmap_rdf::vocab::dc;
use fedmap_repo::{InMemoryRepository, RepositoryClient, RepositoryConfig};
use fedmap_types::{Cardinality, ResourceId};

use crate::association::ReferenceAssociation;
use crate::fedmap::Fedmap;
use crate::model::ModelType;

pub const MEMBER_OF: &str = "http://pcdm.org/models#memberOf";

/// A mapper over a fresh in-memory repository, plus the repository itself
/// for its test hooks.
pub fn fedmap() -> (Fedmap, Arc<InMemoryRepository>) {
    let repo = Arc::new(InMemoryRepository::new());
    let client: Arc<dyn RepositoryClient> = repo.clone();
    let fedmap = Fedmap::new(client, RepositoryConfig::default()).unwrap();
    (fedmap, repo)
}

/// `Book`: graph-backed `title` (single) and `subject` (multiple),
/// `descMetadata` fields `abstract` (multiple) and `pages` (single), a
/// `library` reference and a `content` datastream.
pub fn book() -> Arc<ModelType> {
    ModelType::builder("Book")
        .property("title", dc::TITLE, Cardinality::Single)
        .property("subject", dc::SUBJECT, Cardinality::Multiple)
        .attributes("descMetadata", ["abstract"], Cardinality::Multiple)
        .attributes("descMetadata", ["pages"], Cardinality::Single)
        .association(ReferenceAssociation::single("library", MEMBER_OF))
        .datastream("content", None)
        .build()
        .unwrap()
}

/// `Source`: a single-valued `title` and a `sub_resource` of its own type.
pub fn source() -> Arc<ModelType> {
    ModelType::builder("Source")
        .property("title", dc::TITLE, Cardinality::Single)
        .contains_own("sub_resource")
        .build()
        .unwrap()
}

pub fn id(s: &str) -> ResourceId {
    ResourceId::new(s).unwrap()
}
