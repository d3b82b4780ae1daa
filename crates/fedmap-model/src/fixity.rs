//! Fixity verification.
//!
//! The repository reports a checksum verification as triples. Repositories
//! from 4.4.0 on use `premis:hasEventOutcome`; older ones use
//! `fcrepo:status`. Both are accepted without the caller naming a version.
//! A report carrying neither predicate counts as a failed check.

use tracing::{info, warn};

use fedmap_rdf::vocab::{fcrepo, premis};
use fedmap_rdf::{ntriples, RdfResult};
use fedmap_repo::RepositoryClient;
use fedmap_types::ResourceUri;

use crate::error::ModelResult;

/// Outcome token of a passing check. Compared exactly.
pub const FIXITY_SUCCESS: &str = "SUCCESS";

/// Classify a raw fixity report.
///
/// The premis outcome wins when both predicates are present.
pub fn parse_fixity_response(body: &str) -> RdfResult<bool> {
    let triples = ntriples::parse(body)?;
    let outcome = [premis::HAS_EVENT_OUTCOME, fcrepo::STATUS]
        .into_iter()
        .find_map(|predicate| triples.iter().find(|t| t.predicate == predicate))
        .map(|t| &t.object);
    Ok(outcome.and_then(|o| o.lexical()) == Some(FIXITY_SUCCESS))
}

/// Runs fixity checks against one binary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixityService {
    target: ResourceUri,
}

impl FixityService {
    pub fn new(target: ResourceUri) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &ResourceUri {
        &self.target
    }

    /// Ask the repository to verify the target. `Ok(false)` covers both a
    /// checksum mismatch and an unrecognized report.
    pub fn check(&self, repo: &dyn RepositoryClient) -> ModelResult<bool> {
        let body = repo.fixity_check(&self.target)?;
        let passed = parse_fixity_response(&body)?;
        if passed {
            info!(uri = %self.target, "fixity check passed");
        } else {
            warn!(uri = %self.target, "fixity check failed");
        }
        Ok(passed)
    }
}
