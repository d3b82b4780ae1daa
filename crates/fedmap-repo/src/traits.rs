use bytes::Bytes;
use fedmap_rdf::Graph;
use fedmap_types::ResourceUri;

use crate::error::RepositoryResult;
use crate::profile::{DatastreamPayload, DatastreamProfile, ResourceKind};

/// Client for the backing repository.
///
/// All implementations must satisfy these invariants:
/// - Calls block until the repository answers; timeouts and cancellation
///   are the implementation's concern and surface as errors.
/// - Errors are returned as-is. Callers decide whether to retry.
/// - A datastream `dsid` of object `object` lives at `object/dsid` and is a
///   [`ResourceKind::NonRdfSource`].
/// - `list_children` returns direct children only, in a stable order.
pub trait RepositoryClient: Send + Sync {
    /// Create a datastream. Fails with `AlreadyExists` if one is present.
    fn create_datastream(
        &self,
        object: &ResourceUri,
        dsid: &str,
        payload: DatastreamPayload<'_>,
    ) -> RepositoryResult<()>;

    /// Replace the content of an existing datastream, adding a version.
    /// Fails with `NotFound` if the datastream was never created.
    fn update_datastream(
        &self,
        object: &ResourceUri,
        dsid: &str,
        payload: DatastreamPayload<'_>,
    ) -> RepositoryResult<()>;

    /// Metadata for a stored datastream.
    fn fetch_profile(&self, object: &ResourceUri, dsid: &str) -> RepositoryResult<DatastreamProfile>;

    /// Current content of a datastream, `Ok(None)` if it does not exist.
    fn fetch_content(&self, object: &ResourceUri, dsid: &str) -> RepositoryResult<Option<Bytes>>;

    /// Create or replace a graph-backed resource.
    fn save_resource(&self, uri: &ResourceUri, graph: &Graph) -> RepositoryResult<()>;

    /// The graph of a resource, `Ok(None)` if it does not exist.
    fn fetch_resource(&self, uri: &ResourceUri) -> RepositoryResult<Option<Graph>>;

    /// Kind of the resource at `uri`, `Ok(None)` if nothing is there.
    fn head(&self, uri: &ResourceUri) -> RepositoryResult<Option<ResourceKind>>;

    /// Direct children of `uri`.
    fn list_children(&self, uri: &ResourceUri) -> RepositoryResult<Vec<ResourceUri>>;

    /// Remove the resource at `uri` together with everything it contains.
    /// Fails with `NotFound` if nothing is there.
    fn delete(&self, uri: &ResourceUri) -> RepositoryResult<()>;

    /// Run a fixity check on a binary and return the raw N-Triples report.
    fn fixity_check(&self, uri: &ResourceUri) -> RepositoryResult<String>;

    /// Returns `true` if anything exists at `uri`.
    fn exists(&self, uri: &ResourceUri) -> RepositoryResult<bool> {
        Ok(self.head(uri)?.is_some())
    }
}
