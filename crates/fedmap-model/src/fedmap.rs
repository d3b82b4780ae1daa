//! The [`Fedmap`] entry point.

use std::sync::Arc;

use tracing::debug;

use fedmap_index::IndexSink;
use fedmap_rdf::vocab::model;
use fedmap_repo::{RepositoryClient, RepositoryConfig};
use fedmap_types::{IdTranslator, ResourceId, ResourceUri};

use crate::descendants;
use crate::error::{ModelError, ModelResult};
use crate::fixity::FixityService;
use crate::model::{ModelCatalog, ModelType};
use crate::record::{Connection, ObjectRecord};

/// Name of the fallback type for resources without a known model.
pub const BASE_MODEL: &str = "Base";

/// Object mapper bound to one repository.
pub struct Fedmap {
    config: RepositoryConfig,
    conn: Connection,
    catalog: ModelCatalog,
}

impl Fedmap {
    pub fn new(repo: Arc<dyn RepositoryClient>, config: RepositoryConfig) -> ModelResult<Self> {
        let ids = IdTranslator::new(config.base()?);
        let conn = Connection {
            repo,
            ids,
            default_mime_type: config.default_mime_type.clone(),
        };
        Ok(Self {
            config,
            conn,
            catalog: ModelCatalog::new(ModelType::bare(BASE_MODEL)),
        })
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub fn repo(&self) -> &dyn RepositoryClient {
        self.conn.repo.as_ref()
    }

    pub fn ids(&self) -> &IdTranslator {
        &self.conn.ids
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Make `model` resolvable by [`find`](Self::find).
    pub fn register(&self, model: &Arc<ModelType>) {
        self.catalog.register(model);
    }

    /// An unsaved record with a freshly minted id.
    pub fn new_record(&self, model: &Arc<ModelType>) -> ObjectRecord {
        self.new_record_with_id(model, ResourceId::mint())
    }

    /// An unsaved record with the given id. Registers `model`.
    pub fn new_record_with_id(&self, model: &Arc<ModelType>, id: ResourceId) -> ObjectRecord {
        self.register(model);
        ObjectRecord::new(model.clone(), id, self.conn.clone())
    }

    /// Load a persisted record as the type named in its graph.
    pub fn find(&self, id: &ResourceId) -> ModelResult<ObjectRecord> {
        let uri = self.conn.ids.id_to_uri(id);
        let graph = self
            .conn
            .repo
            .fetch_resource(&uri)?
            .ok_or_else(|| ModelError::NotFound(id.clone()))?;
        let name = graph
            .first(uri.as_str(), model::HAS_MODEL)
            .and_then(|term| term.lexical())
            .map(str::to_string);
        let model = self.catalog.resolve(name.as_deref());
        debug!(id = %id, model = %model.name(), "loading record");
        ObjectRecord::load(model, id.clone(), graph, self.conn.clone())
    }

    pub fn exists(&self, id: &ResourceId) -> ModelResult<bool> {
        Ok(self.conn.repo.exists(&self.conn.ids.id_to_uri(id))?)
    }

    /// See [`descendants::descendant_uris`].
    pub fn descendant_uris(&self, root: &ResourceUri) -> ModelResult<Vec<ResourceUri>> {
        descendants::descendant_uris(self.repo(), root)
    }

    /// See [`descendants::reindex_everything`].
    pub fn reindex_everything(&self, sink: &dyn IndexSink) -> ModelResult<usize> {
        descendants::reindex_everything(self, sink)
    }

    /// Verify the checksum of the binary at `uri`.
    pub fn check_fixity(&self, uri: &ResourceUri) -> ModelResult<bool> {
        FixityService::new(uri.clone()).check(self.repo())
    }
}

impl std::fmt::Debug for Fedmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fedmap")
            .field("base", self.conn.ids.base())
            .field("default_mime_type", &self.conn.default_mime_type)
            .finish()
    }
}
