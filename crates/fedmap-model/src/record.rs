//! Object records.
//!
//! An [`ObjectRecord`] composes a model type, the record's graph, its
//! datastreams and a [`DirtyTracker`]. Attribute names resolve in a fixed
//! order: association, then graph property, then datastream field. Anything
//! else is an unknown attribute.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use fedmap_index::IndexDocument;
use fedmap_rdf::vocab::model;
use fedmap_rdf::{Graph, GraphStore, Term};
use fedmap_repo::{RepositoryClient, ResourceKind};
use fedmap_types::{Cardinality, IdTranslator, ResourceId, ResourceUri, Scalar, TypeError, Value};

use crate::datastream::Datastream;
use crate::descendants;
use crate::dirty::{AttributeChange, DirtyTracker};
use crate::error::{ModelError, ModelResult};
use crate::model::{ContainedModel, DatastreamSpec, ModelType};
use crate::registry::{AttributeDescriptor, Storage};

/// Name under which the identifier appears in [`ObjectRecord::attributes`].
pub const ID_ATTRIBUTE: &str = "id";

/// Handles a record needs to reach the repository.
#[derive(Clone)]
pub(crate) struct Connection {
    pub(crate) repo: Arc<dyn RepositoryClient>,
    pub(crate) ids: IdTranslator,
    pub(crate) default_mime_type: String,
}

pub struct ObjectRecord {
    model: Arc<ModelType>,
    id: ResourceId,
    uri: ResourceUri,
    graph: Graph,
    datastreams: BTreeMap<String, Datastream>,
    contained: BTreeMap<String, ObjectRecord>,
    tracker: DirtyTracker,
    new_record: bool,
    conn: Connection,
}

fn declared_datastream(object: &ResourceUri, spec: &DatastreamSpec) -> Datastream {
    let mut ds = Datastream::new(object.clone(), spec.dsid.clone());
    if let Some(mime_type) = &spec.mime_type {
        ds.set_mime_type(mime_type.clone());
    }
    ds
}

impl ObjectRecord {
    pub(crate) fn new(model: Arc<ModelType>, id: ResourceId, conn: Connection) -> Self {
        let uri = conn.ids.id_to_uri(&id);
        let datastreams = model
            .datastreams()
            .iter()
            .map(|spec| (spec.dsid.clone(), declared_datastream(&uri, spec)))
            .collect();
        Self {
            model,
            id,
            uri,
            graph: Graph::new(),
            datastreams,
            contained: BTreeMap::new(),
            tracker: DirtyTracker::new(),
            new_record: true,
            conn,
        }
    }

    /// A persisted record built from its stored graph.
    pub(crate) fn load(
        model: Arc<ModelType>,
        id: ResourceId,
        graph: Graph,
        conn: Connection,
    ) -> ModelResult<Self> {
        let mut record = Self::new(model, id, conn);
        record.graph = graph;
        record.new_record = false;
        record.load_datastreams()?;
        Ok(record)
    }

    fn load_datastreams(&mut self) -> ModelResult<()> {
        let repo = self.conn.repo.as_ref();
        let mut datastreams = BTreeMap::new();
        for spec in self.model.datastreams() {
            let loaded = match repo.head(&self.uri.child(&spec.dsid))? {
                Some(ResourceKind::NonRdfSource) => Datastream::load(repo, &self.uri, &spec.dsid)?,
                Some(ResourceKind::RdfSource) => {
                    warn!(id = %self.id, dsid = %spec.dsid, "datastream path holds a graph resource");
                    None
                }
                None => None,
            };
            let ds = loaded.unwrap_or_else(|| declared_datastream(&self.uri, spec));
            datastreams.insert(spec.dsid.clone(), ds);
        }
        for child in repo.list_children(&self.uri)? {
            let Some(dsid) = child
                .as_str()
                .strip_prefix(self.uri.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
            else {
                continue;
            };
            if datastreams.contains_key(dsid) || repo.head(&child)? != Some(ResourceKind::NonRdfSource) {
                continue;
            }
            if let Some(ds) = Datastream::load(repo, &self.uri, dsid)? {
                datastreams.insert(dsid.to_string(), ds);
            }
        }
        debug!(id = %self.id, count = datastreams.len(), "loaded datastreams");
        self.datastreams = datastreams;
        Ok(())
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    pub fn uri(&self) -> &ResourceUri {
        &self.uri
    }

    pub fn model(&self) -> &Arc<ModelType> {
        &self.model
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// `true` until the first successful save.
    pub fn is_new_record(&self) -> bool {
        self.new_record
    }

    // ---------------------------------------------------------------
    // Datastreams
    // ---------------------------------------------------------------

    pub fn datastream(&self, dsid: &str) -> Option<&Datastream> {
        self.datastreams.get(dsid)
    }

    /// The datastream `dsid`, created in memory on first reference.
    pub fn datastream_mut(&mut self, dsid: &str) -> &mut Datastream {
        let uri = &self.uri;
        self.datastreams
            .entry(dsid.to_string())
            .or_insert_with(|| Datastream::new(uri.clone(), dsid))
    }

    pub fn datastreams(&self) -> impl Iterator<Item = &Datastream> {
        self.datastreams.values()
    }

    // ---------------------------------------------------------------
    // Contained sub-resources
    // ---------------------------------------------------------------

    /// The contained sub-resource `name`, if it was opened already.
    pub fn contained(&self, name: &str) -> Option<&ObjectRecord> {
        self.contained.get(name)
    }

    /// The contained sub-resource `name`. Loaded from the repository on
    /// first use when it exists there, otherwise created in memory. It is
    /// saved together with this record.
    pub fn contained_mut(&mut self, name: &str) -> ModelResult<&mut ObjectRecord> {
        if !self.contained.contains_key(name) {
            let record = self.open_contained(name)?;
            self.contained.insert(name.to_string(), record);
        }
        self.contained.get_mut(name).ok_or_else(|| ModelError::UnknownAttribute {
            model: self.model.name().to_string(),
            name: name.to_string(),
        })
    }

    fn contained_id(&self, name: &str) -> ModelResult<ResourceId> {
        Ok(ResourceId::new(format!("{}/{name}", self.id))?)
    }

    fn open_contained(&self, name: &str) -> ModelResult<ObjectRecord> {
        let spec = self.model.contained(name).ok_or_else(|| self.unknown(name))?;
        let model = match &spec.model {
            ContainedModel::Own => self.model.clone(),
            ContainedModel::Other(model) => model.clone(),
        };
        let id = self.contained_id(name)?;
        if !self.new_record {
            let uri = self.conn.ids.id_to_uri(&id);
            if let Some(graph) = self.conn.repo.fetch_resource(&uri)? {
                return ObjectRecord::load(model, id, graph, self.conn.clone());
            }
        }
        Ok(ObjectRecord::new(model, id, self.conn.clone()))
    }

    /// Anything a save would write.
    fn needs_save(&self) -> bool {
        self.new_record
            || self.tracker.has_changes()
            || self.datastreams.values().any(Datastream::has_unsaved_content)
            || self.contained.values().any(ObjectRecord::needs_save)
    }

    // ---------------------------------------------------------------
    // Attribute access
    // ---------------------------------------------------------------

    fn unknown(&self, name: &str) -> ModelError {
        ModelError::UnknownAttribute {
            model: self.model.name().to_string(),
            name: name.to_string(),
        }
    }

    fn descriptor(&self, name: &str) -> ModelResult<AttributeDescriptor> {
        self.model
            .registry()
            .get(name)
            .ok_or_else(|| self.unknown(name))
    }

    fn check_shape(&self, name: &str, expected: Cardinality, value: &Value) -> ModelResult<()> {
        if value.is_blank() || value.is_sequence() == expected.is_multiple() {
            return Ok(());
        }
        Err(ModelError::CardinalityMismatch {
            model: self.model.name().to_string(),
            name: name.to_string(),
            expected,
        })
    }

    /// Stored values of an attribute, in order.
    fn stored(&self, descriptor: &AttributeDescriptor) -> ModelResult<Vec<Scalar>> {
        match &descriptor.storage {
            Storage::GraphProperty { predicate } => self
                .graph
                .read(self.uri.as_str(), predicate)
                .iter()
                .map(|term| term.to_scalar(&self.conn.ids).map_err(ModelError::from))
                .collect(),
            Storage::DatastreamField { dsid } => match self.datastreams.get(dsid) {
                Some(ds) => ds.field(&descriptor.name),
                None => Ok(Vec::new()),
            },
        }
    }

    /// Read an attribute. Multi-valued attributes yield the full sequence,
    /// single-valued ones their first value or `Null`.
    pub fn get(&self, name: &str) -> ModelResult<Value> {
        if name == ID_ATTRIBUTE {
            return Ok(Value::from(self.id.as_str()));
        }
        if let Some(association) = self.model.association(name) {
            return association.read(&self.graph, self.uri.as_str(), &self.conn.ids);
        }
        let descriptor = self.descriptor(name)?;
        Ok(Value::shaped(self.stored(&descriptor)?, descriptor.cardinality))
    }

    /// Write an attribute.
    ///
    /// The value's shape must match the declared cardinality (blank values
    /// always pass). Nothing is written when the check fails.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> ModelResult<()> {
        let value = value.into();
        if name == ID_ATTRIBUTE {
            return self.assign_id(value);
        }
        if let Some(association) = self.model.association(name).cloned() {
            self.check_shape(name, association.cardinality(), &value)?;
            let from = association.read(&self.graph, self.uri.as_str(), &self.conn.ids)?;
            association.replace(&mut self.graph, self.uri.as_str(), value, &self.conn.ids)?;
            let to = association.read(&self.graph, self.uri.as_str(), &self.conn.ids)?;
            self.track(name, from, to);
            return Ok(());
        }

        let descriptor = self.descriptor(name)?;
        self.check_shape(name, descriptor.cardinality, &value)?;
        let from = Value::shaped(self.stored(&descriptor)?, descriptor.cardinality);
        let items = value.into_vec();
        match &descriptor.storage {
            Storage::GraphProperty { predicate } => {
                let terms = self.terms(&items);
                self.graph.write(self.uri.as_str(), predicate, terms);
            }
            Storage::DatastreamField { dsid } => {
                self.datastream_mut(dsid).set_field(&descriptor.name, items)?;
            }
        }
        let to = Value::shaped(self.stored(&descriptor)?, descriptor.cardinality);
        self.track(name, from, to);
        Ok(())
    }

    fn terms(&self, items: &[Scalar]) -> Vec<Term> {
        items
            .iter()
            .map(|s| Term::from_scalar(s, &self.conn.ids))
            .collect()
    }

    /// What `get(name)` would return after `set(name, value)`, computed
    /// without touching the record.
    fn written_form(&self, name: &str, value: Value) -> ModelResult<Value> {
        let subject = self.uri.as_str();
        if name == ID_ATTRIBUTE {
            return Ok(Value::shaped(value.into_vec(), Cardinality::Single));
        }
        if let Some(association) = self.model.association(name) {
            let mut scratch = Graph::new();
            association.replace(&mut scratch, subject, value, &self.conn.ids)?;
            return association.read(&scratch, subject, &self.conn.ids);
        }
        let descriptor = self.descriptor(name)?;
        let items = match &descriptor.storage {
            Storage::GraphProperty { predicate } => {
                let mut scratch = Graph::new();
                scratch.write(subject, predicate, self.terms(&value.into_vec()));
                scratch
                    .read(subject, predicate)
                    .iter()
                    .map(|term| term.to_scalar(&self.conn.ids).map_err(ModelError::from))
                    .collect::<ModelResult<Vec<_>>>()?
            }
            Storage::DatastreamField { .. } => value.into_vec(),
        };
        Ok(Value::shaped(items, descriptor.cardinality))
    }

    fn track(&mut self, name: &str, from: Value, to: Value) {
        if from != to {
            debug!(id = %self.id, attribute = name, "attribute changed");
            self.tracker.mark_changed(name, from, to);
        }
    }

    fn assign_id(&mut self, value: Value) -> ModelResult<()> {
        let id = match value {
            Value::Single(Scalar::Text(text)) => ResourceId::new(text)?,
            Value::Single(Scalar::Reference(id)) => id,
            other => {
                return Err(TypeError::InvalidId {
                    id: other.to_string(),
                    reason: "expected a single identifier".into(),
                }
                .into())
            }
        };
        if id == self.id {
            return Ok(());
        }
        if !self.new_record {
            return Err(ModelError::ReadOnlyId(self.id.clone()));
        }
        for (name, child) in self.contained.iter_mut() {
            child.assign_id(Value::from(format!("{id}/{name}")))?;
        }
        let uri = self.conn.ids.id_to_uri(&id);
        let old_subject = Term::iri(self.uri.as_str());
        self.graph = Graph::from_triples(self.graph.triples().into_iter().map(|mut triple| {
            if triple.subject == old_subject {
                triple.subject = Term::iri(uri.as_str());
            }
            triple
        }));
        for ds in self.datastreams.values_mut() {
            ds.rehome(uri.clone());
        }
        let from = Value::from(self.id.as_str());
        self.track(ID_ATTRIBUTE, from, Value::from(id.as_str()));
        self.id = id;
        self.uri = uri;
        Ok(())
    }

    /// Apply entries in order, stopping at the first failure. Entries before
    /// the failing one stay applied.
    pub fn set_attributes<I, K, V>(&mut self, entries: I) -> ModelResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (name, value) in entries {
            self.set(name.as_ref(), value)?;
        }
        Ok(())
    }

    /// Every registered attribute plus `id`.
    pub fn attributes(&self) -> ModelResult<BTreeMap<String, Value>> {
        let mut attributes = BTreeMap::new();
        attributes.insert(ID_ATTRIBUTE.to_string(), self.get(ID_ATTRIBUTE)?);
        for name in self.model.registry().names() {
            let value = self.get(&name)?;
            attributes.insert(name, value);
        }
        Ok(attributes)
    }

    // ---------------------------------------------------------------
    // Change tracking
    // ---------------------------------------------------------------

    /// `true` iff writing `value` would change what `get(name)` returns.
    /// Values an association cannot store are an error.
    pub fn value_changed(&self, name: &str, value: impl Into<Value>) -> ModelResult<bool> {
        let candidate = self.written_form(name, value.into())?;
        Ok(candidate != self.get(name)?)
    }

    /// Flag an attribute as changed without writing it. A datastream-backed
    /// attribute also marks its datastream dirty.
    pub fn mark_changed(&mut self, name: &str) -> ModelResult<()> {
        let current = self.get(name)?;
        if let Some(dsid) = self
            .model
            .registry()
            .get(name)
            .and_then(|d| d.dsid().map(str::to_string))
        {
            self.datastream_mut(&dsid).mark_dirty();
        }
        self.tracker.mark_changed(name, current.clone(), current);
        Ok(())
    }

    pub fn is_changed(&self, name: &str) -> bool {
        self.tracker.is_changed(name)
    }

    pub fn has_changes(&self) -> bool {
        self.tracker.has_changes()
    }

    /// Names of attributes changed since the last save.
    pub fn changed(&self) -> Vec<&str> {
        self.tracker.changed()
    }

    pub fn changes(&self) -> &BTreeMap<String, AttributeChange> {
        self.tracker.changes()
    }

    pub fn previous_changes(&self) -> &BTreeMap<String, AttributeChange> {
        self.tracker.previous_changes()
    }

    // ---------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------

    /// Persist the graph, then every datastream with unsaved content, then
    /// contained sub-resources with anything to write.
    ///
    /// Change tracking is cleared only when everything succeeded; a failed
    /// save leaves it untouched.
    pub fn save(&mut self) -> ModelResult<()> {
        let repo = self.conn.repo.clone();
        let mut graph = self.graph.clone();
        graph.write(
            self.uri.as_str(),
            model::HAS_MODEL,
            vec![Term::literal(self.model.name())],
        );
        repo.save_resource(&self.uri, &graph)?;
        self.graph = graph;

        let mut written = 0usize;
        for ds in self.datastreams.values_mut() {
            if ds.save(repo.as_ref(), &self.conn.default_mime_type)? {
                written += 1;
            }
        }
        for child in self.contained.values_mut() {
            if child.needs_save() {
                child.save()?;
            }
        }

        let changed = self.tracker.changed().len();
        self.tracker.snapshot_and_clear();
        self.new_record = false;
        info!(id = %self.id, model = %self.model.name(), changed, datastreams = written, "saved record");
        Ok(())
    }

    /// Replace in-memory state with what the repository holds. Unsaved
    /// changes are discarded.
    pub fn reload(&mut self) -> ModelResult<()> {
        let graph = self
            .conn
            .repo
            .fetch_resource(&self.uri)?
            .ok_or_else(|| ModelError::NotFound(self.id.clone()))?;
        self.graph = graph;
        self.load_datastreams()?;
        self.contained.clear();
        self.tracker = DirtyTracker::new();
        self.new_record = false;
        debug!(id = %self.id, "reloaded record");
        Ok(())
    }

    /// Delete the record with its datastreams and everything it contains,
    /// deepest resources first. Returns the number of resources removed; an
    /// unsaved record removes nothing.
    pub fn destroy(self) -> ModelResult<usize> {
        if self.new_record {
            return Ok(0);
        }
        let repo = self.conn.repo.as_ref();
        let containers = descendants::descendant_uris(repo, &self.uri)?;
        let mut removed = 0usize;
        for uri in containers.iter().rev() {
            for child in repo.list_children(uri)? {
                if repo.head(&child)? == Some(ResourceKind::NonRdfSource) {
                    repo.delete(&child)?;
                    removed += 1;
                }
            }
            repo.delete(uri)?;
            removed += 1;
        }
        info!(id = %self.id, removed, "destroyed record");
        Ok(removed)
    }

    /// Flat projection for the search index.
    pub fn to_index_document(&self) -> ModelResult<IndexDocument> {
        let mut document = IndexDocument::new(self.id.as_str());
        document.insert("has_model", self.model.name());
        for (name, value) in self.attributes()? {
            if name != ID_ATTRIBUTE {
                document.insert(name, value.to_json());
            }
        }
        for association in self.model.associations() {
            let value = association.read(&self.graph, self.uri.as_str(), &self.conn.ids)?;
            document.insert(association.name(), value.to_json());
        }
        Ok(document)
    }
}

/// Renders as `#<Book pid: "foo", title: "A title", subject: ["a", "b"]>`.
impl fmt::Debug for ObjectRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<{} pid: {:?}", self.model.name(), self.id.as_str())?;
        for name in self.model.registry().names() {
            let value = self.get(&name).unwrap_or_default();
            write!(f, ", {name}: {value}")?;
        }
        write!(f, ">")
    }
}
