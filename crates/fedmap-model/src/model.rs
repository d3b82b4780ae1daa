//! Model type declarations.
//!
//! A [`ModelType`] is declared once through [`ModelType::builder`] and
//! shared behind an `Arc` by every record of that type. The catalog maps the
//! model name persisted with each record back to its type.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use fedmap_types::Cardinality;

use crate::association::Association;
use crate::datastream::FIELD_DOCUMENT_MIME_TYPE;
use crate::error::{ModelResult, RegistryError};
use crate::registry::{AttributeRegistry, Storage};

/// A datastream every record of a type carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatastreamSpec {
    pub dsid: String,
    /// MIME type for the first save; the repository default applies when
    /// `None`.
    pub mime_type: Option<String>,
}

/// Model of a contained sub-resource.
#[derive(Clone, Debug)]
pub enum ContainedModel {
    /// Same type as the owning record.
    Own,
    Other(Arc<ModelType>),
}

/// A graph sub-resource every record of a type owns at `record_uri/name`.
#[derive(Clone, Debug)]
pub struct ContainsSpec {
    pub name: String,
    pub model: ContainedModel,
}

#[derive(Debug)]
pub struct ModelType {
    name: String,
    parent: Option<Arc<ModelType>>,
    registry: Arc<AttributeRegistry>,
    associations: Vec<Arc<dyn Association>>,
    datastreams: Vec<DatastreamSpec>,
    contains: Vec<ContainsSpec>,
}

impl ModelType {
    /// Start declaring a type.
    pub fn builder(name: impl Into<String>) -> ModelTypeBuilder {
        ModelTypeBuilder {
            name: name.into(),
            parent: None,
            steps: Vec::new(),
        }
    }

    /// A type with no attributes, associations or datastreams.
    pub fn bare(name: impl Into<String>) -> Arc<Self> {
        let name = name.into();
        Arc::new(Self {
            registry: Arc::new(AttributeRegistry::new(name.clone())),
            name,
            parent: None,
            associations: Vec::new(),
            datastreams: Vec::new(),
            contains: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Arc<ModelType>> {
        self.parent.as_ref()
    }

    pub fn registry(&self) -> &AttributeRegistry {
        &self.registry
    }

    /// Association declared under `name`, on this type or an ancestor.
    pub fn association(&self, name: &str) -> Option<&Arc<dyn Association>> {
        self.associations.iter().find(|a| a.name() == name)
    }

    pub fn associations(&self) -> &[Arc<dyn Association>] {
        &self.associations
    }

    /// Declared datastreams, ancestors' first.
    pub fn datastreams(&self) -> &[DatastreamSpec] {
        &self.datastreams
    }

    pub fn datastream(&self, dsid: &str) -> Option<&DatastreamSpec> {
        self.datastreams.iter().find(|d| d.dsid == dsid)
    }

    /// Declared sub-resources, ancestors' first.
    pub fn contains(&self) -> &[ContainsSpec] {
        &self.contains
    }

    pub fn contained(&self, name: &str) -> Option<&ContainsSpec> {
        self.contains.iter().find(|c| c.name == name)
    }

    /// Returns `true` if this type is `name` or descends from it.
    pub fn is_kind_of(&self, name: &str) -> bool {
        self.name == name || self.parent.as_ref().is_some_and(|p| p.is_kind_of(name))
    }
}

enum Step {
    Property {
        name: String,
        predicate: String,
        cardinality: Cardinality,
    },
    Fields {
        dsid: String,
        fields: Vec<String>,
        cardinality: Cardinality,
    },
    Association(Arc<dyn Association>),
    Datastream(DatastreamSpec),
    Contains(ContainsSpec),
}

/// Collects declarations; [`build`](Self::build) validates and applies them
/// in order.
pub struct ModelTypeBuilder {
    name: String,
    parent: Option<Arc<ModelType>>,
    steps: Vec<Step>,
}

impl ModelTypeBuilder {
    /// Inherit attributes, associations and datastreams from `parent`.
    pub fn parent(mut self, parent: &Arc<ModelType>) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    /// A graph-backed attribute stored under `predicate`.
    pub fn property(
        mut self,
        name: impl Into<String>,
        predicate: impl Into<String>,
        cardinality: Cardinality,
    ) -> Self {
        self.steps.push(Step::Property {
            name: name.into(),
            predicate: predicate.into(),
            cardinality,
        });
        self
    }

    /// Datastream-backed attributes stored as fields of `dsid`.
    pub fn attributes<I, S>(mut self, dsid: impl Into<String>, fields: I, cardinality: Cardinality) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.steps.push(Step::Fields {
            dsid: dsid.into(),
            fields: fields.into_iter().map(Into::into).collect(),
            cardinality,
        });
        self
    }

    pub fn association(mut self, association: impl Association + 'static) -> Self {
        self.steps.push(Step::Association(Arc::new(association)));
        self
    }

    /// A datastream carried by every record of the type.
    pub fn datastream(mut self, dsid: impl Into<String>, mime_type: Option<&str>) -> Self {
        self.steps.push(Step::Datastream(DatastreamSpec {
            dsid: dsid.into(),
            mime_type: mime_type.map(str::to_string),
        }));
        self
    }

    /// A graph sub-resource of type `model` at `record_uri/name`.
    pub fn contains(mut self, name: impl Into<String>, model: &Arc<ModelType>) -> Self {
        self.steps.push(Step::Contains(ContainsSpec {
            name: name.into(),
            model: ContainedModel::Other(model.clone()),
        }));
        self
    }

    /// Like [`contains`](Self::contains), with the type being declared.
    pub fn contains_own(mut self, name: impl Into<String>) -> Self {
        self.steps.push(Step::Contains(ContainsSpec {
            name: name.into(),
            model: ContainedModel::Own,
        }));
        self
    }

    pub fn build(self) -> ModelResult<Arc<ModelType>> {
        let registry = match &self.parent {
            Some(parent) => AttributeRegistry::inherit(parent.registry.clone(), self.name.clone()),
            None => AttributeRegistry::new(self.name.clone()),
        };
        let mut associations: Vec<Arc<dyn Association>> = self
            .parent
            .as_ref()
            .map(|p| p.associations.clone())
            .unwrap_or_default();
        let mut datastreams: Vec<DatastreamSpec> = self
            .parent
            .as_ref()
            .map(|p| p.datastreams.clone())
            .unwrap_or_default();
        let mut contains: Vec<ContainsSpec> = self
            .parent
            .as_ref()
            .map(|p| p.contains.clone())
            .unwrap_or_default();

        let conflict = |name: &str| RegistryError::Conflict {
            model: self.name.clone(),
            name: name.to_string(),
        };

        for step in self.steps {
            match step {
                Step::Property {
                    name,
                    predicate,
                    cardinality,
                } => {
                    if associations.iter().any(|a| a.name() == name)
                        || contains.iter().any(|c| c.name == name)
                    {
                        return Err(conflict(&name).into());
                    }
                    registry.register(name, Storage::GraphProperty { predicate }, cardinality);
                }
                Step::Fields {
                    dsid,
                    fields,
                    cardinality,
                } => {
                    if let Some(name) = fields.iter().find(|f| {
                        associations.iter().any(|a| a.name() == f.as_str())
                            || contains.iter().any(|c| &c.name == *f)
                    }) {
                        return Err(conflict(name).into());
                    }
                    registry.register_datastream_attributes(fields, &dsid, cardinality)?;
                    if !datastreams.iter().any(|d| d.dsid == dsid) {
                        datastreams.push(DatastreamSpec {
                            dsid,
                            mime_type: Some(FIELD_DOCUMENT_MIME_TYPE.to_string()),
                        });
                    }
                }
                Step::Association(association) => {
                    if registry.contains(association.name())
                        || associations.iter().any(|a| a.name() == association.name())
                        || contains.iter().any(|c| c.name == association.name())
                    {
                        return Err(conflict(association.name()).into());
                    }
                    associations.push(association);
                }
                Step::Datastream(spec) => {
                    match datastreams.iter_mut().find(|d| d.dsid == spec.dsid) {
                        Some(existing) => *existing = spec,
                        None => datastreams.push(spec),
                    }
                }
                Step::Contains(spec) => {
                    if registry.contains(&spec.name)
                        || associations.iter().any(|a| a.name() == spec.name)
                        || datastreams.iter().any(|d| d.dsid == spec.name)
                    {
                        return Err(conflict(&spec.name).into());
                    }
                    match contains.iter_mut().find(|c| c.name == spec.name) {
                        Some(existing) => *existing = spec,
                        None => contains.push(spec),
                    }
                }
            }
        }

        Ok(Arc::new(ModelType {
            name: self.name,
            parent: self.parent,
            registry: Arc::new(registry),
            associations,
            datastreams,
            contains,
        }))
    }
}

/// Resolves persisted model names to types.
#[derive(Debug)]
pub struct ModelCatalog {
    base: Arc<ModelType>,
    types: RwLock<HashMap<String, Arc<ModelType>>>,
}

impl ModelCatalog {
    /// A catalog whose fallback for unknown names is `base`.
    pub fn new(base: Arc<ModelType>) -> Self {
        let mut types = HashMap::new();
        types.insert(base.name.clone(), base.clone());
        Self {
            base,
            types: RwLock::new(types),
        }
    }

    pub fn base(&self) -> &Arc<ModelType> {
        &self.base
    }

    /// Add a type, replacing any earlier type of the same name.
    /// Register `model` and the types of its contained sub-resources.
    pub fn register(&self, model: &Arc<ModelType>) {
        self.types
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(model.name.clone(), model.clone());
        for spec in &model.contains {
            if let ContainedModel::Other(contained) = &spec.model {
                self.register(contained);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<ModelType>> {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// The type registered as `name`, or the base type.
    pub fn resolve(&self, name: Option<&str>) -> Arc<ModelType> {
        name.and_then(|n| self.get(n))
            .unwrap_or_else(|| self.base.clone())
    }
}
