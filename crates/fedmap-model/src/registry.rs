//! Per-type attribute tables.
//!
//! Every model type owns one [`AttributeRegistry`] mapping attribute names to
//! where their values live and how many values they hold. A subtype's
//! registry reads through to its parent until the subtype registers its
//! first attribute of its own; at that point it copies the parent's current
//! table and never looks at the parent again.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use fedmap_types::Cardinality;

use crate::error::{ModelError, ModelResult, RegistryError};

/// Where an attribute's values are stored.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Storage {
    /// Objects of `predicate` on the record's subject.
    GraphProperty { predicate: String },
    /// A named field inside the datastream `dsid`.
    DatastreamField { dsid: String },
}

/// One registered attribute.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    pub name: String,
    pub storage: Storage,
    pub cardinality: Cardinality,
}

impl AttributeDescriptor {
    /// The datastream holding this attribute, if it is datastream-backed.
    pub fn dsid(&self) -> Option<&str> {
        match &self.storage {
            Storage::DatastreamField { dsid } => Some(dsid),
            Storage::GraphProperty { .. } => None,
        }
    }
}

#[derive(Debug)]
pub struct AttributeRegistry {
    owner: String,
    parent: Option<Arc<AttributeRegistry>>,
    /// `None` until the first local registration forks the table.
    local: RwLock<Option<Vec<AttributeDescriptor>>>,
}

impl AttributeRegistry {
    /// An empty root registry for the type `owner`.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            parent: None,
            local: RwLock::new(None),
        }
    }

    /// A registry for the subtype `owner` that shares `parent`'s table until
    /// its first local registration.
    pub fn inherit(parent: Arc<AttributeRegistry>, owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            parent: Some(parent),
            local: RwLock::new(None),
        }
    }

    /// Name of the owning type.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns `true` once this registry holds its own copy of the table.
    pub fn is_forked(&self) -> bool {
        self.local
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn with_table<R>(&self, f: impl FnOnce(&[AttributeDescriptor]) -> R) -> R {
        let local = self.local.read().unwrap_or_else(PoisonError::into_inner);
        match (local.as_deref(), &self.parent) {
            (Some(table), _) => f(table),
            (None, Some(parent)) => parent.with_table(f),
            (None, None) => f(&[]),
        }
    }

    /// Register `name`, or return the descriptor already registered under
    /// it. The first registration of a name wins.
    pub fn register(
        &self,
        name: impl Into<String>,
        storage: Storage,
        cardinality: Cardinality,
    ) -> AttributeDescriptor {
        let name = name.into();
        if let Some(existing) = self.get(&name) {
            return existing;
        }
        let mut local = self.local.write().unwrap_or_else(PoisonError::into_inner);
        let table = local.get_or_insert_with(|| {
            debug!(owner = %self.owner, "forking attribute table");
            self.parent
                .as_ref()
                .map(|parent| parent.descriptors())
                .unwrap_or_default()
        });
        if let Some(existing) = table.iter().find(|d| d.name == name) {
            return existing.clone();
        }
        let descriptor = AttributeDescriptor {
            name,
            storage,
            cardinality,
        };
        debug!(owner = %self.owner, attribute = %descriptor.name, "registered attribute");
        table.push(descriptor.clone());
        descriptor
    }

    /// Register several fields stored in the datastream `dsid`.
    pub fn register_datastream_attributes<I, S>(
        &self,
        fields: I,
        dsid: &str,
        cardinality: Cardinality,
    ) -> ModelResult<Vec<AttributeDescriptor>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if dsid.trim().is_empty() {
            return Err(RegistryError::MissingDatastream {
                model: self.owner.clone(),
                fields,
            }
            .into());
        }
        Ok(fields
            .into_iter()
            .map(|field| {
                self.register(
                    field,
                    Storage::DatastreamField {
                        dsid: dsid.to_string(),
                    },
                    cardinality,
                )
            })
            .collect())
    }

    pub fn get(&self, name: &str) -> Option<AttributeDescriptor> {
        self.with_table(|table| table.iter().find(|d| d.name == name).cloned())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.with_table(|table| table.iter().any(|d| d.name == name))
    }

    /// Declared cardinality of `name`.
    pub fn cardinality(&self, name: &str) -> ModelResult<Cardinality> {
        self.get(name)
            .map(|d| d.cardinality)
            .ok_or_else(|| ModelError::UnknownAttribute {
                model: self.owner.clone(),
                name: name.to_string(),
            })
    }

    pub fn is_multiple(&self, name: &str) -> ModelResult<bool> {
        Ok(self.cardinality(name)?.is_multiple())
    }

    pub fn is_unique(&self, name: &str) -> ModelResult<bool> {
        Ok(!self.is_multiple(name)?)
    }

    /// All descriptors in registration order.
    pub fn descriptors(&self) -> Vec<AttributeDescriptor> {
        self.with_table(<[AttributeDescriptor]>::to_vec)
    }

    /// Attribute names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.with_table(|table| table.iter().map(|d| d.name.clone()).collect())
    }

    /// Distinct datastream ids referenced by datastream-backed attributes.
    pub fn datastream_ids(&self) -> Vec<String> {
        self.with_table(|table| {
            let mut ids: Vec<String> = Vec::new();
            for dsid in table.iter().filter_map(AttributeDescriptor::dsid) {
                if !ids.iter().any(|known| known == dsid) {
                    ids.push(dsid.to_string());
                }
            }
            ids
        })
    }
}
