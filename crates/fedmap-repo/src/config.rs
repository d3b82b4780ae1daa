use std::path::Path;

use serde::{Deserialize, Serialize};

use fedmap_types::ResourceUri;

use crate::error::{RepositoryError, RepositoryResult};

/// Which predicate a repository uses to report fixity results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixityVocabulary {
    /// `premis:hasEventOutcome` (repository 4.4.0 and later).
    #[default]
    Premis,
    /// `fcrepo:status` (before 4.4.0).
    Legacy,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Address of the base container every record id is relative to.
    pub base_uri: String,
    /// MIME type given to datastreams created without one.
    pub default_mime_type: String,
    pub fixity_vocabulary: FixityVocabulary,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            base_uri: "http://localhost:8080/rest".into(),
            default_mime_type: "text/xml".into(),
            fixity_vocabulary: FixityVocabulary::Premis,
        }
    }
}

impl RepositoryConfig {
    /// Parse from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> RepositoryResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| RepositoryError::Config(e.to_string()))?;
        config.base()?;
        Ok(config)
    }

    /// Read a TOML file.
    pub fn load(path: impl AsRef<Path>) -> RepositoryResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// The base container address.
    pub fn base(&self) -> RepositoryResult<ResourceUri> {
        ResourceUri::new(self.base_uri.clone()).map_err(|e| RepositoryError::Config(e.to_string()))
    }
}
