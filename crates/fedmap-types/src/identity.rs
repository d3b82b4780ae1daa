use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Repository-relative identifier of a resource (e.g. `foo/bar/chu`).
///
/// An id is a `/`-separated path of non-empty segments. It never starts or
/// ends with `/`; the repository base is not part of it.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceId(String);

impl ResourceId {
    /// Parse and validate an id.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        let invalid = |reason: &str| TypeError::InvalidId {
            id: id.clone(),
            reason: reason.to_string(),
        };
        if id.is_empty() {
            return Err(invalid("id must not be empty"));
        }
        if id.starts_with('/') || id.ends_with('/') {
            return Err(invalid("id must not start or end with '/'"));
        }
        if id.split('/').any(str::is_empty) {
            return Err(invalid("id must not contain empty segments"));
        }
        if id.chars().any(char::is_whitespace) {
            return Err(invalid("id must not contain whitespace"));
        }
        Ok(Self(id))
    }

    /// Mint a fresh, time-ordered id for a record created without one.
    pub fn mint() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last path segment.
    pub fn leaf(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Debug for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceId({})", self.0)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ResourceId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ResourceId {
    type Error = TypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ResourceId> for String {
    fn from(id: ResourceId) -> Self {
        id.0
    }
}

/// Absolute address of a resource in the repository.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceUri(String);

impl ResourceUri {
    /// Parse an absolute address. Trailing slashes are dropped.
    pub fn new(uri: impl Into<String>) -> Result<Self, TypeError> {
        let uri = uri.into();
        let trimmed = uri.trim_end_matches('/');
        let Some((scheme, rest)) = trimmed.split_once("://") else {
            return Err(TypeError::InvalidUri {
                uri: uri.clone(),
                reason: "missing scheme".into(),
            });
        };
        if scheme.is_empty() || rest.is_empty() {
            return Err(TypeError::InvalidUri {
                uri: uri.clone(),
                reason: "missing scheme or authority".into(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Address of a contained child resource (`self/segment`).
    pub fn child(&self, segment: &str) -> Self {
        Self(format!("{}/{}", self.0, segment.trim_matches('/')))
    }

    /// Address of the containing resource, if this address has a path.
    pub fn parent(&self) -> Option<Self> {
        let authority_end = self.0.find("://").map(|i| i + 3)?;
        let (_, path) = self.0.split_at(authority_end);
        let cut = path.rfind('/')?;
        Some(Self(self.0[..authority_end + cut].to_string()))
    }

    /// Returns `true` if `other` lies strictly beneath this address.
    pub fn is_ancestor_of(&self, other: &ResourceUri) -> bool {
        other
            .0
            .strip_prefix(&self.0)
            .is_some_and(|rest| rest.starts_with('/') && rest.len() > 1)
    }
}

impl fmt::Debug for ResourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceUri({})", self.0)
    }
}

impl fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ResourceUri {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ResourceUri> for String {
    fn from(uri: ResourceUri) -> Self {
        uri.0
    }
}

/// Converts between [`ResourceId`]s and [`ResourceUri`]s under a base URI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdTranslator {
    base: ResourceUri,
}

impl IdTranslator {
    /// Create a translator rooted at `base`.
    pub fn new(base: ResourceUri) -> Self {
        Self { base }
    }

    /// The base container address.
    pub fn base(&self) -> &ResourceUri {
        &self.base
    }

    /// `base/id`.
    pub fn id_to_uri(&self, id: &ResourceId) -> ResourceUri {
        self.base.child(id.as_str())
    }

    /// Strip the base from `uri`. Returns `None` for the base itself or for
    /// addresses outside the base.
    pub fn uri_to_id(&self, uri: &ResourceUri) -> Option<ResourceId> {
        let rest = uri.as_str().strip_prefix(self.base.as_str())?;
        let rest = rest.strip_prefix('/')?;
        ResourceId::new(rest).ok()
    }
}
