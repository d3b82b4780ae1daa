use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of resource lives at an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// A graph-backed resource that may contain children.
    RdfSource,
    /// Opaque binary content (datastreams). Never part of the record
    /// containment model.
    NonRdfSource,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RdfSource => write!(f, "rdf source"),
            Self::NonRdfSource => write!(f, "binary"),
        }
    }
}

/// Storage mode of a datastream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlGroup {
    /// Content held by the repository.
    #[default]
    Managed,
    /// XML held inline with the object.
    InlineXml,
    /// Content referenced by URL, fetched by the repository.
    External,
    /// Content referenced by URL, redirected to by the repository.
    Redirect,
}

impl ControlGroup {
    /// One-letter code (`M`, `X`, `E`, `R`).
    pub fn code(&self) -> char {
        match self {
            Self::Managed => 'M',
            Self::InlineXml => 'X',
            Self::External => 'E',
            Self::Redirect => 'R',
        }
    }

    /// Parse from the one-letter code.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'M' => Some(Self::Managed),
            'X' => Some(Self::InlineXml),
            'E' => Some(Self::External),
            'R' => Some(Self::Redirect),
            _ => None,
        }
    }
}

impl std::fmt::Display for ControlGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Content and metadata sent on datastream create/update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DatastreamPayload<'a> {
    pub content: &'a [u8],
    pub mime_type: &'a str,
    pub control_group: ControlGroup,
}

/// Repository-side metadata about a stored datastream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatastreamProfile {
    pub dsid: String,
    pub mime_type: String,
    /// Size of the stored content in bytes.
    pub size: u64,
    pub control_group: ControlGroup,
    /// Number of stored versions; 1 after create.
    pub version_count: u32,
    /// Hex digest recorded when the content was written.
    pub digest: String,
    pub created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_group_codes_roundtrip() {
        for group in [
            ControlGroup::Managed,
            ControlGroup::InlineXml,
            ControlGroup::External,
            ControlGroup::Redirect,
        ] {
            assert_eq!(ControlGroup::from_code(group.code()), Some(group));
        }
        assert_eq!(ControlGroup::from_code('Z'), None);
    }

    #[test]
    fn default_control_group_is_managed() {
        assert_eq!(ControlGroup::default(), ControlGroup::Managed);
        assert_eq!(ControlGroup::default().to_string(), "M");
    }
}
