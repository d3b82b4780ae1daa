//! Datastream lifecycle.
//!
//! A [`Datastream`] is one named, versioned content unit owned by a record.
//! It starts out new; the first successful save creates it in the repository
//! and every later save of changed content updates it.
//!
//! ```text
//!   New ──save──▶ Clean ──set_content / mark_dirty──▶ Dirty
//!                   ▲                                   │
//!                   └──────────────save─────────────────┘
//! ```
//!
//! A datastream is not reentrant. Callers must not save the same datastream
//! from two threads at once.

use std::collections::BTreeMap;

use bytes::Bytes;
use tracing::debug;

use fedmap_repo::{
    ControlGroup, DatastreamPayload, DatastreamProfile, RepositoryClient, RepositoryResult,
};
use fedmap_types::{ResourceUri, Scalar};

use crate::error::{ModelError, ModelResult};

/// MIME type of datastreams holding attribute field documents.
pub const FIELD_DOCUMENT_MIME_TYPE: &str = "application/json";

/// Field name to ordered values, as stored in a field datastream.
pub type FieldDocument = BTreeMap<String, Vec<Scalar>>;

#[derive(Clone, Debug, PartialEq)]
pub struct Datastream {
    object: ResourceUri,
    dsid: String,
    content: Option<Bytes>,
    mime_type: Option<String>,
    control_group: ControlGroup,
    dirty: bool,
    new: bool,
    profile: Option<DatastreamProfile>,
}

impl Datastream {
    /// A datastream that does not exist in the repository yet.
    pub fn new(object: ResourceUri, dsid: impl Into<String>) -> Self {
        Self {
            object,
            dsid: dsid.into(),
            content: None,
            mime_type: None,
            control_group: ControlGroup::default(),
            dirty: false,
            new: true,
            profile: None,
        }
    }

    /// A persisted datastream described by repository metadata. It is clean
    /// and not new.
    pub fn from_profile(object: ResourceUri, profile: DatastreamProfile, content: Option<Bytes>) -> Self {
        Self {
            object,
            dsid: profile.dsid.clone(),
            content,
            mime_type: Some(profile.mime_type.clone()),
            control_group: profile.control_group,
            dirty: false,
            new: false,
            profile: Some(profile),
        }
    }

    /// Fetch a persisted datastream. `Ok(None)` if the repository has none.
    pub fn load(
        repo: &dyn RepositoryClient,
        object: &ResourceUri,
        dsid: &str,
    ) -> RepositoryResult<Option<Self>> {
        let Some(content) = repo.fetch_content(object, dsid)? else {
            return Ok(None);
        };
        let profile = repo.fetch_profile(object, dsid)?;
        Ok(Some(Self::from_profile(object.clone(), profile, Some(content))))
    }

    pub fn dsid(&self) -> &str {
        &self.dsid
    }

    /// Address of the owning object.
    pub fn object(&self) -> &ResourceUri {
        &self.object
    }

    /// Move an unsaved datastream to another object.
    pub(crate) fn rehome(&mut self, object: ResourceUri) {
        self.object = object;
    }

    /// Address of the datastream itself.
    pub fn uri(&self) -> ResourceUri {
        self.object.child(&self.dsid)
    }

    /// The dsid as a URL path segment, with `.` escaped.
    pub fn to_param(&self) -> String {
        self.dsid.replace('.', "%2e")
    }

    pub fn content(&self) -> Option<&Bytes> {
        self.content.as_ref()
    }

    /// Replace the content. The datastream becomes dirty only if the bytes
    /// differ.
    pub fn set_content(&mut self, content: impl Into<Bytes>) {
        let content = content.into();
        if self.content.as_ref() != Some(&content) {
            self.content = Some(content);
            self.dirty = true;
        }
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn set_mime_type(&mut self, mime_type: impl Into<String>) {
        self.mime_type = Some(mime_type.into());
    }

    pub fn control_group(&self) -> ControlGroup {
        self.control_group
    }

    pub fn set_control_group(&mut self, control_group: ControlGroup) {
        self.control_group = control_group;
    }

    /// Force the next save to write even if the content is unchanged.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// `true` until the first successful create.
    pub fn is_new(&self) -> bool {
        self.new
    }

    /// Returns `true` if [`save`](Self::save) would contact the repository.
    pub fn has_unsaved_content(&self) -> bool {
        self.content.is_some() && (self.new || self.dirty)
    }

    /// Returns `true` if repository metadata is cached.
    pub fn has_cached_profile(&self) -> bool {
        self.profile.is_some()
    }

    /// Repository metadata, fetched on first use after each save. `None`
    /// while the datastream is new.
    pub fn profile(&mut self, repo: &dyn RepositoryClient) -> RepositoryResult<Option<&DatastreamProfile>> {
        if self.new {
            return Ok(None);
        }
        if self.profile.is_none() {
            self.profile = Some(repo.fetch_profile(&self.object, &self.dsid)?);
        }
        Ok(self.profile.as_ref())
    }

    /// Stored size in bytes, from the repository profile.
    pub fn size(&mut self, repo: &dyn RepositoryClient) -> RepositoryResult<Option<u64>> {
        Ok(self.profile(repo)?.map(|p| p.size))
    }

    /// Persist the content.
    ///
    /// Returns `Ok(false)` without contacting the repository when no content
    /// is set, or when a persisted datastream has no unsaved change. On
    /// failure the new/dirty state is left as it was.
    pub fn save(&mut self, repo: &dyn RepositoryClient, default_mime_type: &str) -> RepositoryResult<bool> {
        let Some(content) = self.content.as_ref() else {
            return Ok(false);
        };
        if !self.new && !self.dirty {
            return Ok(false);
        }
        let mime_type = self
            .mime_type
            .clone()
            .unwrap_or_else(|| default_mime_type.to_string());
        let payload = DatastreamPayload {
            content,
            mime_type: &mime_type,
            control_group: self.control_group,
        };
        if self.new {
            repo.create_datastream(&self.object, &self.dsid, payload)?;
            debug!(object = %self.object, dsid = %self.dsid, mime_type = %mime_type, "created datastream");
        } else {
            repo.update_datastream(&self.object, &self.dsid, payload)?;
            debug!(object = %self.object, dsid = %self.dsid, "updated datastream");
        }
        self.mime_type = Some(mime_type);
        self.new = false;
        self.dirty = false;
        self.profile = None;
        Ok(true)
    }

    // ---------------------------------------------------------------
    // Field documents
    // ---------------------------------------------------------------

    /// Decode the content as a field document. No content reads as empty.
    pub fn fields(&self) -> ModelResult<FieldDocument> {
        match &self.content {
            None => Ok(FieldDocument::new()),
            Some(bytes) if bytes.is_empty() => Ok(FieldDocument::new()),
            Some(bytes) => serde_json::from_slice(bytes).map_err(|e| {
                ModelError::Serialization(format!("datastream {}: {e}", self.dsid))
            }),
        }
    }

    /// Values of one field, empty if the field is absent.
    pub fn field(&self, name: &str) -> ModelResult<Vec<Scalar>> {
        Ok(self.fields()?.remove(name).unwrap_or_default())
    }

    /// Replace one field. An empty sequence removes the field.
    pub fn set_field(&mut self, name: &str, values: Vec<Scalar>) -> ModelResult<()> {
        let mut document = self.fields()?;
        if values.is_empty() {
            document.remove(name);
        } else {
            document.insert(name.to_string(), values);
        }
        let encoded = serde_json::to_vec(&document)
            .map_err(|e| ModelError::Serialization(format!("datastream {}: {e}", self.dsid)))?;
        self.set_content(encoded);
        if self.mime_type.is_none() {
            self.mime_type = Some(FIELD_DOCUMENT_MIME_TYPE.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fedmap_repo::{InMemoryRepository, RepositoryError};

    fn object() -> ResourceUri {
        ResourceUri::new("http://localhost:8080/rest/foo").unwrap()
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    #[test]
    fn new_datastream_state() {
        let ds = Datastream::new(object(), "descMetadata");
        assert!(ds.is_new());
        assert!(!ds.is_dirty());
        assert!(ds.content().is_none());
    }

    #[test]
    fn save_without_content_is_a_noop() {
        let repo = InMemoryRepository::new();
        let mut ds = Datastream::new(object(), "content");
        assert!(!ds.save(&repo, "text/xml").unwrap());
        assert!(ds.is_new());
        assert_eq!(repo.write_count(), 0);
    }

    #[test]
    fn first_save_creates_with_default_mime_type() {
        let repo = InMemoryRepository::new();
        let mut ds = Datastream::new(object(), "content");
        ds.set_content("<xml/>");
        assert!(ds.is_dirty());

        assert!(ds.save(&repo, "text/xml").unwrap());
        assert!(!ds.is_new());
        assert!(!ds.is_dirty());
        assert_eq!(ds.mime_type(), Some("text/xml"));
        let profile = repo.fetch_profile(&object(), "content").unwrap();
        assert_eq!(profile.mime_type, "text/xml");
        assert_eq!(profile.size, 6);
    }

    #[test]
    fn explicit_mime_type_is_kept() {
        let repo = InMemoryRepository::new();
        let mut ds = Datastream::new(object(), "content");
        ds.set_mime_type("image/png");
        ds.set_content(vec![0x89, 0x50]);
        ds.save(&repo, "text/xml").unwrap();
        assert_eq!(repo.fetch_profile(&object(), "content").unwrap().mime_type, "image/png");
    }

    #[test]
    fn second_save_without_change_does_not_write() {
        let repo = InMemoryRepository::new();
        let mut ds = Datastream::new(object(), "content");
        ds.set_content("Hello!!!");
        ds.save(&repo, "text/xml").unwrap();
        let writes = repo.write_count();
        let size = ds.size(&repo).unwrap();

        assert!(!ds.save(&repo, "text/xml").unwrap());
        assert_eq!(repo.write_count(), writes);
        assert_eq!(ds.size(&repo).unwrap(), size);
    }

    #[test]
    fn changed_content_updates() {
        let repo = InMemoryRepository::new();
        let mut ds = Datastream::new(object(), "content");
        ds.set_content("one");
        ds.save(&repo, "text/xml").unwrap();
        ds.set_content("three");
        assert!(ds.is_dirty());
        ds.save(&repo, "text/xml").unwrap();
        let profile = repo.fetch_profile(&object(), "content").unwrap();
        assert_eq!(profile.version_count, 2);
        assert_eq!(profile.size, 5);
    }

    #[test]
    fn same_content_does_not_dirty() {
        let repo = InMemoryRepository::new();
        let mut ds = Datastream::new(object(), "content");
        ds.set_content("same");
        ds.save(&repo, "text/xml").unwrap();
        ds.set_content("same");
        assert!(!ds.is_dirty());
        ds.mark_dirty();
        assert!(ds.is_dirty());
    }

    #[test]
    fn failed_save_leaves_state_unchanged() {
        let repo = InMemoryRepository::new();
        repo.set_read_only(true);
        let mut ds = Datastream::new(object(), "content");
        ds.set_content("data");
        let err = ds.save(&repo, "text/xml").unwrap_err();
        assert!(matches!(err, RepositoryError::ReadOnly));
        assert!(ds.is_new());
        assert!(ds.is_dirty());
        assert_eq!(ds.mime_type(), None);
    }

    // -----------------------------------------------------------------------
    // Profile
    // -----------------------------------------------------------------------

    #[test]
    fn size_comes_from_profile_and_is_refreshed_after_save() {
        let repo = InMemoryRepository::new();
        let mut ds = Datastream::new(object(), "content");
        assert_eq!(ds.size(&repo).unwrap(), None);

        ds.set_content("1234");
        ds.save(&repo, "text/xml").unwrap();
        assert!(!ds.has_cached_profile());
        assert_eq!(ds.size(&repo).unwrap(), Some(4));
        assert!(ds.has_cached_profile());

        ds.set_content("123456789");
        ds.save(&repo, "text/xml").unwrap();
        assert!(!ds.has_cached_profile());
        assert_eq!(ds.size(&repo).unwrap(), Some(9));
    }

    #[test]
    fn load_populates_from_repository() {
        let repo = InMemoryRepository::new();
        let mut ds = Datastream::new(object(), "content");
        ds.set_control_group(ControlGroup::InlineXml);
        ds.set_content("<a/>");
        ds.save(&repo, "text/xml").unwrap();

        let loaded = Datastream::load(&repo, &object(), "content").unwrap().unwrap();
        assert!(!loaded.is_new());
        assert!(!loaded.is_dirty());
        assert_eq!(loaded.control_group(), ControlGroup::InlineXml);
        assert_eq!(loaded.content(), Some(&Bytes::from_static(b"<a/>")));
        assert!(Datastream::load(&repo, &object(), "missing").unwrap().is_none());
    }

    #[test]
    fn to_param_escapes_dots() {
        let ds = Datastream::new(object(), "foo.bar.xml");
        assert_eq!(ds.to_param(), "foo%2ebar%2exml");
        assert_eq!(ds.uri().as_str(), "http://localhost:8080/rest/foo/foo.bar.xml");
    }

    // -----------------------------------------------------------------------
    // Field documents
    // -----------------------------------------------------------------------

    #[test]
    fn field_document_roundtrip() {
        let mut ds = Datastream::new(object(), "descMetadata");
        ds.set_field("abstract", vec![Scalar::from("a"), Scalar::from("b")]).unwrap();
        ds.set_field("pages", vec![Scalar::from(12i64)]).unwrap();
        assert_eq!(ds.field("abstract").unwrap(), vec![Scalar::from("a"), Scalar::from("b")]);
        assert_eq!(ds.field("pages").unwrap(), vec![Scalar::from(12i64)]);
        assert!(ds.field("missing").unwrap().is_empty());
        assert_eq!(ds.mime_type(), Some(FIELD_DOCUMENT_MIME_TYPE));
        assert!(ds.is_dirty());
    }

    #[test]
    fn empty_field_is_removed() {
        let mut ds = Datastream::new(object(), "descMetadata");
        ds.set_field("abstract", vec![Scalar::from("a")]).unwrap();
        ds.set_field("abstract", Vec::new()).unwrap();
        assert!(ds.fields().unwrap().is_empty());
    }

    #[test]
    fn non_json_content_is_a_serialization_error() {
        let mut ds = Datastream::new(object(), "descMetadata");
        ds.set_content("<not-json/>");
        assert!(matches!(ds.fields(), Err(ModelError::Serialization(_))));
    }
}
