//! In-memory repository for tests and embedding.
//!
//! [`InMemoryRepository`] keeps a containment tree rooted at the configured
//! base container. Graph resources and binaries share one address space;
//! saving a resource creates any missing intermediate containers, the way a
//! repository creates pairtree nodes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::debug;

use fedmap_rdf::vocab::{fcrepo, premis, xsd};
use fedmap_rdf::{ntriples, Graph, Term, Triple};
use fedmap_types::ResourceUri;

use crate::config::{FixityVocabulary, RepositoryConfig};
use crate::error::{RepositoryError, RepositoryResult};
use crate::profile::{ControlGroup, DatastreamPayload, DatastreamProfile, ResourceKind};
use crate::traits::RepositoryClient;

const FIXITY_SUCCESS: &str = "SUCCESS";
const FIXITY_BAD_CHECKSUM: &str = "BAD_CHECKSUM";

#[derive(Clone, Debug)]
enum Node {
    Container {
        graph: Graph,
    },
    Binary {
        content: Bytes,
        mime_type: String,
        control_group: ControlGroup,
        digest: String,
        version_count: u32,
        created: DateTime<Utc>,
        last_modified: DateTime<Utc>,
    },
}

impl Node {
    fn kind(&self) -> ResourceKind {
        match self {
            Self::Container { .. } => ResourceKind::RdfSource,
            Self::Binary { .. } => ResourceKind::NonRdfSource,
        }
    }
}

#[derive(Debug, Default)]
struct Tree {
    nodes: HashMap<ResourceUri, Node>,
    /// Direct children in creation order.
    children: HashMap<ResourceUri, Vec<ResourceUri>>,
}

/// In-memory, HashMap-based repository.
///
/// All state sits behind one `RwLock`. Writes can be refused wholesale with
/// [`set_read_only`](Self::set_read_only) to exercise failure paths.
pub struct InMemoryRepository {
    config: RepositoryConfig,
    base: ResourceUri,
    tree: RwLock<Tree>,
    read_only: AtomicBool,
    writes: AtomicU64,
}

impl InMemoryRepository {
    /// Create an empty repository with the default configuration.
    pub fn new() -> Self {
        let config = RepositoryConfig::default();
        let base = config
            .base()
            .unwrap_or_else(|_| unreachable!("default base uri is valid"));
        Self::build(config, base)
    }

    /// Create an empty repository from a configuration.
    pub fn with_config(config: RepositoryConfig) -> RepositoryResult<Self> {
        let base = config.base()?;
        Ok(Self::build(config, base))
    }

    fn build(config: RepositoryConfig, base: ResourceUri) -> Self {
        let mut tree = Tree::default();
        tree.nodes.insert(
            base.clone(),
            Node::Container {
                graph: Graph::new(),
            },
        );
        Self {
            config,
            base,
            tree: RwLock::new(tree),
            read_only: AtomicBool::new(false),
            writes: AtomicU64::new(0),
        }
    }

    /// The configuration this repository was built from.
    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// The base container address.
    pub fn base(&self) -> &ResourceUri {
        &self.base
    }

    /// Refuse (or accept again) every write with [`RepositoryError::ReadOnly`].
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Number of successful writes (datastream create/update, resource save).
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of resources, including the base container.
    pub fn len(&self) -> usize {
        self.read_tree().map(|t| t.nodes.len()).unwrap_or(0)
    }

    /// Returns `true` if only the base container exists.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Flip the stored bytes of a binary without touching its recorded
    /// digest, so the next fixity check fails.
    pub fn corrupt(&self, uri: &ResourceUri) -> RepositoryResult<()> {
        let mut tree = self.write_tree()?;
        match tree.nodes.get_mut(uri) {
            Some(Node::Binary { content, .. }) => {
                let mut bytes = content.to_vec();
                match bytes.first_mut() {
                    Some(b) => *b ^= 0xff,
                    None => bytes.push(0),
                }
                *content = Bytes::from(bytes);
                Ok(())
            }
            Some(Node::Container { .. }) => Err(RepositoryError::KindMismatch {
                uri: uri.clone(),
                expected: ResourceKind::NonRdfSource.to_string(),
            }),
            None => Err(RepositoryError::NotFound(uri.clone())),
        }
    }

    fn read_tree(&self) -> RepositoryResult<RwLockReadGuard<'_, Tree>> {
        self.tree
            .read()
            .map_err(|e| RepositoryError::Transport(format!("lock poisoned: {e}")))
    }

    fn write_tree(&self) -> RepositoryResult<RwLockWriteGuard<'_, Tree>> {
        self.tree
            .write()
            .map_err(|e| RepositoryError::Transport(format!("lock poisoned: {e}")))
    }

    fn check_writable(&self) -> RepositoryResult<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(RepositoryError::ReadOnly);
        }
        Ok(())
    }

    fn check_address(&self, uri: &ResourceUri) -> RepositoryResult<()> {
        if uri == &self.base || self.base.is_ancestor_of(uri) {
            Ok(())
        } else {
            Err(RepositoryError::InvalidAddress(uri.to_string()))
        }
    }

    /// Create missing containers between the base and `uri`'s parent, and
    /// link `uri` under its parent.
    fn link(&self, tree: &mut Tree, uri: &ResourceUri) -> RepositoryResult<()> {
        let mut chain = Vec::new();
        let mut cursor = uri.clone();
        while cursor != self.base {
            let parent = cursor
                .parent()
                .ok_or_else(|| RepositoryError::InvalidAddress(uri.to_string()))?;
            chain.push((parent.clone(), cursor));
            cursor = parent;
        }
        for (parent, child) in chain.into_iter().rev() {
            match tree.nodes.get(&parent) {
                Some(Node::Binary { .. }) => {
                    return Err(RepositoryError::KindMismatch {
                        uri: parent,
                        expected: ResourceKind::RdfSource.to_string(),
                    });
                }
                Some(Node::Container { .. }) => {}
                None => {
                    tree.nodes.insert(
                        parent.clone(),
                        Node::Container {
                            graph: Graph::new(),
                        },
                    );
                }
            }
            let siblings = tree.children.entry(parent).or_default();
            if !siblings.contains(&child) {
                siblings.push(child.clone());
            }
            if child != *uri && !tree.nodes.contains_key(&child) {
                tree.nodes.insert(
                    child,
                    Node::Container {
                        graph: Graph::new(),
                    },
                );
            }
        }
        Ok(())
    }

    fn fixity_report(&self, uri: &ResourceUri, outcome: &str, digest: &str, size: usize) -> String {
        let subject = Term::iri(format!("{uri}#fixity"));
        let predicate = match self.config.fixity_vocabulary {
            FixityVocabulary::Premis => premis::HAS_EVENT_OUTCOME,
            FixityVocabulary::Legacy => fcrepo::STATUS,
        };
        let triples = vec![
            Triple::new(Term::iri(uri.to_string()), premis::HAS_MESSAGE_DIGEST, Term::iri(format!("urn:blake3:{digest}"))),
            Triple::new(subject.clone(), premis::HAS_SIZE, Term::typed(size.to_string(), xsd::INTEGER)),
            Triple::new(subject, predicate, Term::typed(outcome, xsd::STRING)),
        ];
        ntriples::serialize(&triples)
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn digest(content: &[u8]) -> String {
    hex::encode(blake3::hash(content).as_bytes())
}

impl RepositoryClient for InMemoryRepository {
    fn create_datastream(
        &self,
        object: &ResourceUri,
        dsid: &str,
        payload: DatastreamPayload<'_>,
    ) -> RepositoryResult<()> {
        self.check_writable()?;
        let uri = object.child(dsid);
        self.check_address(&uri)?;
        let mut tree = self.write_tree()?;
        if tree.nodes.contains_key(&uri) {
            return Err(RepositoryError::AlreadyExists(uri));
        }
        self.link(&mut tree, &uri)?;
        let now = Utc::now();
        tree.nodes.insert(
            uri.clone(),
            Node::Binary {
                content: Bytes::copy_from_slice(payload.content),
                mime_type: payload.mime_type.to_string(),
                control_group: payload.control_group,
                digest: digest(payload.content),
                version_count: 1,
                created: now,
                last_modified: now,
            },
        );
        self.writes.fetch_add(1, Ordering::SeqCst);
        debug!(uri = %uri, size = payload.content.len(), "created datastream");
        Ok(())
    }

    fn update_datastream(
        &self,
        object: &ResourceUri,
        dsid: &str,
        payload: DatastreamPayload<'_>,
    ) -> RepositoryResult<()> {
        self.check_writable()?;
        let uri = object.child(dsid);
        let mut tree = self.write_tree()?;
        match tree.nodes.get_mut(&uri) {
            Some(Node::Binary {
                content,
                mime_type,
                control_group,
                digest: recorded,
                version_count,
                last_modified,
                ..
            }) => {
                *content = Bytes::copy_from_slice(payload.content);
                *mime_type = payload.mime_type.to_string();
                *control_group = payload.control_group;
                *recorded = digest(payload.content);
                *version_count += 1;
                *last_modified = Utc::now();
            }
            Some(Node::Container { .. }) => {
                return Err(RepositoryError::KindMismatch {
                    uri,
                    expected: ResourceKind::NonRdfSource.to_string(),
                });
            }
            None => return Err(RepositoryError::NotFound(uri)),
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        debug!(uri = %uri, size = payload.content.len(), "updated datastream");
        Ok(())
    }

    fn fetch_profile(&self, object: &ResourceUri, dsid: &str) -> RepositoryResult<DatastreamProfile> {
        let uri = object.child(dsid);
        let tree = self.read_tree()?;
        match tree.nodes.get(&uri) {
            Some(Node::Binary {
                content,
                mime_type,
                control_group,
                digest,
                version_count,
                created,
                last_modified,
            }) => Ok(DatastreamProfile {
                dsid: dsid.to_string(),
                mime_type: mime_type.clone(),
                size: content.len() as u64,
                control_group: *control_group,
                version_count: *version_count,
                digest: digest.clone(),
                created: *created,
                last_modified: *last_modified,
            }),
            Some(Node::Container { .. }) => Err(RepositoryError::KindMismatch {
                uri,
                expected: ResourceKind::NonRdfSource.to_string(),
            }),
            None => Err(RepositoryError::NotFound(uri)),
        }
    }

    fn fetch_content(&self, object: &ResourceUri, dsid: &str) -> RepositoryResult<Option<Bytes>> {
        let uri = object.child(dsid);
        let tree = self.read_tree()?;
        match tree.nodes.get(&uri) {
            Some(Node::Binary { content, .. }) => Ok(Some(content.clone())),
            Some(Node::Container { .. }) => Err(RepositoryError::KindMismatch {
                uri,
                expected: ResourceKind::NonRdfSource.to_string(),
            }),
            None => Ok(None),
        }
    }

    fn save_resource(&self, uri: &ResourceUri, graph: &Graph) -> RepositoryResult<()> {
        self.check_writable()?;
        self.check_address(uri)?;
        let mut tree = self.write_tree()?;
        if let Some(Node::Binary { .. }) = tree.nodes.get(uri) {
            return Err(RepositoryError::KindMismatch {
                uri: uri.clone(),
                expected: ResourceKind::RdfSource.to_string(),
            });
        }
        self.link(&mut tree, uri)?;
        tree.nodes.insert(
            uri.clone(),
            Node::Container {
                graph: graph.clone(),
            },
        );
        self.writes.fetch_add(1, Ordering::SeqCst);
        debug!(uri = %uri, triples = graph.len(), "saved resource");
        Ok(())
    }

    fn fetch_resource(&self, uri: &ResourceUri) -> RepositoryResult<Option<Graph>> {
        let tree = self.read_tree()?;
        match tree.nodes.get(uri) {
            Some(Node::Container { graph }) => Ok(Some(graph.clone())),
            Some(Node::Binary { .. }) => Err(RepositoryError::KindMismatch {
                uri: uri.clone(),
                expected: ResourceKind::RdfSource.to_string(),
            }),
            None => Ok(None),
        }
    }

    fn head(&self, uri: &ResourceUri) -> RepositoryResult<Option<ResourceKind>> {
        let tree = self.read_tree()?;
        Ok(tree.nodes.get(uri).map(Node::kind))
    }

    fn list_children(&self, uri: &ResourceUri) -> RepositoryResult<Vec<ResourceUri>> {
        let tree = self.read_tree()?;
        if !tree.nodes.contains_key(uri) {
            return Err(RepositoryError::NotFound(uri.clone()));
        }
        Ok(tree.children.get(uri).cloned().unwrap_or_default())
    }

    fn delete(&self, uri: &ResourceUri) -> RepositoryResult<()> {
        self.check_writable()?;
        self.check_address(uri)?;
        if uri == &self.base {
            return Err(RepositoryError::InvalidAddress(uri.to_string()));
        }
        let mut tree = self.write_tree()?;
        if !tree.nodes.contains_key(uri) {
            return Err(RepositoryError::NotFound(uri.clone()));
        }
        if let Some(siblings) = uri.parent().and_then(|p| tree.children.get_mut(&p)) {
            siblings.retain(|child| child != uri);
        }
        let mut pending = vec![uri.clone()];
        let mut removed = 0usize;
        while let Some(next) = pending.pop() {
            if let Some(children) = tree.children.remove(&next) {
                pending.extend(children);
            }
            if tree.nodes.remove(&next).is_some() {
                removed += 1;
            }
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        debug!(uri = %uri, removed, "deleted resource");
        Ok(())
    }

    fn fixity_check(&self, uri: &ResourceUri) -> RepositoryResult<String> {
        let tree = self.read_tree()?;
        match tree.nodes.get(uri) {
            Some(Node::Binary {
                content,
                digest: recorded,
                ..
            }) => {
                let computed = digest(content);
                let outcome = if &computed == recorded {
                    FIXITY_SUCCESS
                } else {
                    FIXITY_BAD_CHECKSUM
                };
                debug!(uri = %uri, outcome, "fixity computed");
                Ok(self.fixity_report(uri, outcome, &computed, content.len()))
            }
            Some(Node::Container { .. }) => Err(RepositoryError::KindMismatch {
                uri: uri.clone(),
                expected: ResourceKind::NonRdfSource.to_string(),
            }),
            None => Err(RepositoryError::NotFound(uri.clone())),
        }
    }
}

impl std::fmt::Debug for InMemoryRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRepository")
            .field("base", &self.base)
            .field("resource_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fedmap_rdf::vocab::dc;
    use fedmap_rdf::GraphStore;

    fn uri(path: &str) -> ResourceUri {
        ResourceUri::new(format!("http://localhost:8080/rest/{path}")).unwrap()
    }

    fn payload(content: &[u8]) -> DatastreamPayload<'_> {
        DatastreamPayload {
            content,
            mime_type: "text/plain",
            control_group: ControlGroup::Managed,
        }
    }

    fn titled(title: &str, subject: &ResourceUri) -> Graph {
        let mut g = Graph::new();
        g.write(subject.as_str(), dc::TITLE, vec![Term::literal(title)]);
        g
    }

    // -----------------------------------------------------------------------
    // Graph resources
    // -----------------------------------------------------------------------

    #[test]
    fn save_and_fetch_resource() {
        let repo = InMemoryRepository::new();
        let foo = uri("foo");
        repo.save_resource(&foo, &titled("Foo", &foo)).unwrap();
        let graph = repo.fetch_resource(&foo).unwrap().expect("should exist");
        assert_eq!(graph.read(foo.as_str(), dc::TITLE), vec![Term::literal("Foo")]);
        assert_eq!(repo.head(&foo).unwrap(), Some(ResourceKind::RdfSource));
    }

    #[test]
    fn fetch_missing_resource_returns_none() {
        let repo = InMemoryRepository::new();
        assert!(repo.fetch_resource(&uri("missing")).unwrap().is_none());
        assert!(!repo.exists(&uri("missing")).unwrap());
    }

    #[test]
    fn resources_outside_base_are_rejected() {
        let repo = InMemoryRepository::new();
        let foreign = ResourceUri::new("http://elsewhere/foo").unwrap();
        let err = repo.save_resource(&foreign, &Graph::new()).unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidAddress(_)));
    }

    // -----------------------------------------------------------------------
    // Containment
    // -----------------------------------------------------------------------

    #[test]
    fn children_are_listed_in_creation_order() {
        let repo = InMemoryRepository::new();
        repo.save_resource(&uri("b"), &Graph::new()).unwrap();
        repo.save_resource(&uri("a"), &Graph::new()).unwrap();
        let children = repo.list_children(repo.base()).unwrap();
        assert_eq!(children, vec![uri("b"), uri("a")]);
    }

    #[test]
    fn intermediate_containers_are_created() {
        let repo = InMemoryRepository::new();
        repo.save_resource(&uri("foo/bar/chu"), &Graph::new()).unwrap();
        assert_eq!(repo.head(&uri("foo")).unwrap(), Some(ResourceKind::RdfSource));
        assert_eq!(repo.list_children(&uri("foo")).unwrap(), vec![uri("foo/bar")]);
        assert_eq!(repo.list_children(&uri("foo/bar")).unwrap(), vec![uri("foo/bar/chu")]);
    }

    #[test]
    fn resaving_does_not_duplicate_children() {
        let repo = InMemoryRepository::new();
        repo.save_resource(&uri("foo"), &Graph::new()).unwrap();
        repo.save_resource(&uri("foo"), &Graph::new()).unwrap();
        assert_eq!(repo.list_children(repo.base()).unwrap().len(), 1);
    }

    #[test]
    fn datastreams_are_binary_children() {
        let repo = InMemoryRepository::new();
        let foo = uri("foo");
        repo.save_resource(&foo, &Graph::new()).unwrap();
        repo.create_datastream(&foo, "content", payload(b"Hello!!!")).unwrap();
        assert_eq!(repo.list_children(&foo).unwrap(), vec![uri("foo/content")]);
        assert_eq!(
            repo.head(&uri("foo/content")).unwrap(),
            Some(ResourceKind::NonRdfSource)
        );
    }

    #[test]
    fn listing_missing_resource_fails() {
        let repo = InMemoryRepository::new();
        let err = repo.list_children(&uri("nope")).unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    // -----------------------------------------------------------------------
    // Deletion
    // -----------------------------------------------------------------------

    #[test]
    fn delete_removes_subtree_and_unlinks() {
        let repo = InMemoryRepository::new();
        repo.save_resource(&uri("foo/bar/chu"), &Graph::new()).unwrap();
        repo.create_datastream(&uri("foo/bar"), "content", payload(b"x")).unwrap();
        repo.save_resource(&uri("other"), &Graph::new()).unwrap();

        repo.delete(&uri("foo/bar")).unwrap();
        assert!(repo.list_children(&uri("foo")).unwrap().is_empty());
        for gone in ["foo/bar", "foo/bar/chu", "foo/bar/content"] {
            assert!(!repo.exists(&uri(gone)).unwrap(), "{gone} should be gone");
        }
        assert!(repo.exists(&uri("foo")).unwrap());
        assert!(repo.exists(&uri("other")).unwrap());
    }

    #[test]
    fn delete_missing_or_base_fails() {
        let repo = InMemoryRepository::new();
        let err = repo.delete(&uri("nope")).unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
        let base = repo.base().clone();
        assert!(matches!(
            repo.delete(&base),
            Err(RepositoryError::InvalidAddress(_))
        ));
    }

    #[test]
    fn delete_respects_read_only() {
        let repo = InMemoryRepository::new();
        repo.save_resource(&uri("foo"), &Graph::new()).unwrap();
        repo.set_read_only(true);
        assert!(matches!(repo.delete(&uri("foo")), Err(RepositoryError::ReadOnly)));
        assert!(repo.exists(&uri("foo")).unwrap());
    }

    // -----------------------------------------------------------------------
    // Datastreams
    // -----------------------------------------------------------------------

    #[test]
    fn create_then_profile() {
        let repo = InMemoryRepository::new();
        let foo = uri("foo");
        repo.create_datastream(&foo, "descMetadata", payload(b"12345")).unwrap();
        let profile = repo.fetch_profile(&foo, "descMetadata").unwrap();
        assert_eq!(profile.size, 5);
        assert_eq!(profile.mime_type, "text/plain");
        assert_eq!(profile.version_count, 1);
        assert_eq!(profile.digest, digest(b"12345"));
    }

    #[test]
    fn create_twice_fails() {
        let repo = InMemoryRepository::new();
        let foo = uri("foo");
        repo.create_datastream(&foo, "ds", payload(b"a")).unwrap();
        let err = repo.create_datastream(&foo, "ds", payload(b"b")).unwrap_err();
        assert!(matches!(err, RepositoryError::AlreadyExists(_)));
    }

    #[test]
    fn update_adds_version() {
        let repo = InMemoryRepository::new();
        let foo = uri("foo");
        repo.create_datastream(&foo, "ds", payload(b"a")).unwrap();
        repo.update_datastream(&foo, "ds", payload(b"bbb")).unwrap();
        let profile = repo.fetch_profile(&foo, "ds").unwrap();
        assert_eq!(profile.size, 3);
        assert_eq!(profile.version_count, 2);
        assert_eq!(
            repo.fetch_content(&foo, "ds").unwrap(),
            Some(Bytes::from_static(b"bbb"))
        );
    }

    #[test]
    fn update_missing_fails() {
        let repo = InMemoryRepository::new();
        let err = repo.update_datastream(&uri("foo"), "ds", payload(b"a")).unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[test]
    fn read_only_refuses_writes() {
        let repo = InMemoryRepository::new();
        repo.set_read_only(true);
        let err = repo.create_datastream(&uri("foo"), "ds", payload(b"a")).unwrap_err();
        assert!(matches!(err, RepositoryError::ReadOnly));
        assert!(repo.save_resource(&uri("foo"), &Graph::new()).is_err());
        assert_eq!(repo.write_count(), 0);
        assert!(repo.is_empty());
    }

    // -----------------------------------------------------------------------
    // Fixity
    // -----------------------------------------------------------------------

    #[test]
    fn fixity_reports_success_in_premis() {
        let repo = InMemoryRepository::new();
        let foo = uri("foo");
        repo.create_datastream(&foo, "ds", payload(b"data")).unwrap();
        let body = repo.fixity_check(&uri("foo/ds")).unwrap();
        assert!(body.contains(premis::HAS_EVENT_OUTCOME));
        assert!(body.contains("\"SUCCESS\""));
        assert!(ntriples::parse(&body).is_ok());
    }

    #[test]
    fn fixity_reports_bad_checksum_after_corruption() {
        let repo = InMemoryRepository::new();
        let foo = uri("foo");
        repo.create_datastream(&foo, "ds", payload(b"data")).unwrap();
        repo.corrupt(&uri("foo/ds")).unwrap();
        let body = repo.fixity_check(&uri("foo/ds")).unwrap();
        assert!(body.contains("\"BAD_CHECKSUM\""));
    }

    #[test]
    fn legacy_vocabulary_uses_status() {
        let config = RepositoryConfig {
            fixity_vocabulary: FixityVocabulary::Legacy,
            ..RepositoryConfig::default()
        };
        let repo = InMemoryRepository::with_config(config).unwrap();
        let foo = uri("foo");
        repo.create_datastream(&foo, "ds", payload(b"data")).unwrap();
        let body = repo.fixity_check(&uri("foo/ds")).unwrap();
        assert!(body.contains(fcrepo::STATUS));
        assert!(!body.contains(premis::HAS_EVENT_OUTCOME));
    }

    #[test]
    fn fixity_on_container_fails() {
        let repo = InMemoryRepository::new();
        repo.save_resource(&uri("foo"), &Graph::new()).unwrap();
        let err = repo.fixity_check(&uri("foo")).unwrap_err();
        assert!(matches!(err, RepositoryError::KindMismatch { .. }));
    }

    // -----------------------------------------------------------------------
    // Debug
    // -----------------------------------------------------------------------

    #[test]
    fn debug_format() {
        let repo = InMemoryRepository::new();
        let debug = format!("{repo:?}");
        assert!(debug.contains("InMemoryRepository"));
        assert!(debug.contains("resource_count"));
    }
}
