//! Containment walks and full reindexing.
//!
//! [`descendant_uris`] enumerates a resource and everything it contains,
//! following only graph resources. Binaries (datastreams and legacy content
//! files) are not part of the containment model and are skipped together
//! with anything beneath them.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, info, warn};

use fedmap_index::IndexSink;
use fedmap_repo::{RepositoryClient, RepositoryError, ResourceKind};
use fedmap_types::ResourceUri;

use crate::error::ModelResult;
use crate::fedmap::Fedmap;

/// `root` followed by every graph resource beneath it, breadth-first.
///
/// Fails with `NotFound` if `root` does not exist and `KindMismatch` if it
/// is a binary.
pub fn descendant_uris(repo: &dyn RepositoryClient, root: &ResourceUri) -> ModelResult<Vec<ResourceUri>> {
    match repo.head(root)? {
        Some(ResourceKind::RdfSource) => {}
        Some(ResourceKind::NonRdfSource) => {
            return Err(RepositoryError::KindMismatch {
                uri: root.clone(),
                expected: ResourceKind::RdfSource.to_string(),
            }
            .into());
        }
        None => return Err(RepositoryError::NotFound(root.clone()).into()),
    }

    let mut visited = HashSet::new();
    visited.insert(root.clone());
    let mut result = vec![root.clone()];
    let mut queue: VecDeque<ResourceUri> = VecDeque::from([root.clone()]);

    while let Some(current) = queue.pop_front() {
        for child in repo.list_children(&current)? {
            if !visited.insert(child.clone()) {
                continue;
            }
            match repo.head(&child)? {
                Some(ResourceKind::RdfSource) => {
                    result.push(child.clone());
                    queue.push_back(child);
                }
                Some(ResourceKind::NonRdfSource) => {
                    debug!(uri = %child, "skipping binary");
                }
                None => warn!(uri = %child, "listed child vanished"),
            }
        }
    }

    debug!(root = %root, count = result.len(), "resolved descendants");
    Ok(result)
}

/// Index every record under the base container. The container itself is
/// not a record and is skipped. Returns the number of documents submitted.
pub fn reindex_everything(fedmap: &Fedmap, sink: &dyn IndexSink) -> ModelResult<usize> {
    let ids = fedmap.ids();
    let mut submitted = 0;
    for uri in descendant_uris(fedmap.repo(), ids.base())? {
        let Some(id) = ids.uri_to_id(&uri) else {
            continue;
        };
        let record = fedmap.find(&id)?;
        sink.submit(record.to_index_document()?)?;
        submitted += 1;
    }
    info!(count = submitted, "reindexed repository");
    Ok(submitted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::testing::{book, fedmap, id};
    use fedmap_index::InMemoryIndex;
    use fedmap_rdf::Graph;
    use fedmap_repo::{ControlGroup, DatastreamPayload, InMemoryRepository};

    fn uri(repo: &InMemoryRepository, path: &str) -> ResourceUri {
        repo.base().child(path)
    }

    fn containment(repo: &InMemoryRepository) {
        for path in ["foo", "foo/bar", "foo/bar/chu"] {
            repo.save_resource(&uri(repo, path), &Graph::new()).unwrap();
        }
        repo.create_datastream(
            &uri(repo, "foo/bar"),
            "bax",
            DatastreamPayload {
                content: b"legacy content",
                mime_type: "application/octet-stream",
                control_group: ControlGroup::Managed,
            },
        )
        .unwrap();
    }

    // -----------------------------------------------------------------------
    // Descendants
    // -----------------------------------------------------------------------

    #[test]
    fn walks_graph_resources_and_skips_binaries() {
        let repo = InMemoryRepository::new();
        containment(&repo);
        let found = descendant_uris(&repo, &uri(&repo, "foo")).unwrap();
        assert_eq!(
            found,
            vec![
                uri(&repo, "foo"),
                uri(&repo, "foo/bar"),
                uri(&repo, "foo/bar/chu"),
            ]
        );
        assert!(!found.contains(&uri(&repo, "foo/bar/bax")));
    }

    #[test]
    fn leaf_yields_only_itself() {
        let repo = InMemoryRepository::new();
        containment(&repo);
        let found = descendant_uris(&repo, &uri(&repo, "foo/bar/chu")).unwrap();
        assert_eq!(found, vec![uri(&repo, "foo/bar/chu")]);
    }

    #[test]
    fn missing_root_fails() {
        let repo = InMemoryRepository::new();
        let err = descendant_uris(&repo, &uri(&repo, "nope")).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Repository(RepositoryError::NotFound(_))
        ));
    }

    #[test]
    fn binary_root_fails() {
        let repo = InMemoryRepository::new();
        containment(&repo);
        let err = descendant_uris(&repo, &uri(&repo, "foo/bar/bax")).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Repository(RepositoryError::KindMismatch { .. })
        ));
    }

    // -----------------------------------------------------------------------
    // Reindexing
    // -----------------------------------------------------------------------

    #[test]
    fn reindex_everything_indexes_each_record() {
        let (fedmap, _) = fedmap();
        for name in ["foo", "bar"] {
            let mut rec = fedmap.new_record_with_id(&book(), id(name));
            rec.set("title", name).unwrap();
            rec.save().unwrap();
        }
        let index = InMemoryIndex::new();
        assert!(index.query_id("foo").unwrap().is_none());

        let count = fedmap.reindex_everything(&index).unwrap();
        assert_eq!(count, 2);
        assert_eq!(index.len(), 2);
        let foo = index.query_id("foo").unwrap().expect("foo indexed");
        assert_eq!(foo.get("title"), Some(&serde_json::json!("foo")));
        assert!(index.query_id("bar").unwrap().is_some());
    }

    #[test]
    fn reindex_skips_datastreams() {
        let (fedmap, _) = fedmap();
        let mut rec = fedmap.new_record_with_id(&book(), id("foo"));
        rec.set("pages", 3i64).unwrap();
        rec.datastream_mut("content").set_content("text");
        rec.save().unwrap();

        let index = InMemoryIndex::new();
        assert_eq!(reindex_everything(&fedmap, &index).unwrap(), 1);
        assert!(index.query_id("foo/content").unwrap().is_none());
    }

    #[test]
    fn reindex_of_empty_repository_submits_nothing() {
        let (fedmap, _) = fedmap();
        let index = InMemoryIndex::new();
        assert_eq!(fedmap.reindex_everything(&index).unwrap(), 0);
        assert!(index.is_empty());
    }
}
