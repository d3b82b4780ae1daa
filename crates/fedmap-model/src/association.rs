//! Graph-stored references between records.
//!
//! An association owns a name on its model type and reads or replaces the
//! references it stores in the record's graph. Associations are consulted
//! before attributes when resolving a name.

use std::fmt;

use fedmap_rdf::{GraphStore, Term};
use fedmap_types::{Cardinality, IdTranslator, Scalar, Value};

use crate::error::{ModelError, ModelResult};

/// Reader/replacer for one named association.
pub trait Association: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn cardinality(&self) -> Cardinality;

    /// Current target(s), shaped by [`cardinality`](Self::cardinality).
    fn read(&self, graph: &dyn GraphStore, subject: &str, ids: &IdTranslator) -> ModelResult<Value>;

    /// Replace the target(s). `value` has already passed the shape check.
    fn replace(
        &self,
        graph: &mut dyn GraphStore,
        subject: &str,
        value: Value,
        ids: &IdTranslator,
    ) -> ModelResult<()>;
}

/// References to other records stored as IRIs under one predicate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceAssociation {
    name: String,
    predicate: String,
    cardinality: Cardinality,
}

impl ReferenceAssociation {
    /// A reference to at most one record.
    pub fn single(name: impl Into<String>, predicate: impl Into<String>) -> Self {
        Self::with_cardinality(name, predicate, Cardinality::Single)
    }

    /// An ordered collection of references.
    pub fn many(name: impl Into<String>, predicate: impl Into<String>) -> Self {
        Self::with_cardinality(name, predicate, Cardinality::Multiple)
    }

    fn with_cardinality(
        name: impl Into<String>,
        predicate: impl Into<String>,
        cardinality: Cardinality,
    ) -> Self {
        Self {
            name: name.into(),
            predicate: predicate.into(),
            cardinality,
        }
    }

    pub fn predicate(&self) -> &str {
        &self.predicate
    }
}

impl Association for ReferenceAssociation {
    fn name(&self) -> &str {
        &self.name
    }

    fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    fn read(&self, graph: &dyn GraphStore, subject: &str, ids: &IdTranslator) -> ModelResult<Value> {
        let mut targets = Vec::new();
        for term in graph.read(subject, &self.predicate) {
            if let Scalar::Reference(id) = term.to_scalar(ids)? {
                targets.push(Scalar::Reference(id));
            }
        }
        Ok(Value::shaped(targets, self.cardinality))
    }

    fn replace(
        &self,
        graph: &mut dyn GraphStore,
        subject: &str,
        value: Value,
        ids: &IdTranslator,
    ) -> ModelResult<()> {
        let scalars = value.into_vec();
        if let Some(found) = scalars.iter().find(|s| !matches!(s, Scalar::Reference(_))) {
            return Err(ModelError::InvalidReference {
                name: self.name.clone(),
                found: found.clone(),
            });
        }
        let terms = scalars.iter().map(|s| Term::from_scalar(s, ids)).collect();
        graph.write(subject, &self.predicate, terms);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fedmap_rdf::Graph;
    use fedmap_types::{ResourceId, ResourceUri};

    const SUBJECT: &str = "http://localhost:8080/rest/book1";
    const MEMBER_OF: &str = "http://pcdm.org/models#memberOf";

    fn ids() -> IdTranslator {
        IdTranslator::new(ResourceUri::new("http://localhost:8080/rest").unwrap())
    }

    fn reference(id: &str) -> Scalar {
        Scalar::Reference(ResourceId::new(id).unwrap())
    }

    #[test]
    fn single_reference_roundtrip() {
        let assoc = ReferenceAssociation::single("library", MEMBER_OF);
        let mut graph = Graph::new();
        assoc
            .replace(&mut graph, SUBJECT, Value::from(reference("lib1")), &ids())
            .unwrap();
        assert_eq!(
            graph.read(SUBJECT, MEMBER_OF),
            vec![Term::iri("http://localhost:8080/rest/lib1")]
        );
        assert_eq!(
            assoc.read(&graph, SUBJECT, &ids()).unwrap(),
            Value::Single(reference("lib1"))
        );
    }

    #[test]
    fn many_reads_in_order_and_skips_foreign_iris() {
        let assoc = ReferenceAssociation::many("collections", MEMBER_OF);
        let mut graph = Graph::new();
        graph.write(
            SUBJECT,
            MEMBER_OF,
            vec![
                Term::iri("http://localhost:8080/rest/c2"),
                Term::iri("http://elsewhere.org/c9"),
                Term::iri("http://localhost:8080/rest/c1"),
            ],
        );
        assert_eq!(
            assoc.read(&graph, SUBJECT, &ids()).unwrap(),
            Value::Many(vec![reference("c2"), reference("c1")])
        );
    }

    #[test]
    fn replacing_with_null_clears() {
        let assoc = ReferenceAssociation::single("library", MEMBER_OF);
        let mut graph = Graph::new();
        assoc
            .replace(&mut graph, SUBJECT, Value::from(reference("lib1")), &ids())
            .unwrap();
        assoc.replace(&mut graph, SUBJECT, Value::Null, &ids()).unwrap();
        assert!(graph.is_empty());
        assert_eq!(assoc.read(&graph, SUBJECT, &ids()).unwrap(), Value::Null);
    }

    #[test]
    fn text_is_not_a_reference() {
        let assoc = ReferenceAssociation::single("library", MEMBER_OF);
        let mut graph = Graph::new();
        let err = assoc
            .replace(&mut graph, SUBJECT, Value::from("lib1"), &ids())
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidReference { .. }));
        assert!(graph.is_empty());
    }
}
