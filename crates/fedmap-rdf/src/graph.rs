//! Graph storage for record properties.
//!
//! [`GraphStore`] is the boundary the mapping layer reads and writes
//! graph-backed attributes through. [`Graph`] is the in-memory
//! implementation every record carries as its graph handle.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::term::{Term, Triple};

/// Read/write access to the objects of `(subject, predicate)` pairs.
///
/// Values are ordered: `write` followed by `read` yields the same sequence.
pub trait GraphStore {
    /// Objects of `(subject, predicate)` in insertion order. Empty if none.
    fn read(&self, subject: &str, predicate: &str) -> Vec<Term>;

    /// Replace the objects of `(subject, predicate)`. An empty sequence
    /// removes the pair.
    fn write(&mut self, subject: &str, predicate: &str, objects: Vec<Term>);

    /// All statements, grouped by subject then predicate.
    fn triples(&self) -> Vec<Triple>;
}

/// Ordered in-memory graph keyed by subject and predicate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    statements: BTreeMap<String, BTreeMap<String, Vec<Term>>>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from parsed triples, keeping their order.
    pub fn from_triples(triples: impl IntoIterator<Item = Triple>) -> Self {
        let mut graph = Self::new();
        for triple in triples {
            graph.insert(triple);
        }
        graph
    }

    /// Append one statement. Duplicates of an existing statement are ignored.
    pub fn insert(&mut self, triple: Triple) {
        let objects = self
            .statements
            .entry(subject_key(&triple.subject))
            .or_default()
            .entry(triple.predicate)
            .or_default();
        if !objects.contains(&triple.object) {
            objects.push(triple.object);
        }
    }

    /// Number of statements.
    pub fn len(&self) -> usize {
        self.statements
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    /// Returns `true` if the graph has no statements.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Distinct subjects, sorted.
    pub fn subjects(&self) -> Vec<&str> {
        self.statements.keys().map(String::as_str).collect()
    }

    /// First object of `(subject, predicate)`.
    pub fn first(&self, subject: &str, predicate: &str) -> Option<&Term> {
        self.statements
            .get(subject)
            .and_then(|preds| preds.get(predicate))
            .and_then(|objects| objects.first())
    }

    /// Objects of `predicate` across every subject, in subject order.
    pub fn objects_of(&self, predicate: &str) -> Vec<&Term> {
        self.statements
            .values()
            .filter_map(|preds| preds.get(predicate))
            .flatten()
            .collect()
    }
}

impl GraphStore for Graph {
    fn read(&self, subject: &str, predicate: &str) -> Vec<Term> {
        self.statements
            .get(subject)
            .and_then(|preds| preds.get(predicate))
            .cloned()
            .unwrap_or_default()
    }

    fn write(&mut self, subject: &str, predicate: &str, objects: Vec<Term>) {
        if objects.is_empty() {
            if let Some(preds) = self.statements.get_mut(subject) {
                preds.remove(predicate);
                if preds.is_empty() {
                    self.statements.remove(subject);
                }
            }
            return;
        }
        let mut deduped: Vec<Term> = Vec::with_capacity(objects.len());
        for object in objects {
            if !deduped.contains(&object) {
                deduped.push(object);
            }
        }
        self.statements
            .entry(subject.to_string())
            .or_default()
            .insert(predicate.to_string(), deduped);
    }

    fn triples(&self) -> Vec<Triple> {
        let mut out = Vec::with_capacity(self.len());
        for (subject, preds) in &self.statements {
            let subject = subject_term(subject);
            for (predicate, objects) in preds {
                for object in objects {
                    out.push(Triple::new(subject.clone(), predicate.clone(), object.clone()));
                }
            }
        }
        out
    }
}

fn subject_key(term: &Term) -> String {
    match term {
        Term::Iri(iri) => iri.clone(),
        Term::Blank(label) => format!("_:{label}"),
        Term::Literal { lex, .. } => lex.clone(),
    }
}

fn subject_term(key: &str) -> Term {
    match key.strip_prefix("_:") {
        Some(label) => Term::Blank(label.to_string()),
        None => Term::Iri(key.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::dc;

    const S: &str = "http://localhost:8080/rest/foo";

    #[test]
    fn write_then_read_keeps_order() {
        let mut g = Graph::new();
        g.write(S, dc::TITLE, vec![Term::literal("b"), Term::literal("a")]);
        assert_eq!(
            g.read(S, dc::TITLE),
            vec![Term::literal("b"), Term::literal("a")]
        );
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn write_replaces_previous_values() {
        let mut g = Graph::new();
        g.write(S, dc::TITLE, vec![Term::literal("old")]);
        g.write(S, dc::TITLE, vec![Term::literal("new")]);
        assert_eq!(g.read(S, dc::TITLE), vec![Term::literal("new")]);
    }

    #[test]
    fn empty_write_removes_pair_and_subject() {
        let mut g = Graph::new();
        g.write(S, dc::TITLE, vec![Term::literal("x")]);
        g.write(S, dc::TITLE, vec![]);
        assert!(g.is_empty());
        assert!(g.read(S, dc::TITLE).is_empty());
    }

    #[test]
    fn duplicate_objects_collapse() {
        let mut g = Graph::new();
        g.write(S, dc::TITLE, vec![Term::literal("x"), Term::literal("x")]);
        g.insert(Triple::new(Term::iri(S), dc::TITLE, Term::literal("x")));
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn triples_roundtrip_through_from_triples() {
        let mut g = Graph::new();
        g.write(S, dc::TITLE, vec![Term::literal("t")]);
        g.write("_:b0", dc::CREATOR, vec![Term::literal("c")]);
        let rebuilt = Graph::from_triples(g.triples());
        assert_eq!(rebuilt, g);
    }

    #[test]
    fn objects_of_spans_subjects() {
        let mut g = Graph::new();
        g.write("http://a", dc::TITLE, vec![Term::literal("1")]);
        g.write("http://b", dc::TITLE, vec![Term::literal("2")]);
        assert_eq!(g.objects_of(dc::TITLE).len(), 2);
        assert_eq!(g.first("http://b", dc::TITLE), Some(&Term::literal("2")));
    }
}
