//! Change tracking for one record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use fedmap_types::Value;

/// Value of an attribute before and after the unsaved change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeChange {
    pub from: Value,
    pub to: Value,
}

/// Attributes changed since the last successful save.
///
/// The live map is replaced by the previous-changes snapshot in a single
/// step on save; there is no way to clear it partially.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirtyTracker {
    changes: BTreeMap<String, AttributeChange>,
    previous: BTreeMap<String, AttributeChange>,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a change. Repeated changes keep the first `from`.
    pub fn mark_changed(&mut self, name: &str, from: Value, to: Value) {
        match self.changes.get_mut(name) {
            Some(change) => change.to = to,
            None => {
                self.changes
                    .insert(name.to_string(), AttributeChange { from, to });
            }
        }
    }

    pub fn is_changed(&self, name: &str) -> bool {
        self.changes.contains_key(name)
    }

    /// Returns `true` if any attribute changed.
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Names of changed attributes, sorted.
    pub fn changed(&self) -> Vec<&str> {
        self.changes.keys().map(String::as_str).collect()
    }

    pub fn changes(&self) -> &BTreeMap<String, AttributeChange> {
        &self.changes
    }

    /// Changes persisted by the last successful save.
    pub fn previous_changes(&self) -> &BTreeMap<String, AttributeChange> {
        &self.previous
    }

    /// Move the live changes into the previous-changes snapshot.
    pub fn snapshot_and_clear(&mut self) {
        self.previous = std::mem::take(&mut self.changes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_marks_keep_original_value() {
        let mut t = DirtyTracker::new();
        t.mark_changed("title", Value::Null, Value::from("a"));
        t.mark_changed("title", Value::from("a"), Value::from("b"));
        let change = &t.changes()["title"];
        assert_eq!(change.from, Value::Null);
        assert_eq!(change.to, Value::from("b"));
        assert_eq!(t.changed(), vec!["title"]);
    }

    #[test]
    fn snapshot_moves_changes_to_previous() {
        let mut t = DirtyTracker::new();
        t.mark_changed("title", Value::Null, Value::from("a"));
        t.snapshot_and_clear();
        assert!(!t.has_changes());
        assert!(!t.is_changed("title"));
        assert!(t.previous_changes().contains_key("title"));
    }

    #[test]
    fn second_snapshot_replaces_previous() {
        let mut t = DirtyTracker::new();
        t.mark_changed("title", Value::Null, Value::from("a"));
        t.snapshot_and_clear();
        t.snapshot_and_clear();
        assert!(t.previous_changes().is_empty());
    }
}
