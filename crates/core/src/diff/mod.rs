//! Change-set model and name-status diff classification.

pub mod parser;

pub use parser::parse_name_status;

use serde::{Deserialize, Serialize};

/// The kind of change applied to a path between two refs.
///
/// `Modified` covers every non-deletion action code (added, renamed,
/// copied, type-changed, ...) — the classifier only discriminates
/// "delete" from "everything else".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeAction {
    Modified,
    Deleted,
}

/// One file path together with the change applied to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    pub path: String,
    pub action: ChangeAction,
}

/// An ordered set of change entries from a single diff query.
///
/// Order is insertion order from the diff report; entries are never
/// deduplicated. Immutable once classified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    entries: Vec<ChangeEntry>,
}

impl ChangeSet {
    pub fn new(entries: Vec<ChangeEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ChangeEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Paths carried over (every non-deletion action), in insertion order.
    pub fn modified(&self) -> Vec<String> {
        self.paths_with(ChangeAction::Modified)
    }

    /// Paths to be removed, in insertion order.
    pub fn deleted(&self) -> Vec<String> {
        self.paths_with(ChangeAction::Deleted)
    }

    /// All paths in insertion order, modified and deleted alike.
    pub fn all_paths(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.path.clone()).collect()
    }

    /// Look up the action recorded for `path`, if any.
    pub fn action_of(&self, path: &str) -> Option<ChangeAction> {
        self.entries
            .iter()
            .find(|e| e.path == path)
            .map(|e| e.action)
    }

    fn paths_with(&self, action: ChangeAction) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.action == action)
            .map(|e| e.path.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ChangeSet {
        ChangeSet::new(vec![
            ChangeEntry {
                path: "src/lib.rs".into(),
                action: ChangeAction::Modified,
            },
            ChangeEntry {
                path: "docs/old.md".into(),
                action: ChangeAction::Deleted,
            },
            ChangeEntry {
                path: "src/new.rs".into(),
                action: ChangeAction::Modified,
            },
        ])
    }

    #[test]
    fn test_partitions_are_disjoint_and_complete() {
        let set = sample();
        let modified = set.modified();
        let deleted = set.deleted();

        assert_eq!(modified, vec!["src/lib.rs", "src/new.rs"]);
        assert_eq!(deleted, vec!["docs/old.md"]);
        assert_eq!(modified.len() + deleted.len(), set.len());
        assert!(modified.iter().all(|p| !deleted.contains(p)));
    }

    #[test]
    fn test_all_paths_preserves_insertion_order() {
        let set = sample();
        assert_eq!(
            set.all_paths(),
            vec!["src/lib.rs", "docs/old.md", "src/new.rs"]
        );
    }

    #[test]
    fn test_action_lookup() {
        let set = sample();
        assert_eq!(set.action_of("docs/old.md"), Some(ChangeAction::Deleted));
        assert_eq!(set.action_of("src/lib.rs"), Some(ChangeAction::Modified));
        assert_eq!(set.action_of("missing"), None);
    }
}
