//! gitpromote core library.
//!
//! This crate provides the change-set curation engine behind gitpromote:
//! concurrent branch verification, name-status diff classification, the
//! interactive selection state machine, the external-editor bridge, and
//! the git CLI client the orchestrator drives them with.

pub mod diff;
pub mod errors;
pub mod git;
pub mod select;
pub mod verify;

// Re-exports for convenience.
pub use diff::{parse_name_status, ChangeAction, ChangeEntry, ChangeSet};
pub use errors::{CoreError, DiffError, EditorError, GitError, SelectError};
pub use git::GitClient;
pub use select::{ChangeSource, DiffSource, EditorBridge, Outcome, Prompt, SelectionEngine};
pub use verify::{verify_branches, RefProbe};
