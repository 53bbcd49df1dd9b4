//! Error types for the gitpromote core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them all for callers that want a
//! single error type.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Diff(#[from] DiffError),

    #[error(transparent)]
    Select(#[from] SelectError),

    #[error(transparent)]
    Editor(#[from] EditorError),
}

// ---------------------------------------------------------------------------
// Git errors
// ---------------------------------------------------------------------------

/// Errors from git CLI operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// The `git` binary was not found on `$PATH`.
    #[error("git binary not found: {0}")]
    BinaryNotFound(String),

    /// A `git` command exited with a non-zero status.
    #[error("git command failed (exit {exit_code}): {stderr}")]
    CommandFailed {
        exit_code: i32,
        stderr: String,
    },

    /// No branch-existence check produced a usable result.
    #[error("branch verification produced no result: {0}")]
    VerificationUnavailable(String),

    /// Generic I/O wrapper.
    #[error("git I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Diff classification errors
// ---------------------------------------------------------------------------

/// Errors from parsing name-status diff output.
#[derive(Debug, Error)]
pub enum DiffError {
    /// A diff line did not split into an action code and a path.
    #[error("malformed diff line: '{0}'")]
    MalformedLine(String),
}

// ---------------------------------------------------------------------------
// Selection errors
// ---------------------------------------------------------------------------

/// Errors from the interactive selection engine.
#[derive(Debug, Error)]
pub enum SelectError {
    /// Reading an operator response failed.
    #[error("failed to read operator input: {0}")]
    InputError(String),
}

// ---------------------------------------------------------------------------
// Editor bridge errors
// ---------------------------------------------------------------------------

/// Errors from the external-editor round trip.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The editor binary could not be launched.
    #[error("editor '{0}' could not be launched: {1}")]
    LaunchFailed(String, std::io::Error),

    /// The editor exited with a non-zero status.
    #[error("editor '{editor}' exited with status {exit_code}")]
    EditorFailed {
        editor: String,
        exit_code: i32,
    },

    /// Scratch-file creation, read, or write failed.
    #[error("scratch file I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
