//! External-editor round trip for candidate-list curation.
//!
//! The candidate paths are written to a scratch file below an
//! instructional header, the operator's editor is attached to the file
//! and the terminal, and on exit only lines the operator prefixed with
//! `keep ` survive. Unmarked lines are dropped by design, not an error.

use std::process::Stdio;

use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::errors::EditorError;

/// Marker the operator prepends to a path to retain it.
pub const KEEP_MARKER: &str = "keep ";

const HEADER: &[&str] = &[
    "\" GITPROMOTE V1.0",
    "\"",
    "\" To mark a file to keep, prepend 'keep ' to its line.",
    "\" For example:",
    "\"",
    "\" keep filename.txt",
    "\"",
    "\" Every unmarked line is discarded.",
    "\" Make your selections below, then save and quit the editor.",
];

/// Hands a candidate list to an external editor and parses the result back.
#[derive(Debug, Clone)]
pub struct EditorBridge {
    editor: String,
}

impl EditorBridge {
    /// Create a bridge invoking the given editor command.
    pub fn new(editor: impl Into<String>) -> Self {
        Self {
            editor: editor.into(),
        }
    }

    /// Create a bridge using `$EDITOR`, falling back to `vi`.
    pub fn from_env() -> Self {
        let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
        info!(%editor, "resolved editor command");
        Self::new(editor)
    }

    pub fn editor(&self) -> &str {
        &self.editor
    }

    /// Run one curation round through the editor.
    ///
    /// The scratch file is removed on every exit path, including launch
    /// and read-back failures.
    pub async fn curate(&self, candidates: &[String]) -> Result<Vec<String>, EditorError> {
        let scratch = NamedTempFile::with_prefix("gitpromote-")?;
        std::fs::write(scratch.path(), render_document(candidates))?;
        debug!(path = %scratch.path().display(), count = candidates.len(), "wrote scratch document");

        let status = Command::new(&self.editor)
            .arg(scratch.path())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| EditorError::LaunchFailed(self.editor.clone(), e))?;

        if !status.success() {
            let exit_code = status.code().unwrap_or(-1);
            warn!(editor = %self.editor, exit_code, "editor session failed");
            return Err(EditorError::EditorFailed {
                editor: self.editor.clone(),
                exit_code,
            });
        }

        let edited = std::fs::read_to_string(scratch.path())?;
        let kept = parse_kept_lines(&edited);
        info!(kept = kept.len(), offered = candidates.len(), "editor curation completed");
        Ok(kept)
    }
}

/// Render the scratch document: header, blank separator, one path per line.
pub fn render_document(candidates: &[String]) -> String {
    let mut doc = HEADER.join("\n");
    doc.push_str("\n\n");
    for path in candidates {
        doc.push_str(path);
        doc.push('\n');
    }
    doc
}

/// Keep only `keep `-marked lines, marker stripped and remainder trimmed.
pub fn parse_kept_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| line.strip_prefix(KEEP_MARKER))
        .map(|rest| rest.trim().to_string())
        .filter(|path| !path.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<String> {
        vec!["a.txt".to_string(), "b.txt".to_string(), "c.txt".to_string()]
    }

    #[test]
    fn test_document_layout() {
        let doc = render_document(&candidates());
        let lines: Vec<&str> = doc.lines().collect();

        // Instructional header first, each line marked, then a blank
        // separator, then the candidates in order.
        assert!(lines[..HEADER.len()].iter().all(|l| l.starts_with('"')));
        assert_eq!(lines[HEADER.len()], "");
        assert_eq!(&lines[HEADER.len() + 1..], &["a.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn test_unedited_document_keeps_nothing() {
        let doc = render_document(&candidates());
        assert!(parse_kept_lines(&doc).is_empty());
    }

    #[test]
    fn test_marked_lines_survive_in_artifact_order() {
        let edited = "\" GITPROMOTE V1.0\n\nkeep c.txt\nb.txt\nkeep a.txt\n";
        assert_eq!(parse_kept_lines(edited), vec!["c.txt", "a.txt"]);
    }

    #[test]
    fn test_unrelated_surrounding_lines_are_ignored() {
        let edited = "some note to self\nkeep a.txt\ngarbage keep b.txt\nkeep c.txt\ntrailing";
        assert_eq!(parse_kept_lines(edited), vec!["a.txt", "c.txt"]);
    }

    #[test]
    fn test_kept_path_is_trimmed() {
        assert_eq!(parse_kept_lines("keep   spaced.txt  \n"), vec!["spaced.txt"]);
    }

    #[test]
    fn test_bare_marker_is_dropped() {
        assert!(parse_kept_lines("keep \nkeep    \n").is_empty());
    }
}
