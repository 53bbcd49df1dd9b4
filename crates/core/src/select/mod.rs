//! Interactive curation of a candidate file list.
//!
//! The operator reviews the current list and either confirms it, quits,
//! walks the files one by one, hands the list to an external editor, or
//! resets it from a fresh diff. Every sub-action re-enters review so the
//! operator always gets a final confirmation chance. The loop is explicit
//! by design: invalid input is unbounded and must not grow the stack.

pub mod editor;

pub use editor::EditorBridge;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::diff::{parse_name_status, ChangeSet};
use crate::errors::{CoreError, SelectError};
use crate::git::GitClient;

// ---------------------------------------------------------------------------
// Seams
// ---------------------------------------------------------------------------

/// Operator I/O for the selection engine.
///
/// `ask` blocks for one line of input; `say` emits a notice. The CLI
/// provides a terminal-backed implementation, tests a scripted one.
pub trait Prompt {
    fn ask(&mut self, prompt: &str) -> Result<String, SelectError>;

    fn say(&mut self, msg: &str);

    /// Render the current candidate list before each review round.
    fn show_candidates(&mut self, candidates: &[String]) {
        self.say("Files changed:");
        for path in candidates {
            self.say(path);
        }
    }
}

/// Produces a fresh, unfiltered change set on demand (the reset path).
#[async_trait]
pub trait ChangeSource: Send + Sync {
    async fn snapshot(&self) -> Result<ChangeSet, CoreError>;
}

/// [`ChangeSource`] backed by a live name-status diff between two refs.
///
/// Each snapshot runs the diff anew; nothing is cached from earlier
/// rounds.
pub struct DiffSource {
    client: GitClient,
    base: String,
    head: String,
}

impl DiffSource {
    pub fn new(client: GitClient, base: impl Into<String>, head: impl Into<String>) -> Self {
        Self {
            client,
            base: base.into(),
            head: head.into(),
        }
    }
}

#[async_trait]
impl ChangeSource for DiffSource {
    async fn snapshot(&self) -> Result<ChangeSet, CoreError> {
        let raw = self.client.diff_name_status(&self.base, &self.head).await?;
        Ok(parse_name_status(&raw)?)
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Terminal result of a curation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The operator approved this list (possibly empty).
    Confirmed(Vec<String>),
    /// The operator quit; nothing should be carried over.
    Aborted,
}

impl Outcome {
    /// The approved list, empty on abort.
    pub fn into_list(self) -> Vec<String> {
        match self {
            Outcome::Confirmed(list) => list,
            Outcome::Aborted => Vec::new(),
        }
    }
}

/// Interactive state machine over a candidate file list.
pub struct SelectionEngine<'a> {
    prompt: &'a mut dyn Prompt,
    editor: &'a EditorBridge,
    source: Option<&'a dyn ChangeSource>,
}

impl<'a> SelectionEngine<'a> {
    pub fn new(prompt: &'a mut dyn Prompt, editor: &'a EditorBridge) -> Self {
        Self {
            prompt,
            editor,
            source: None,
        }
    }

    /// Attach a change source, enabling the `r` (reset) transition.
    pub fn with_change_source(mut self, source: &'a dyn ChangeSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Run review rounds until the operator confirms or quits.
    ///
    /// A failed editor round or reset keeps the prior candidate list and
    /// re-enters review; only input-stream failures propagate.
    pub async fn run(&mut self, mut candidates: Vec<String>) -> Result<Outcome, SelectError> {
        loop {
            self.prompt.show_candidates(&candidates);

            let review_prompt = self.review_prompt();
            let response = self.prompt.ask(&review_prompt)?;
            match response.trim().to_lowercase().as_str() {
                "y" => {
                    info!(count = candidates.len(), "candidate list confirmed");
                    return Ok(Outcome::Confirmed(candidates));
                }
                "q" => {
                    info!("curation aborted by operator");
                    return Ok(Outcome::Aborted);
                }
                "p" => {
                    candidates = self.pick(candidates)?;
                }
                "v" => match self.editor.curate(&candidates).await {
                    Ok(kept) => {
                        debug!(kept = kept.len(), "editor round accepted");
                        candidates = kept;
                    }
                    Err(e) => {
                        warn!(error = %e, "editor round failed, keeping current list");
                        self.prompt
                            .say(&format!("Editor curation failed: {e}. The list is unchanged."));
                    }
                },
                "r" => match self.source {
                    Some(source) => match source.snapshot().await {
                        Ok(set) => {
                            debug!(count = set.len(), "candidate list reset from fresh diff");
                            candidates = set.all_paths();
                        }
                        Err(e) => {
                            warn!(error = %e, "reset failed, keeping current list");
                            self.prompt
                                .say(&format!("Reset failed: {e}. The list is unchanged."));
                        }
                    },
                    None => {
                        debug!("reset requested but no change source is attached");
                        let notice = self.invalid_notice();
                        self.prompt.say(&notice);
                    }
                },
                other => {
                    debug!(response = other, "invalid review response");
                    let notice = self.invalid_notice();
                    self.prompt.say(&notice);
                }
            }
        }
    }

    /// Walk the candidates one by one, in order, keeping only explicit
    /// `y` answers. Any other answer excludes the file with a warning.
    fn pick(&mut self, candidates: Vec<String>) -> Result<Vec<String>, SelectError> {
        self.prompt.say("Pick only the files you want to include:");

        let mut kept = Vec::new();
        for path in candidates {
            let response = self.prompt.ask(&format!("Include {path}? (y/n)"))?;
            match response.trim().to_lowercase().as_str() {
                "y" => kept.push(path),
                "n" => {}
                _ => self.prompt.say("Invalid response. Skipping file."),
            }
        }
        Ok(kept)
    }

    fn review_prompt(&self) -> String {
        let mut text = String::from(
            "Check this list carefully. Type 'y' to proceed, 'q' to quit, \
             'p' to pick files one by one, 'v' to curate the list in your editor",
        );
        if self.source.is_some() {
            text.push_str(", or 'r' to reset it from a fresh diff (y/q/p/v/r)");
        } else {
            text.push_str(" (y/q/p/v)");
        }
        text
    }

    fn invalid_notice(&self) -> String {
        if self.source.is_some() {
            "Invalid response. Type only 'y', 'q', 'p', 'v', or 'r'".to_string()
        } else {
            "Invalid response. Type only 'y', 'q', 'p', or 'v'".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{ChangeAction, ChangeEntry};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedPrompt {
        responses: VecDeque<&'static str>,
        notices: Vec<String>,
    }

    impl ScriptedPrompt {
        fn new(responses: &[&'static str]) -> Self {
            Self {
                responses: responses.iter().copied().collect(),
                notices: Vec::new(),
            }
        }
    }

    impl Prompt for ScriptedPrompt {
        fn ask(&mut self, _prompt: &str) -> Result<String, SelectError> {
            self.responses
                .pop_front()
                .map(|s| s.to_string())
                .ok_or_else(|| SelectError::InputError("script exhausted".into()))
        }

        fn say(&mut self, msg: &str) {
            self.notices.push(msg.to_string());
        }
    }

    /// Returns a different, call-counted change set on every snapshot.
    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ChangeSource for CountingSource {
        async fn snapshot(&self) -> Result<ChangeSet, CoreError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(ChangeSet::new(vec![ChangeEntry {
                path: format!("snapshot-{call}.txt"),
                action: ChangeAction::Modified,
            }]))
        }
    }

    fn paths(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn bridge() -> EditorBridge {
        // Never invoked by these scripts.
        EditorBridge::new("false")
    }

    #[tokio::test]
    async fn test_confirm_returns_current_list() {
        let mut prompt = ScriptedPrompt::new(&["y"]);
        let editor = bridge();
        let outcome = SelectionEngine::new(&mut prompt, &editor)
            .run(paths(&["a", "b"]))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Confirmed(paths(&["a", "b"])));
    }

    #[tokio::test]
    async fn test_invalid_responses_are_no_ops() {
        let mut prompt = ScriptedPrompt::new(&["x", "??", "  maybe  ", "y"]);
        let editor = bridge();
        let outcome = SelectionEngine::new(&mut prompt, &editor)
            .run(paths(&["a", "b"]))
            .await
            .unwrap();
        assert_eq!(outcome.into_list(), paths(&["a", "b"]));
        assert_eq!(
            prompt
                .notices
                .iter()
                .filter(|n| n.starts_with("Invalid response"))
                .count(),
            3
        );
    }

    #[tokio::test]
    async fn test_quit_aborts_from_any_list() {
        let editor = bridge();

        let mut prompt = ScriptedPrompt::new(&["q"]);
        let outcome = SelectionEngine::new(&mut prompt, &editor)
            .run(paths(&["a"]))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Aborted);
        assert!(outcome.into_list().is_empty());

        let mut prompt = ScriptedPrompt::new(&["q"]);
        let outcome = SelectionEngine::new(&mut prompt, &editor)
            .run(Vec::new())
            .await
            .unwrap();
        assert!(outcome.into_list().is_empty());
    }

    #[tokio::test]
    async fn test_responses_are_trimmed_and_case_insensitive() {
        let mut prompt = ScriptedPrompt::new(&["  Y \n"]);
        let editor = bridge();
        let outcome = SelectionEngine::new(&mut prompt, &editor)
            .run(paths(&["a"]))
            .await
            .unwrap();
        assert_eq!(outcome.into_list(), paths(&["a"]));
    }

    #[tokio::test]
    async fn test_picking_keeps_input_order() {
        let mut prompt = ScriptedPrompt::new(&["p", "y", "n", "y", "y"]);
        let editor = bridge();
        let outcome = SelectionEngine::new(&mut prompt, &editor)
            .run(paths(&["x", "y", "z"]))
            .await
            .unwrap();
        assert_eq!(outcome.into_list(), paths(&["x", "z"]));
    }

    #[tokio::test]
    async fn test_picking_two_files() {
        let mut prompt = ScriptedPrompt::new(&["p", "y", "n", "y"]);
        let editor = bridge();
        let outcome = SelectionEngine::new(&mut prompt, &editor)
            .run(paths(&["x", "y"]))
            .await
            .unwrap();
        assert_eq!(outcome.into_list(), paths(&["x"]));
    }

    #[tokio::test]
    async fn test_picking_invalid_answer_excludes_with_warning() {
        let mut prompt = ScriptedPrompt::new(&["p", "whatever", "y", "y"]);
        let editor = bridge();
        let outcome = SelectionEngine::new(&mut prompt, &editor)
            .run(paths(&["a", "b"]))
            .await
            .unwrap();
        assert_eq!(outcome.into_list(), paths(&["b"]));
        assert!(prompt
            .notices
            .iter()
            .any(|n| n == "Invalid response. Skipping file."));
    }

    #[tokio::test]
    async fn test_empty_confirmed_list_is_valid() {
        let mut prompt = ScriptedPrompt::new(&["p", "n", "y"]);
        let editor = bridge();
        let outcome = SelectionEngine::new(&mut prompt, &editor)
            .run(paths(&["only"]))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Confirmed(Vec::new()));
    }

    #[tokio::test]
    async fn test_reset_rederives_fresh_each_time() {
        let source = CountingSource {
            calls: AtomicUsize::new(0),
        };
        let mut prompt = ScriptedPrompt::new(&["r", "r", "y"]);
        let editor = bridge();
        let outcome = SelectionEngine::new(&mut prompt, &editor)
            .with_change_source(&source)
            .run(paths(&["stale.txt"]))
            .await
            .unwrap();
        // The second reset wins: nothing is cached from the first.
        assert_eq!(outcome.into_list(), paths(&["snapshot-2.txt"]));
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_reset_without_source_is_invalid() {
        let mut prompt = ScriptedPrompt::new(&["r", "y"]);
        let editor = bridge();
        let outcome = SelectionEngine::new(&mut prompt, &editor)
            .run(paths(&["a"]))
            .await
            .unwrap();
        assert_eq!(outcome.into_list(), paths(&["a"]));
        assert!(prompt
            .notices
            .iter()
            .any(|n| n.starts_with("Invalid response")));
    }

    #[tokio::test]
    async fn test_failed_editor_round_preserves_list() {
        // "false" exits non-zero immediately, so the round aborts.
        let mut prompt = ScriptedPrompt::new(&["v", "y"]);
        let editor = EditorBridge::new("false");
        let outcome = SelectionEngine::new(&mut prompt, &editor)
            .run(paths(&["a", "b"]))
            .await
            .unwrap();
        assert_eq!(outcome.into_list(), paths(&["a", "b"]));
        assert!(prompt
            .notices
            .iter()
            .any(|n| n.starts_with("Editor curation failed")));
    }
}
