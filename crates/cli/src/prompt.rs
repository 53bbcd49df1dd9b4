//! Terminal-backed operator prompt.

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use dialoguer::Input;

use gitpromote_core::errors::SelectError;
use gitpromote_core::{ChangeAction, ChangeSet, Prompt};

use crate::style;

/// [`Prompt`] implementation bound to the operator's terminal.
///
/// Holds the classified change set so the candidate table can label each
/// path with its action.
pub struct TerminalPrompt {
    changes: ChangeSet,
}

impl TerminalPrompt {
    pub fn new(changes: ChangeSet) -> Self {
        Self { changes }
    }

    fn action_label(&self, path: &str) -> &'static str {
        match self.changes.action_of(path) {
            Some(ChangeAction::Deleted) => "deleted",
            _ => "modified",
        }
    }
}

impl Prompt for TerminalPrompt {
    fn ask(&mut self, prompt: &str) -> Result<String, SelectError> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| SelectError::InputError(e.to_string()))
    }

    fn say(&mut self, msg: &str) {
        println!("{msg}");
    }

    fn show_candidates(&mut self, candidates: &[String]) {
        println!();
        if candidates.is_empty() {
            println!("{}", style::warn("No files are currently selected."));
            println!();
            return;
        }

        println!(
            "{}",
            style::header(&format!("Candidate files ({})", candidates.len()))
        );

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["File", "Action"]);
        for path in candidates {
            table.add_row(vec![Cell::new(path), Cell::new(self.action_label(path))]);
        }

        println!("{table}");
        println!();
    }
}
