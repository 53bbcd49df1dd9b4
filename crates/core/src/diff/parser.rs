//! Parser for `git diff --name-status` output.

use tracing::debug;

use super::{ChangeAction, ChangeEntry, ChangeSet};
use crate::errors::DiffError;

/// Classify raw name-status diff text into a [`ChangeSet`].
///
/// Each line is expected to carry an action code followed by a path,
/// whitespace-delimited. Action code exactly `D` (after stripping any
/// colon-delimited qualifier and trailing similarity score) classifies
/// as deleted; every other code classifies as modified. A line that does
/// not split into at least two fields is a classification error, not a
/// skip. Whitespace-only input yields an empty set.
pub fn parse_name_status(raw: &str) -> Result<ChangeSet, DiffError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        debug!("empty diff output, nothing to classify");
        return Ok(ChangeSet::default());
    }

    let mut entries = Vec::new();
    for line in trimmed.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.split_whitespace();
        let code = fields
            .next()
            .ok_or_else(|| DiffError::MalformedLine(line.to_string()))?;
        let path = fields
            .next()
            .ok_or_else(|| DiffError::MalformedLine(line.to_string()))?;

        let action = if normalize_action_code(code) == "D" {
            ChangeAction::Deleted
        } else {
            ChangeAction::Modified
        };

        entries.push(ChangeEntry {
            path: path.to_string(),
            action,
        });
    }

    debug!(count = entries.len(), "classified diff lines");
    Ok(ChangeSet::new(entries))
}

/// Reduce an action code to its letter prefix.
///
/// Drops a colon-delimited qualifier (`R:90`) and a trailing similarity
/// score (`R100`, `C75`, `D012`).
fn normalize_action_code(code: &str) -> &str {
    let code = match code.find(':') {
        Some(pos) => &code[..pos],
        None => code,
    };
    code.trim_end_matches(|c: char| c.is_ascii_digit())
}
