//! Concurrent branch-existence verification.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::GitError;
use crate::git::GitClient;

/// Source of branch-existence answers.
#[async_trait]
pub trait RefProbe: Send + Sync {
    async fn branch_exists(&self, branch: &str) -> Result<bool, GitError>;
}

#[async_trait]
impl RefProbe for GitClient {
    async fn branch_exists(&self, branch: &str) -> Result<bool, GitError> {
        GitClient::branch_exists(self, branch).await
    }
}

/// Confirm that every named branch exists.
///
/// One probe task is spawned per branch; results converge through a
/// channel bounded to the branch count, and aggregation waits for every
/// task to report before deciding — no early exit on the first negative,
/// so each failure gets logged. A probe error counts as "does not exist"
/// (fail-closed); it is escalated only if no check produced a usable
/// result at all.
pub async fn verify_branches(
    probe: Arc<dyn RefProbe>,
    branches: &[String],
) -> Result<bool, GitError> {
    if branches.is_empty() {
        return Ok(true);
    }

    let (tx, mut rx) = mpsc::channel(branches.len());
    for branch in branches {
        let probe = Arc::clone(&probe);
        let branch = branch.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let verdict = probe.branch_exists(&branch).await;
            let _ = tx.send((branch, verdict)).await;
        });
    }
    drop(tx);

    let mut all_exist = true;
    let mut usable_results = 0usize;
    let mut last_failure = None;

    while let Some((branch, verdict)) = rx.recv().await {
        match verdict {
            Ok(true) => {
                debug!(%branch, "branch exists");
                usable_results += 1;
            }
            Ok(false) => {
                info!(%branch, "branch does not exist");
                usable_results += 1;
                all_exist = false;
            }
            Err(e) => {
                warn!(%branch, error = %e, "existence check failed, treating branch as missing");
                all_exist = false;
                last_failure = Some(e);
            }
        }
    }

    if usable_results == 0 {
        let detail = last_failure
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no checks completed".to_string());
        return Err(GitError::VerificationUnavailable(detail));
    }

    Ok(all_exist)
}
