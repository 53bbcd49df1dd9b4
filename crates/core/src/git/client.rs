//! Asynchronous git CLI client.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use crate::errors::GitError;

/// Asynchronous client for interacting with a git repository via the CLI.
///
/// Every operation shells out to `git` with piped output; the working
/// directory is fixed at construction time.
#[derive(Debug, Clone)]
pub struct GitClient {
    work_dir: PathBuf,
}

impl GitClient {
    /// Create a client operating on the repository at `work_dir`.
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        let client = Self {
            work_dir: work_dir.into(),
        };
        info!(work_dir = %client.work_dir.display(), "created GitClient");
        client
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Whether `branch` exists locally.
    ///
    /// A scoped list-query must return exactly one matching line; zero or
    /// more than one both mean "not confirmed", so an ambiguous partial
    /// match never counts as existence.
    #[instrument(skip(self))]
    pub async fn branch_exists(&self, branch: &str) -> Result<bool, GitError> {
        let output = self.run_git(&["branch", "--list", branch]).await?;
        let matches = count_branch_lines(&output);
        debug!(branch, matches, "branch existence query");
        Ok(matches == 1)
    }

    /// Fetch the latest refs from origin.
    #[instrument(skip(self))]
    pub async fn fetch_origin(&self) -> Result<(), GitError> {
        self.run_git(&["fetch", "origin"]).await?;
        debug!("fetch completed");
        Ok(())
    }

    /// Switch the working tree to an existing branch.
    #[instrument(skip(self))]
    pub async fn checkout(&self, branch: &str) -> Result<(), GitError> {
        self.run_git(&["checkout", branch]).await?;
        info!(branch, "checked out branch");
        Ok(())
    }

    /// Create `branch` and switch to it.
    #[instrument(skip(self))]
    pub async fn checkout_new_branch(&self, branch: &str) -> Result<(), GitError> {
        self.run_git(&["checkout", "-b", branch]).await?;
        info!(branch, "created and checked out branch");
        Ok(())
    }

    /// Pull the latest changes for the current branch.
    #[instrument(skip(self))]
    pub async fn pull(&self) -> Result<(), GitError> {
        self.run_git(&["pull"]).await?;
        debug!("pull completed");
        Ok(())
    }

    /// Raw `--name-status` diff text between two refs.
    #[instrument(skip(self))]
    pub async fn diff_name_status(&self, base: &str, head: &str) -> Result<String, GitError> {
        self.run_git(&["diff", base, head, "--name-status"]).await
    }

    /// Check out each path from `source` into the working tree.
    #[instrument(skip(self, paths), fields(count = paths.len()))]
    pub async fn checkout_paths_from(
        &self,
        source: &str,
        paths: &[String],
    ) -> Result<(), GitError> {
        for path in paths {
            self.run_git(&["checkout", source, "--", path]).await?;
            debug!(path, source, "checked out path");
        }
        Ok(())
    }

    /// Remove each path from the working tree and the index.
    #[instrument(skip(self, paths), fields(count = paths.len()))]
    pub async fn remove_paths(&self, paths: &[String]) -> Result<(), GitError> {
        for path in paths {
            self.run_git(&["rm", "--", path]).await?;
            debug!(path, "removed path");
        }
        Ok(())
    }

    async fn run_git(&self, args: &[&str]) -> Result<String, GitError> {
        let mut cmd = Command::new("git");
        cmd.current_dir(&self.work_dir)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(cmd = ?format!("git {}", args.join(" ")), "running git command");
        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GitError::BinaryNotFound("git".into())
            } else {
                GitError::IoError(e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            let exit_code = output.status.code().unwrap_or(-1);
            warn!(exit_code, %stderr, "git command failed");
            return Err(GitError::CommandFailed { exit_code, stderr });
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

fn count_branch_lines(output: &str) -> usize {
    output.lines().filter(|l| !l.trim().is_empty()).count()
}
