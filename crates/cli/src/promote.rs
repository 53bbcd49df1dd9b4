//! The promotion sequence: fetch, verify, diff, curate, replay.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::info;

use gitpromote_core::select::DiffSource;
use gitpromote_core::verify::verify_branches;
use gitpromote_core::{
    parse_name_status, ChangeAction, EditorBridge, GitClient, Outcome, SelectionEngine,
};

use crate::prompt::TerminalPrompt;
use crate::style;

/// Branch triple driving one promotion run.
pub struct PromotePlan {
    pub source: String,
    pub target: String,
    pub default_branch: String,
}

impl PromotePlan {
    /// Name of the branch the curated changes land on.
    pub fn feature_branch(&self) -> String {
        format!("{}-{}", self.source, self.target)
    }
}

/// Run a full promotion in the repository at the current directory.
pub async fn run(plan: PromotePlan) -> Result<()> {
    let feature = plan.feature_branch();
    println!(
        "{}",
        style::header(&format!(
            "Promoting {} into {} via {}, based on {}",
            plan.source, plan.target, feature, plan.default_branch
        ))
    );

    let work_dir = std::env::current_dir().context("failed to resolve current directory")?;
    let client = GitClient::new(work_dir);

    println!("Fetching origin...");
    client
        .fetch_origin()
        .await
        .context("failed to fetch origin")?;

    let branches = vec![
        plan.source.clone(),
        plan.target.clone(),
        plan.default_branch.clone(),
    ];
    let all_exist = verify_branches(Arc::new(client.clone()), &branches)
        .await
        .context("failed to verify branches")?;
    if !all_exist {
        bail!(
            "not all of '{}', '{}', '{}' exist as local branches",
            plan.source,
            plan.target,
            plan.default_branch
        );
    }

    move_and_pull(&client, &plan.default_branch).await?;

    let raw = client
        .diff_name_status(&plan.default_branch, &plan.source)
        .await
        .context("failed to diff source against default branch")?;
    let changes = parse_name_status(&raw).context("failed to classify diff output")?;

    if changes.is_empty() {
        println!(
            "There are no differences between {} and {}, exiting",
            plan.default_branch, plan.source
        );
        return Ok(());
    }
    info!(
        modified = changes.modified().len(),
        deleted = changes.deleted().len(),
        "classified change set"
    );

    let editor = EditorBridge::from_env();
    let reset_source = DiffSource::new(client.clone(), &plan.default_branch, &plan.source);
    let mut prompt = TerminalPrompt::new(changes.clone());

    let outcome = SelectionEngine::new(&mut prompt, &editor)
        .with_change_source(&reset_source)
        .run(changes.all_paths())
        .await
        .context("curation failed")?;

    let approved = match outcome {
        Outcome::Aborted => {
            println!("{}", style::warn("Promotion aborted, nothing was changed."));
            return Ok(());
        }
        Outcome::Confirmed(list) => list,
    };

    move_and_pull(&client, &plan.target).await?;

    if client
        .branch_exists(&feature)
        .await
        .context("failed to check feature branch")?
    {
        println!("Branch '{feature}' already exists.");
        client
            .checkout(&feature)
            .await
            .context("failed to check out feature branch")?;
    } else {
        client
            .checkout_new_branch(&feature)
            .await
            .context("failed to create feature branch")?;
        println!("Created and checked out branch '{feature}'.");
    }

    // Replay the approved subset: carry modified paths over from the
    // source ref, remove deleted ones.
    let (to_checkout, to_remove): (Vec<String>, Vec<String>) = approved
        .into_iter()
        .partition(|p| changes.action_of(p) != Some(ChangeAction::Deleted));

    client
        .checkout_paths_from(&plan.source, &to_checkout)
        .await
        .context("failed to check out approved files")?;
    client
        .remove_paths(&to_remove)
        .await
        .context("failed to remove approved deletions")?;

    println!();
    println!(
        "{}",
        style::success(&format!(
            "Promotion completed: {} file(s) carried over, {} removed.",
            to_checkout.len(),
            to_remove.len()
        ))
    );
    println!(
        "{}",
        style::dim(
            "Check each carried file for completeness: changes interleaved by other \
             commits to the same files are not resolved by this tool and must be \
             handled manually.",
        )
    );
    Ok(())
}

async fn move_and_pull(client: &GitClient, branch: &str) -> Result<()> {
    println!("Moving to {branch}");
    client
        .checkout(branch)
        .await
        .with_context(|| format!("failed to check out '{branch}'"))?;
    client
        .pull()
        .await
        .with_context(|| format!("failed to pull latest '{branch}'"))?;
    Ok(())
}
