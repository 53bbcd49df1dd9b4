//! gitpromote command-line tool.
//!
//! Promotes a curated subset of file changes from a source branch onto a
//! fresh feature branch off a target branch. The operator reviews the
//! change set interactively before anything touches the working tree.

mod promote;
mod prompt;
mod style;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use promote::PromotePlan;

/// Promote a curated subset of file changes between git branches.
#[derive(Parser, Debug)]
#[command(name = "gitpromote", version)]
struct Cli {
    /// Target branch to merge into.
    #[arg(short = 't', long = "target")]
    target: Option<String>,

    /// Source branch which has the staged changes.
    #[arg(short = 's', long = "source")]
    source: Option<String>,

    /// Default branch the source branch was originally branched off of.
    #[arg(short = 'd', long = "default-branch", default_value = "main")]
    default_branch: String,
}

const USAGE_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    // Minimal logging for the CLI; operator-facing output goes to stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("warn"))
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    match (cli.target, cli.source) {
        (None, None) => {
            println!("gitpromote v{}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Promote a curated subset of file changes between git branches.");
            println!("Run with -t <target> -s <source>, or --help for details.");
            ExitCode::SUCCESS
        }
        (Some(target), Some(source)) => {
            let plan = PromotePlan {
                source,
                target,
                default_branch: cli.default_branch,
            };
            match promote::run(plan).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("{}", style::error(&format!("Error: {e:#}")));
                    ExitCode::FAILURE
                }
            }
        }
        _ => {
            eprintln!("Please specify both a target and a source branch using -t and -s");
            ExitCode::from(USAGE_ERROR)
        }
    }
}
