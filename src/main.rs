//! merge-gate - merge eligibility gate for GitHub and Gitee pull requests

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use cli::check::{CheckOptions, run_check};
use cli::context::{CommandContext, RepoArgs};
use cli::event::run_event;
use merge_gate::gate::ReviewEvent;
use merge_gate::types::Platform;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// merge-gate - merge eligibility gate for pull requests
#[derive(Parser, Debug)]
#[command(name = "merge-gate")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Repository as owner/repo
    #[arg(short, long, global = true, default_value = "")]
    repo: String,

    /// Hosting platform
    #[arg(long, global = true, value_enum, default_value_t = PlatformArg::Github)]
    platform: PlatformArg,

    /// Self-hosted platform host
    #[arg(long, global = true)]
    host: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PlatformArg {
    Github,
    Gitee,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Github => Self::GitHub,
            PlatformArg::Gitee => Self::Gitee,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a PR and merge it if every condition holds
    Check {
        /// PR number
        pr: u64,

        /// Login the merge is evaluated for (branch-freeze exemption)
        #[arg(long)]
        actor: String,

        /// Report the decision without commenting or merging
        #[arg(long)]
        dry_run: bool,
    },

    /// Handle a PR comment containing gate commands
    Comment {
        /// PR number
        pr: u64,

        /// Login of the commenter
        #[arg(long)]
        author: String,

        /// Comment body
        #[arg(long)]
        body: String,
    },

    /// Strip review labels after new commits were pushed
    Reconcile {
        /// PR number
        pr: u64,

        /// Update action reported by the platform
        #[arg(long, default_value = "source_branch_changed")]
        action_desc: String,
    },

    /// Handle a newly opened PR
    Opened {
        /// PR number
        pr: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let repo = RepoArgs {
        repo: &cli.repo,
        platform: cli.platform.into(),
        host: cli.host.as_deref(),
    };
    let ctx = CommandContext::new(cli.config.as_deref(), &repo)?;

    match cli.command {
        Commands::Check { pr, actor, dry_run } => {
            run_check(&ctx, pr, &actor, CheckOptions { dry_run }).await?;
        }
        Commands::Comment { pr, author, body } => {
            run_event(
                &ctx,
                ReviewEvent::CommentAdded {
                    pr_number: pr,
                    commenter: author,
                    body,
                },
            )
            .await?;
        }
        Commands::Reconcile { pr, action_desc } => {
            run_event(
                &ctx,
                ReviewEvent::PullRequestUpdated {
                    pr_number: pr,
                    action_desc,
                },
            )
            .await?;
        }
        Commands::Opened { pr } => {
            run_event(&ctx, ReviewEvent::PullRequestOpened { pr_number: pr }).await?;
        }
    }

    Ok(())
}
