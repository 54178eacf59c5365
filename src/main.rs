//! git-panel - source-control panel queries from the command line
//!
//! # Usage
//! ```bash
//! git-panel status                       # Changed files, staged and unstaged
//! git-panel log --limit 20               # First page of history
//! git-panel log --after <hash> -l 20     # Next page after a cursor
//! git-panel diff src/lib.rs --staged     # Staged diff of one file
//! git-panel --repo ~/project branches    # Branches of another repository
//! ```
//!
//! Every command prints JSON on stdout.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use git_panel::models::CommitFilter;
use git_panel::{GitService, GitignoreFilter};

/// Inspect a git repository the way an editor's source-control panel does
#[derive(Parser)]
#[command(name = "git-panel")]
#[command(about = "Repository status, history and diffs as JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path inside the repository to operate on
    #[arg(short, long, global = true, default_value = ".")]
    repo: PathBuf,

    /// Do not apply .gitignore rules on top of git's own status
    #[arg(long, global = true)]
    no_ignore: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Report whether the path is inside a repository
    IsRepo,
    /// Create a new repository
    Init,
    /// List changed files
    Status,
    /// Stage a file (or its deletion)
    Stage { file: String },
    /// Restore a file's index entry from HEAD
    Unstage { file: String },
    /// Revert a file's working-tree changes
    Discard { file: String },
    /// Commit the staged changes
    Commit {
        #[arg(short, long)]
        message: String,
    },
    /// List local and remote-tracking branches
    Branches,
    /// Print the current branch
    CurrentBranch,
    /// List commits with optional filters and pagination
    Log(LogArgs),
    /// Print the HEAD commit
    Head,
    /// Show the diff of one file
    Diff {
        file: String,
        /// Diff HEAD against the index instead of the index against the working tree
        #[arg(long)]
        staged: bool,
    },
}

#[derive(clap::Args)]
struct LogArgs {
    /// Local branch to start from
    #[arg(short, long)]
    branch: Option<String>,

    /// Commit to start from
    #[arg(long)]
    start: Option<String>,

    /// Page size, 0 for everything
    #[arg(short, long, default_value = "50")]
    limit: usize,

    /// Skip this many matching commits (ignored with --after)
    #[arg(long, default_value = "0")]
    offset: usize,

    /// Continue after this commit hash
    #[arg(long)]
    after: Option<String>,

    /// Substring of author name or email
    #[arg(long)]
    author: Option<String>,

    /// Case-insensitive substring of the message
    #[arg(short, long)]
    search: Option<String>,

    /// Only commits authored at or after this RFC 3339 time
    #[arg(long)]
    since: Option<DateTime<Utc>>,

    /// Only commits authored at or before this RFC 3339 time
    #[arg(long)]
    until: Option<DateTime<Utc>>,
}

impl From<LogArgs> for CommitFilter {
    fn from(args: LogArgs) -> Self {
        CommitFilter {
            branch: args.branch,
            start_hash: args.start,
            limit: args.limit,
            offset: args.offset,
            offset_hash: args.after,
            author: args.author,
            search_query: args.search,
            start_date: args.since,
            end_date: args.until,
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let service = if cli.no_ignore {
        GitService::default()
    } else {
        GitService::new(GitignoreFilter)
    };
    let repo = cli.repo;

    match cli.command {
        Commands::IsRepo => print_json(&service.is_repository(&repo)?),
        Commands::Init => {
            service.init_repository(&repo)?;
            print_json(&repo.display().to_string())
        }
        Commands::Status => print_json(&service.get_status(&repo)?),
        Commands::Stage { file } => print_json(&service.stage_file(&repo, &file)?),
        Commands::Unstage { file } => print_json(&service.unstage_file(&repo, &file)?),
        Commands::Discard { file } => print_json(&service.discard_changes(&repo, &file)?),
        Commands::Commit { message } => print_json(&service.commit(&repo, &message)?),
        Commands::Branches => print_json(&service.list_branches(&repo)?),
        Commands::CurrentBranch => print_json(&service.get_current_branch(&repo)?),
        Commands::Log(args) => {
            let filter = CommitFilter::from(args);
            print_json(&service.list_commits(&repo, &filter)?)
        }
        Commands::Head => print_json(&service.get_head_commit(&repo)?),
        Commands::Diff { file, staged } => print_json(&service.get_file_diff(&repo, &file, staged)?),
    }
}
