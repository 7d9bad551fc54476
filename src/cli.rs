//! Command line interface definition

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// gittty - clone and pull Git repositories with live progress
#[derive(Parser)]
#[command(name = "gittty")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Clone and pull Git repositories with live progress")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Args)]
pub struct GlobalArgs {
    /// Seconds before a git command is killed (0 disables)
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Directory holding the repository registry
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Spinner line instead of progress bars
    #[arg(long, global = true, conflicts_with = "quiet")]
    pub plain: bool,

    /// No progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Debug logging for gittty
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Clone a repository and remember it
    Clone {
        /// Repository URL
        url: String,

        /// Directory to clone into
        destination: PathBuf,

        /// Branch or tag to check out
        #[arg(short, long, value_name = "REF")]
        branch: Option<String>,

        /// Only fetch the latest commit
        #[arg(long)]
        shallow: bool,
    },

    /// Pull a checkout, stashing local changes if needed
    Pull {
        /// Root of the checkout
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Stash local changes without asking
        #[arg(long, conflicts_with = "no_stash")]
        stash: bool,

        /// Abort instead of stashing local changes
        #[arg(long)]
        no_stash: bool,
    },

    /// Manage remembered repositories
    #[command(subcommand)]
    Repos(ReposCommand),
}

/// Registry subcommands
#[derive(Subcommand)]
pub enum ReposCommand {
    /// List remembered repositories
    #[command(alias = "ls")]
    List,

    /// Remember a repository without cloning it
    Add {
        /// Repository URL
        url: String,

        /// Display name (defaults to the last URL segment)
        #[arg(long)]
        name: Option<String>,

        /// Local clone location
        #[arg(long)]
        path: Option<String>,
    },

    /// Forget a repository by its number in `repos list`
    #[command(alias = "rm")]
    Remove {
        /// 1-based entry number
        number: usize,
    },
}
