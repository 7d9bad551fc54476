//! gittty: clone and pull Git repositories with live progress

mod cli;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, GlobalArgs, ReposCommand};
use gittty::commands::clone::handle_clone_command;
use gittty::commands::pull::{handle_pull_command, StashDecision};
use gittty::commands::repos::{handle_add_command, handle_list_command, handle_remove_command};
use gittty::core::config::{DEFAULT_LOG_FILTER, LOG_ENV_VAR, VERBOSE_LOG_FILTER};
use gittty::core::{resolve_timeout, DisplayMode, SyncConfig};
use gittty::git::{CloneRequest, SyncEngine};
use gittty::registry::RepoRegistryStore;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let succeeded = run(cli).await?;
    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<bool> {
    let Cli { command, global } = cli;

    match command {
        Commands::Clone {
            url,
            destination,
            branch,
            shallow,
        } => {
            let store = RepoRegistryStore::open(global.config_dir.clone())?;
            let engine = build_engine(&global);
            let request = CloneRequest::new(url, destination)
                .with_reference(branch)
                .with_shallow(shallow);
            handle_clone_command(&engine, &store, request).await
        }
        Commands::Pull {
            path,
            stash,
            no_stash,
        } => {
            let decision = match (stash, no_stash) {
                (true, _) => StashDecision::Stash,
                (_, true) => StashDecision::Keep,
                _ => StashDecision::Ask,
            };
            let engine = build_engine(&global);
            handle_pull_command(&engine, path, decision).await
        }
        Commands::Repos(repos) => {
            let store = RepoRegistryStore::open(global.config_dir)?;
            match repos {
                ReposCommand::List => handle_list_command(&store),
                ReposCommand::Add { url, name, path } => {
                    handle_add_command(&store, url, name, path)
                }
                ReposCommand::Remove { number } => handle_remove_command(&store, number),
            }
        }
    }
}

fn build_engine(global: &GlobalArgs) -> SyncEngine {
    let display = if global.quiet {
        DisplayMode::Quiet
    } else if global.plain {
        DisplayMode::Plain
    } else {
        DisplayMode::Auto
    };

    let config = SyncConfig::default()
        .with_timeout(resolve_timeout(global.timeout))
        .with_display(display);
    SyncEngine::from_config(config)
}

/// Logs go to stderr so they never mix with command output
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_LOG_FILTER)
    } else {
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
