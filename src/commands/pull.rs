//! Pull command implementation
//!
//! Pulls one checkout. A dirty working tree is stashed and restored around
//! the pull when the operator agrees.

use anyhow::Result;
use async_trait::async_trait;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::print_outcome;
use crate::core::{set_terminal_title, set_terminal_title_and_flush};
use crate::git::{is_checkout, AlwaysStash, NeverStash, StashPrompt, SyncEngine, SyncOutcome};

// Porcelain lines shown before asking
const MAX_CHANGES_SHOWN: usize = 10;

/// How a dirty working tree is handled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StashDecision {
    /// Ask on the terminal
    Ask,
    /// Stash without asking
    Stash,
    /// Abort the pull without asking
    Keep,
}

/// Asks the operator on stdin
pub struct TerminalPrompt;

#[async_trait]
impl StashPrompt for TerminalPrompt {
    async fn confirm_stash(&self, repo_path: &Path, changes: &str) -> bool {
        let repo_path = repo_path.to_path_buf();
        let changes = changes.to_string();
        tokio::task::spawn_blocking(move || ask_to_stash(&repo_path, &changes))
            .await
            .unwrap_or(false)
    }
}

fn ask_to_stash(repo_path: &Path, changes: &str) -> bool {
    println!("\n⚠️  Uncommitted changes in {}:", repo_path.display());
    let lines: Vec<&str> = changes.lines().collect();
    for line in lines.iter().take(MAX_CHANGES_SHOWN) {
        println!("   {line}");
    }
    if lines.len() > MAX_CHANGES_SHOWN {
        println!("   ... and {} more", lines.len() - MAX_CHANGES_SHOWN);
    }

    print!("Stash them, pull, and restore them afterwards? (y/n): ");
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(_) => input.trim().eq_ignore_ascii_case("y"),
        Err(_) => false,
    }
}

/// Handles the pull command
///
/// Returns whether the pull happened.
pub async fn handle_pull_command(
    engine: &SyncEngine,
    path: PathBuf,
    decision: StashDecision,
) -> Result<bool> {
    if !is_checkout(&path) {
        println!(
            "🔴 {} is not the root of a Git checkout",
            path.display()
        );
        return Ok(false);
    }

    set_terminal_title("🚀 gittty");

    let prompt: Box<dyn StashPrompt> = match decision {
        StashDecision::Ask => Box::new(TerminalPrompt),
        StashDecision::Stash => Box::new(AlwaysStash),
        StashDecision::Keep => Box::new(NeverStash),
    };

    let outcome = engine.pull(&path, prompt.as_ref()).await;
    print_outcome(&path.display().to_string(), &outcome);
    if outcome == SyncOutcome::PullAbortedDirty {
        println!("   Nothing was pulled. Commit or stash your changes, or run again with --stash.");
    }

    set_terminal_title_and_flush("✅ gittty");
    Ok(outcome.is_success())
}
