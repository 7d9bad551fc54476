//! Operator decision seam for dirty working trees

use async_trait::async_trait;
use std::path::Path;

/// Asks whether uncommitted changes may be stashed before a pull
#[async_trait]
pub trait StashPrompt: Send + Sync {
    /// `changes` is the porcelain status output that made the tree dirty
    async fn confirm_stash(&self, repo_path: &Path, changes: &str) -> bool;
}

/// Always stashes without asking
pub struct AlwaysStash;

#[async_trait]
impl StashPrompt for AlwaysStash {
    async fn confirm_stash(&self, _repo_path: &Path, _changes: &str) -> bool {
        true
    }
}

/// Never stashes; a dirty tree aborts the pull
pub struct NeverStash;

#[async_trait]
impl StashPrompt for NeverStash {
    async fn confirm_stash(&self, _repo_path: &Path, _changes: &str) -> bool {
        false
    }
}
