//! Clone command implementation
//!
//! Clones one repository and remembers it in the registry on success.

use anyhow::Result;

use super::print_outcome;
use crate::core::{set_terminal_title, set_terminal_title_and_flush};
use crate::git::{CloneRequest, SyncEngine};
use crate::registry::{RepoRecord, RepoRegistryStore};
use crate::utils::absolute_path;

/// Handles the clone command
///
/// Returns whether the clone succeeded. Failing to record the clone in the
/// registry is reported but does not fail the command.
pub async fn handle_clone_command(
    engine: &SyncEngine,
    store: &RepoRegistryStore,
    request: CloneRequest,
) -> Result<bool> {
    set_terminal_title("🚀 gittty");

    println!(
        "Cloning '{}' into '{}'...",
        request.url,
        request.destination.display()
    );
    let outcome = engine.clone_repository(&request).await;
    print_outcome(&request.url, &outcome);

    if outcome.is_success() {
        let path = absolute_path(&request.destination)
            .to_string_lossy()
            .into_owned();
        if let Err(e) = store.add(RepoRecord::from_url(request.url.clone(), Some(path))) {
            eprintln!("⚠️  Cloned, but could not remember the repository: {e:#}");
        }
    }

    set_terminal_title_and_flush("✅ gittty");
    Ok(outcome.is_success())
}
