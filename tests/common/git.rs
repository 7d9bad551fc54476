//! Git testing utilities

use anyhow::Result;
use std::path::Path;
use std::process::Command;

fn git(path: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git").args(args).current_dir(path).output()?;

    if !output.status.success() {
        anyhow::bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Sets up user config so commits and stashes work without a global identity
pub fn configure_user(path: &Path) -> Result<()> {
    git(path, &["config", "user.name", "Test User"])?;
    git(path, &["config", "user.email", "test@example.com"])?;

    // Disable commit signing for tests
    git(path, &["config", "commit.gpgsign", "false"])?;
    Ok(())
}

/// Sets up a git repository with user config
/// Returns Err if git is not available
pub fn setup_git_repo(path: &Path) -> Result<()> {
    let init_result = Command::new("git")
        .args(["init"])
        .current_dir(path)
        .output()?;

    if !init_result.status.success() {
        anyhow::bail!("Git not available - skipping test");
    }

    configure_user(path)
}

/// Creates a test commit in the repository
pub fn create_test_commit(
    path: &Path,
    file_name: &str,
    content: &str,
    message: &str,
) -> Result<()> {
    std::fs::write(path.join(file_name), content)?;
    git(path, &["add", file_name])?;
    git(path, &["commit", "-m", message])?;
    Ok(())
}

/// Clones `upstream` into `destination` with plain git and configures the user
pub fn clone_checkout(upstream: &Path, destination: &Path) -> Result<()> {
    let parent = destination
        .parent()
        .ok_or_else(|| anyhow::anyhow!("destination has no parent"))?;
    let upstream = upstream.to_string_lossy();
    let destination_arg = destination.to_string_lossy();
    git(parent, &["clone", &upstream, &destination_arg])?;
    configure_user(destination)
}

pub fn head_commit(path: &Path) -> Result<String> {
    git(path, &["rev-parse", "HEAD"])
}

pub fn current_branch(path: &Path) -> Result<String> {
    git(path, &["rev-parse", "--abbrev-ref", "HEAD"])
}

/// Creates and checks out a new branch
pub fn create_branch(path: &Path, branch: &str) -> Result<()> {
    git(path, &["checkout", "-b", branch])?;
    Ok(())
}

pub fn checkout(path: &Path, branch: &str) -> Result<()> {
    git(path, &["checkout", branch])?;
    Ok(())
}

/// Number of stash entries
pub fn stash_count(path: &Path) -> Result<usize> {
    Ok(git(path, &["stash", "list"])?.lines().count())
}

/// Stashes tracked changes under `message`, as an operator would by hand
pub fn stash_push(path: &Path, message: &str) -> Result<()> {
    git(path, &["stash", "push", "-m", message])?;
    Ok(())
}

pub fn remove_remote(path: &Path, remote_name: &str) -> Result<()> {
    git(path, &["remote", "remove", remote_name])?;
    Ok(())
}

/// Checks if git is available in the system
pub fn is_git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}
