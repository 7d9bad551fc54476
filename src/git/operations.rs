//! Clone and pull workflows over the external version control tool

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::errors::{translate_error, ErrorCategory};
use super::prompt::StashPrompt;
use super::runner::{CommandSpec, OperationResult, ProcessRunner};
use super::status::SyncOutcome;
use crate::core::config::{SyncConfig, STASH_TAG};
use crate::core::sync::{renderer_for, ProgressRenderer, ProgressReporter};

// Git command arguments
const GIT_CLONE_ARGS: &[&str] = &["clone"];
const GIT_PULL_ARGS: &[&str] = &["pull"];
const GIT_STATUS_PORCELAIN_ARGS: &[&str] = &["status", "--porcelain"];
const GIT_STASH_PUSH_ARGS: &[&str] = &["stash", "push", "-m", STASH_TAG];
const GIT_STASH_POP_ARGS: &[&str] = &["stash", "pop"];
const GIT_STASH_TOP_ARGS: &[&str] = &["rev-parse", "-q", "--verify", "refs/stash"];

// Metadata directory that marks a checkout root
const CHECKOUT_MARKER: &str = ".git";

/// Parameters of one clone, already validated by the caller
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CloneRequest {
    pub url: String,
    pub destination: PathBuf,
    /// Branch or tag to check out instead of the remote HEAD
    pub reference: Option<String>,
    /// Truncate history to depth 1
    pub shallow: bool,
}

impl CloneRequest {
    pub fn new(url: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            destination: destination.into(),
            reference: None,
            shallow: false,
        }
    }

    pub fn with_reference(mut self, reference: Option<String>) -> Self {
        self.reference = reference.filter(|r| !r.trim().is_empty());
        self
    }

    pub fn with_shallow(mut self, shallow: bool) -> Self {
        self.shallow = shallow;
        self
    }
}

/// Builds the clone arguments in their fixed order
///
/// `clone [--branch <ref>] [--depth 1] <url> <destination>`
pub fn clone_args(request: &CloneRequest) -> Vec<String> {
    let mut args: Vec<String> = GIT_CLONE_ARGS.iter().map(|a| a.to_string()).collect();
    if let Some(reference) = &request.reference {
        args.push("--branch".to_string());
        args.push(reference.clone());
    }
    if request.shallow {
        args.push("--depth".to_string());
        args.push("1".to_string());
    }
    args.push(request.url.clone());
    args.push(request.destination.to_string_lossy().into_owned());
    args
}

/// Checks whether a directory is the root of a checkout
pub fn is_checkout(path: &Path) -> bool {
    path.join(CHECKOUT_MARKER).exists()
}

/// Steps of the pull workflow
#[derive(Debug)]
enum PullState {
    CheckDirty,
    AwaitDecision { changes: String },
    Stashing,
    Running { stashed: bool },
    Popping,
    Done(SyncOutcome),
}

impl PullState {
    fn name(&self) -> &'static str {
        match self {
            PullState::CheckDirty => "check-dirty",
            PullState::AwaitDecision { .. } => "await-decision",
            PullState::Stashing => "stashing",
            PullState::Running { .. } => "running",
            PullState::Popping => "popping",
            PullState::Done(_) => "done",
        }
    }
}

/// Runs clone and pull workflows and reports their outcome
pub struct SyncEngine {
    config: SyncConfig,
    runner: ProcessRunner,
    renderer: Arc<dyn ProgressRenderer>,
}

impl SyncEngine {
    pub fn new(config: SyncConfig, renderer: Arc<dyn ProgressRenderer>) -> Self {
        let runner = ProcessRunner::new(config.timeout);
        Self {
            config,
            runner,
            renderer,
        }
    }

    /// Builds an engine with the renderer matching the configured display mode
    pub fn from_config(config: SyncConfig) -> Self {
        let renderer = renderer_for(config.display);
        Self::new(config, renderer)
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Clones a repository into `request.destination`
    ///
    /// Whether the destination is usable is the caller's concern; a non-empty
    /// destination surfaces as `DestinationNotEmpty`.
    pub async fn clone_repository(&self, request: &CloneRequest) -> SyncOutcome {
        guarded(self.clone_workflow(request)).await
    }

    /// Pulls a checkout, reconciling a dirty working tree through `prompt`
    pub async fn pull(&self, repo_path: &Path, prompt: &dyn StashPrompt) -> SyncOutcome {
        guarded(self.pull_workflow(repo_path, prompt)).await
    }

    async fn clone_workflow(&self, request: &CloneRequest) -> SyncOutcome {
        info!("cloning {} into {}", request.url, request.destination.display());
        let spec = CommandSpec::new(&self.config.program, ".").args(clone_args(request));
        let result = self
            .run_with_progress(&spec, &format!("cloning {}", request.url))
            .await;

        if result.success {
            SyncOutcome::Cloned
        } else {
            failure_from(&result)
        }
    }

    async fn pull_workflow(&self, repo_path: &Path, prompt: &dyn StashPrompt) -> SyncOutcome {
        info!("pulling {}", repo_path.display());
        let mut state = PullState::CheckDirty;

        loop {
            debug!("pull {}: {}", repo_path.display(), state.name());
            state = match state {
                PullState::CheckDirty => {
                    let status = self.run_quiet(repo_path, GIT_STATUS_PORCELAIN_ARGS).await;
                    if !status.success {
                        PullState::Done(failure_from(&status))
                    } else if status.stdout.trim().is_empty() {
                        PullState::Running { stashed: false }
                    } else {
                        PullState::AwaitDecision {
                            changes: status.stdout,
                        }
                    }
                }
                PullState::AwaitDecision { changes } => {
                    if prompt.confirm_stash(repo_path, &changes).await {
                        PullState::Stashing
                    } else {
                        PullState::Done(SyncOutcome::PullAbortedDirty)
                    }
                }
                PullState::Stashing => {
                    // Only untracked files leaves the stash ref where it was
                    let before = self.stash_top(repo_path).await;
                    let stash = self.run_quiet(repo_path, GIT_STASH_PUSH_ARGS).await;
                    if !stash.success {
                        PullState::Done(with_message_prefix(
                            failure_from(&stash),
                            "Could not stash local changes",
                        ))
                    } else {
                        let after = self.stash_top(repo_path).await;
                        let stashed = after.is_some() && after != before;
                        if !stashed {
                            debug!("nothing tracked to stash in {}", repo_path.display());
                        }
                        PullState::Running { stashed }
                    }
                }
                PullState::Running { stashed } => {
                    let spec = CommandSpec::new(&self.config.program, repo_path)
                        .args(GIT_PULL_ARGS.iter().copied());
                    let result = self.run_with_progress(&spec, "pulling").await;
                    match (result.success, stashed) {
                        (true, true) => PullState::Popping,
                        (true, false) => PullState::Done(SyncOutcome::Pulled),
                        (false, true) => {
                            warn!("pull failed with changes stashed in {}", repo_path.display());
                            PullState::Done(with_stash_note(failure_from(&result)))
                        }
                        (false, false) => PullState::Done(failure_from(&result)),
                    }
                }
                PullState::Popping => {
                    let pop = self.run_quiet(repo_path, GIT_STASH_POP_ARGS).await;
                    if pop.success {
                        PullState::Done(SyncOutcome::Pulled)
                    } else {
                        warn!("stash pop failed in {}", repo_path.display());
                        PullState::Done(SyncOutcome::SucceededWithWarning {
                            warning: pop_warning(&pop),
                        })
                    }
                }
                PullState::Done(outcome) => return outcome,
            };
        }
    }

    async fn run_quiet(&self, repo_path: &Path, args: &[&str]) -> OperationResult {
        let spec = CommandSpec::new(&self.config.program, repo_path).args(args.iter().copied());
        self.runner.run(&spec, None).await
    }

    /// Commit id of the newest stash entry, if any
    async fn stash_top(&self, repo_path: &Path) -> Option<String> {
        let top = self.run_quiet(repo_path, GIT_STASH_TOP_ARGS).await;
        let id = top.stdout.trim();
        (top.success && !id.is_empty()).then(|| id.to_string())
    }

    async fn run_with_progress(&self, spec: &CommandSpec, label: &str) -> OperationResult {
        let reporter = ProgressReporter::start(Arc::clone(&self.renderer), label);
        let result = self.runner.run(spec, Some(reporter.sender())).await;
        reporter.finish().await;
        result
    }
}

/// Runs a workflow, turning a panic into an `Unknown` failure
async fn guarded<F>(workflow: F) -> SyncOutcome
where
    F: std::future::Future<Output = SyncOutcome>,
{
    match AssertUnwindSafe(workflow).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!("sync operation aborted unexpectedly: {message}");
            SyncOutcome::failed(ErrorCategory::Unknown, message)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "internal error".to_string()
    }
}

/// Converts a failed command into a failed outcome
fn failure_from(result: &OperationResult) -> SyncOutcome {
    if let Some(category) = result.error_category {
        return SyncOutcome::failed(category, result.stderr.clone());
    }

    let (category, message) = translate_error(&result.stderr);
    let message = if message.trim().is_empty() {
        format!("command exited with code {}", result.exit_code)
    } else {
        message
    };
    SyncOutcome::failed(category, message)
}

fn with_message_prefix(outcome: SyncOutcome, prefix: &str) -> SyncOutcome {
    match outcome {
        SyncOutcome::Failed { category, message } => SyncOutcome::Failed {
            category,
            message: format!("{prefix}: {message}"),
        },
        other => other,
    }
}

fn with_stash_note(outcome: SyncOutcome) -> SyncOutcome {
    match outcome {
        SyncOutcome::Failed { category, message } => SyncOutcome::Failed {
            category,
            message: format!(
                "{message}\nYour local changes are still stashed as \"{STASH_TAG}\"; restore them with `git stash pop`."
            ),
        },
        other => other,
    }
}

fn pop_warning(pop: &OperationResult) -> String {
    let detail = pop.stderr.trim();
    let detail = if detail.is_empty() { pop.stdout.trim() } else { detail };
    format!(
        "Pulled, but restoring your stashed changes failed: {detail}\nThe stash \"{STASH_TAG}\" is still present; resolve it with `git stash list` and `git stash pop`."
    )
}
