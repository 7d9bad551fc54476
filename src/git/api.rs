//! Public API for git operations.
//!
//! This module provides the stable public API for repository synchronization:
//! - Clone and pull workflows with dirty-tree reconciliation
//! - External command execution
//! - Progress line parsing and failure classification
//!
//! ## Example: Pulling a checkout
//!
//! ```rust,no_run
//! use gittty::core::SyncConfig;
//! use gittty::git::{is_checkout, NeverStash, SyncEngine};
//! use std::path::Path;
//!
//! async fn pull(path: &Path) {
//!     if is_checkout(path) {
//!         let engine = SyncEngine::from_config(SyncConfig::default());
//!         let outcome = engine.pull(path, &NeverStash).await;
//!         println!("{} {}", outcome.symbol(), outcome.text());
//!     }
//! }
//! ```

// Workflows
pub use super::operations::{clone_args, is_checkout, CloneRequest, SyncEngine};
pub use super::status::SyncOutcome;

// Operator decisions
pub use super::prompt::{AlwaysStash, NeverStash, StashPrompt};

// Command execution
pub use super::runner::{CommandSpec, LineSender, OperationResult, ProcessRunner};

// Parsing and classification
pub use super::errors::{translate_error, ErrorCategory};
pub use super::parser::{parse_progress_line, Phase, ProgressEvent};
