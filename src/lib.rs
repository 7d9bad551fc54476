//! # gittty
//!
//! `gittty` clones and pulls Git repositories by driving the `git` executable,
//! showing live progress while it runs and turning its failures into
//! categorized, human-readable messages.
//!
//! ## Core Features
//!
//! - **Process Runner**: Spawns commands with concurrent pipe draining and an optional timeout.
//! - **Progress**: Parses git progress lines into phase-weighted bars with a spinner fallback.
//! - **Error Translation**: Maps raw stderr onto a fixed set of failure categories.
//! - **Sync Engine**: Clone, and pull with stash and restore of local changes.
//! - **Registry**: A JSON list of known repositories with legacy migration.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gittty::core::SyncConfig;
//! use gittty::git::{CloneRequest, SyncEngine};
//!
//! #[tokio::main]
//! async fn main() {
//!     let engine = SyncEngine::from_config(SyncConfig::default());
//!     let request = CloneRequest::new("https://example.com/project.git", "project");
//!     let outcome = engine.clone_repository(&request).await;
//!     println!("{} {}", outcome.symbol(), outcome.text());
//! }
//! ```

pub mod commands;
pub mod core;
pub mod git;
pub mod registry;
pub mod utils;
