//! Public API for the core module.
//!
//! This module provides the stable public API for core functionality including:
//! - Sync configuration and its resolution from flags and environment
//! - Progress reporting and display renderers
//!
//! Internal implementation details are not exposed through this API.

// Configuration
pub use super::config::{resolve_config_dir, resolve_timeout, DisplayMode, SyncConfig};

// Progress reporting
pub use super::sync::{
    renderer_for, BarRenderer, LineRenderer, ProgressRenderer, ProgressReporter, ProgressState,
    ProgressSurface, ProgressUpdate, QuietRenderer,
};

// Terminal utilities (re-exported from utils)
pub use crate::utils::{set_terminal_title, set_terminal_title_and_flush};
