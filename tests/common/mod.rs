//! Common test utilities and helpers
#![allow(dead_code, unused_imports)]

pub mod git;

pub use self::git::{
    clone_checkout, create_test_commit, current_branch, head_commit, is_git_available,
    setup_git_repo,
};

use std::sync::OnceLock;
use std::sync::{Mutex, MutexGuard};

static TEST_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

/// Acquires a global lock for tests that modify process-wide state (like env vars)
pub fn lock_test() -> MutexGuard<'static, ()> {
    TEST_MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
