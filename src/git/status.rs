//! Sync outcome enumeration and utilities

use super::errors::ErrorCategory;

/// Result of a full clone or pull workflow
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Clone finished successfully
    Cloned,
    /// Pull finished successfully, any stash was restored
    Pulled,
    /// Pull succeeded but the stash taken before it could not be restored
    SucceededWithWarning { warning: String },
    /// Working tree was dirty and the operator declined to stash
    PullAbortedDirty,
    /// The workflow failed
    Failed {
        category: ErrorCategory,
        message: String,
    },
}

impl SyncOutcome {
    pub fn failed(category: ErrorCategory, message: impl Into<String>) -> Self {
        SyncOutcome::Failed {
            category,
            message: message.into(),
        }
    }

    /// True when the requested clone or pull happened
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            SyncOutcome::Cloned | SyncOutcome::Pulled | SyncOutcome::SucceededWithWarning { .. }
        )
    }

    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            SyncOutcome::Failed { category, .. } => Some(*category),
            _ => None,
        }
    }

    /// Returns the emoji symbol for this outcome
    pub fn symbol(&self) -> &str {
        match self {
            SyncOutcome::Cloned | SyncOutcome::Pulled => "🟢",
            SyncOutcome::SucceededWithWarning { .. } => "🟡",
            SyncOutcome::PullAbortedDirty => "🟠",
            SyncOutcome::Failed { .. } => "🔴",
        }
    }

    /// Returns the text representation of this outcome
    pub fn text(&self) -> &str {
        match self {
            SyncOutcome::Cloned => "cloned",
            SyncOutcome::Pulled => "pulled",
            SyncOutcome::SucceededWithWarning { .. } => "pulled-with-warning",
            SyncOutcome::PullAbortedDirty => "aborted",
            SyncOutcome::Failed { .. } => "failed",
        }
    }

    /// Detail line for the operator, if the outcome carries one
    pub fn detail(&self) -> Option<&str> {
        match self {
            SyncOutcome::SucceededWithWarning { warning } => Some(warning),
            SyncOutcome::Failed { message, .. } => Some(message),
            _ => None,
        }
    }
}
