//! Failure classification for version control commands

/// Category of a failed external command
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Remote does not exist or is not visible to the caller
    RepositoryNotFound,
    /// Credentials were rejected
    AuthenticationFailed,
    /// SSH key was rejected by the remote
    SshPermissionDenied,
    /// Host name could not be resolved
    DnsResolutionFailed,
    /// Pull would overwrite uncommitted local changes
    WorkingTreeWouldBeOverwritten,
    /// Target directory is not a checkout
    NotAGitRepository,
    /// Clone destination already has content
    DestinationNotEmpty,
    /// The version control executable could not be started
    ToolingMissing,
    /// The command exceeded its maximum duration
    TimedOut,
    /// Anything else
    Unknown,
}

impl ErrorCategory {
    /// Returns the emoji symbol for this category
    pub fn symbol(&self) -> &str {
        match self {
            ErrorCategory::WorkingTreeWouldBeOverwritten | ErrorCategory::DestinationNotEmpty => {
                "🟠"
            }
            ErrorCategory::TimedOut => "🟡",
            _ => "🔴",
        }
    }

    /// Returns the text representation of this category
    pub fn text(&self) -> &str {
        match self {
            ErrorCategory::RepositoryNotFound => "repository-not-found",
            ErrorCategory::AuthenticationFailed => "authentication-failed",
            ErrorCategory::SshPermissionDenied => "ssh-permission-denied",
            ErrorCategory::DnsResolutionFailed => "dns-resolution-failed",
            ErrorCategory::WorkingTreeWouldBeOverwritten => "worktree-would-be-overwritten",
            ErrorCategory::NotAGitRepository => "not-a-git-repository",
            ErrorCategory::DestinationNotEmpty => "destination-not-empty",
            ErrorCategory::ToolingMissing => "tooling-missing",
            ErrorCategory::TimedOut => "timed-out",
            ErrorCategory::Unknown => "unknown",
        }
    }
}

/// Ordered matching rules: (lowercase needle, category, remediation)
///
/// First match wins, so the order here is part of the contract.
const RULES: &[(&str, ErrorCategory, &str)] = &[
    (
        "repository not found",
        ErrorCategory::RepositoryNotFound,
        "The repository was not found. Check the URL for typos and make sure you have access to it.",
    ),
    (
        "authentication failed",
        ErrorCategory::AuthenticationFailed,
        "Authentication failed. Check your username and password or personal access token.",
    ),
    (
        "permission denied (publickey)",
        ErrorCategory::SshPermissionDenied,
        "SSH key was rejected. Make sure your public key is added to the hosting service and loaded in your ssh-agent.",
    ),
    (
        "could not resolve host",
        ErrorCategory::DnsResolutionFailed,
        "Could not resolve the host. Check your network connection and the host name in the URL.",
    ),
    (
        "local changes to the following files would be overwritten by merge",
        ErrorCategory::WorkingTreeWouldBeOverwritten,
        "Your local changes would be overwritten. Commit or stash them before pulling.",
    ),
    (
        "not a git repository",
        ErrorCategory::NotAGitRepository,
        "The directory is not a Git repository. Choose the root of an existing clone.",
    ),
    (
        "already exists and is not an empty directory",
        ErrorCategory::DestinationNotEmpty,
        "The destination already exists and is not empty. Choose another path or remove its contents.",
    ),
];

/// Classifies raw stderr text into a category plus remediation text
///
/// Matching is a case-insensitive substring search over [`RULES`]. Text that
/// matches nothing is returned unchanged as the remediation of `Unknown`.
pub fn translate_error(stderr: &str) -> (ErrorCategory, String) {
    let haystack = stderr.to_lowercase();

    RULES
        .iter()
        .find(|(needle, _, _)| haystack.contains(needle))
        .map(|(_, category, remediation)| (*category, (*remediation).to_string()))
        .unwrap_or_else(|| (ErrorCategory::Unknown, stderr.to_string()))
}

/// Remediation for failures detected by the runner rather than from stderr
pub fn remediation_for(category: ErrorCategory, detail: &str) -> String {
    match category {
        ErrorCategory::ToolingMissing => format!(
            "Could not start '{detail}'. Make sure Git is installed and available in your PATH."
        ),
        ErrorCategory::TimedOut => {
            format!("The operation timed out after {detail}. Try again or raise the timeout.")
        }
        _ => RULES
            .iter()
            .find(|(_, rule_category, _)| *rule_category == category)
            .map(|(_, _, remediation)| (*remediation).to_string())
            .unwrap_or_else(|| detail.to_string()),
    }
}
