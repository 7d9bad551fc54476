//! Configuration constants and settings

use std::path::PathBuf;
use std::time::Duration;

// Version control program invoked for every operation
pub const VCS_PROGRAM: &str = "git";

// Timeout configuration
//
// No timeout is applied unless the operator asks for one. Clones of large
// repositories over slow links routinely take many minutes.
pub const TIMEOUT_ENV_VAR: &str = "GITTTY_TIMEOUT_SECS";

// Registry location
pub const CONFIG_DIR_ENV_VAR: &str = "GITTTY_CONFIG_DIR";
pub const CONFIG_DIR_RELATIVE: &str = ".config/gittty";
pub const REGISTRY_FILE_NAME: &str = "repos.json";
pub const LEGACY_REGISTRY_FILE_NAME: &str = "frequent_repos.txt";
pub const BACKUP_SUFFIX: &str = ".bak";

// Logging
pub const LOG_ENV_VAR: &str = "GITTTY_LOG";
pub const DEFAULT_LOG_FILTER: &str = "warn";
pub const VERBOSE_LOG_FILTER: &str = "warn,gittty=debug";

// Stash tag used to recognise entries created by a pull
pub const STASH_TAG: &str = "gittty: auto-stash before pull";

// Progress bar configuration
pub const DEFAULT_PROGRESS_BAR_LENGTH: u64 = 100;
pub const RECEIVING_SHARE: u64 = 90; // Receiving fills 0..=90
pub const RESOLVING_SHARE: u64 = 10; // Resolving fills 90..=100
pub const SPINNER_TICK: Duration = Duration::from_millis(100);
pub const SPINNER_FRAMES: &[char] = &['|', '/', '-', '\\'];
pub const PROGRESS_CHARS: &str = "##-";
pub const PROGRESS_TEMPLATE: &str = "{prefix:.bold} [{bar:30}] {pos:>3}% {wide_msg}";
pub const SPINNER_TEMPLATE: &str = "{prefix:.bold} {wide_msg}";

// Read buffer for child process pipes
pub const READ_CHUNK_SIZE: usize = 4096;

// Display formatting constants
pub const PATH_DISPLAY_WIDTH: usize = 40;

/// How progress is displayed, decided once at startup
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayMode {
    /// Bars when stderr is a terminal, nothing otherwise
    Auto,
    /// indicatif progress bars
    Bars,
    /// Single overwritten spinner line, no bars
    Plain,
    /// No progress output at all
    Quiet,
}

/// Settings threaded through every sync operation
#[derive(Clone, Debug)]
pub struct SyncConfig {
    /// Executable used for clone, pull, status and stash
    pub program: String,
    /// Maximum duration of one external command
    pub timeout: Option<Duration>,
    pub display: DisplayMode,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            program: VCS_PROGRAM.to_string(),
            timeout: None,
            display: DisplayMode::Auto,
        }
    }
}

impl SyncConfig {
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_display(mut self, display: DisplayMode) -> Self {
        self.display = display;
        self
    }
}

/// Determines the command timeout from CLI args and environment
///
/// Priority order:
/// 1. --timeout N flag → N seconds (0 disables)
/// 2. GITTTY_TIMEOUT_SECS env var → N seconds
/// 3. No timeout
pub fn resolve_timeout(flag_secs: Option<u64>) -> Option<Duration> {
    if let Some(secs) = flag_secs {
        return (secs > 0).then(|| Duration::from_secs(secs));
    }

    if let Ok(value) = std::env::var(TIMEOUT_ENV_VAR) {
        match value.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => return Some(Duration::from_secs(secs)),
            Ok(_) => return None,
            Err(_) => {
                tracing::warn!("ignoring {TIMEOUT_ENV_VAR}={value:?}: not a number of seconds");
            }
        }
    }

    None
}

/// Determines the registry directory
///
/// Priority order:
/// 1. --config-dir flag
/// 2. GITTTY_CONFIG_DIR env var
/// 3. ~/.config/gittty
pub fn resolve_config_dir(flag: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(dir) = flag {
        return Some(dir);
    }

    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV_VAR) {
        if !dir.is_empty() {
            return Some(PathBuf::from(dir));
        }
    }

    dirs::home_dir().map(|home| home.join(CONFIG_DIR_RELATIVE))
}
