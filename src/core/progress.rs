//! Progress bar construction

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use super::config::{DEFAULT_PROGRESS_BAR_LENGTH, PROGRESS_CHARS, PROGRESS_TEMPLATE, SPINNER_TEMPLATE};

/// Creates and configures a progress bar for one operation
/// Returns a ProgressBar that starts in spinner style with the given label
pub(crate) fn create_progress_bar(label: &str) -> ProgressBar {
    let pb = ProgressBar::new(DEFAULT_PROGRESS_BAR_LENGTH);
    if let Ok(style) = create_spinner_style() {
        pb.set_style(style);
    }
    pb.set_prefix("🟡");
    pb.set_message(label.to_string());
    pb
}

/// Creates the bar style used once structured progress is known
pub(crate) fn create_progress_style() -> Result<ProgressStyle> {
    Ok(ProgressStyle::default_bar()
        .template(PROGRESS_TEMPLATE)?
        .progress_chars(PROGRESS_CHARS))
}

/// Creates the style used while only a spinner can be shown
///
/// Frames are written into the message by the reporter, so this style has no
/// tick characters of its own.
pub(crate) fn create_spinner_style() -> Result<ProgressStyle> {
    Ok(ProgressStyle::default_bar().template(SPINNER_TEMPLATE)?)
}
