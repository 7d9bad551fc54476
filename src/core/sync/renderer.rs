//! Display surfaces for operation progress.
//!
//! One renderer is picked at startup from [`DisplayMode`] and injected into the
//! engine; each operation opens its own surface from it.

use indicatif::ProgressBar;
use std::io::{IsTerminal, Write};
use std::sync::Arc;

use crate::core::config::DisplayMode;
use crate::core::progress::{create_progress_bar, create_progress_style};

// Clear the whole current line and return to column 0
const CLEAR_LINE: &str = "\r\x1b[2K";

/// Capability of a display to show progress
pub trait ProgressRenderer: Send + Sync {
    /// Whether numeric bars can be drawn; spinner only otherwise
    fn supports_bars(&self) -> bool;

    /// Opens a surface for one operation
    fn open(&self, label: &str) -> Box<dyn ProgressSurface>;
}

/// Per-operation drawing target
pub trait ProgressSurface: Send {
    fn show_progress(&mut self, overall: u64, label: &str);
    fn show_spinner(&mut self, frame: char, label: &str);
    /// Removes everything this surface drew
    fn clear(&mut self);
}

/// Chooses the renderer for a display mode
pub fn renderer_for(mode: DisplayMode) -> Arc<dyn ProgressRenderer> {
    match mode {
        DisplayMode::Auto if std::io::stderr().is_terminal() => Arc::new(BarRenderer),
        DisplayMode::Auto | DisplayMode::Quiet => Arc::new(QuietRenderer),
        DisplayMode::Bars => Arc::new(BarRenderer),
        DisplayMode::Plain => Arc::new(LineRenderer),
    }
}

/// indicatif bars with a spinner fallback in the message
#[derive(Clone, Copy, Debug, Default)]
pub struct BarRenderer;

impl ProgressRenderer for BarRenderer {
    fn supports_bars(&self) -> bool {
        true
    }

    fn open(&self, label: &str) -> Box<dyn ProgressSurface> {
        Box::new(BarSurface {
            pb: create_progress_bar(label),
            bar_style: false,
        })
    }
}

struct BarSurface {
    pb: ProgressBar,
    bar_style: bool,
}

impl ProgressSurface for BarSurface {
    fn show_progress(&mut self, overall: u64, label: &str) {
        if !self.bar_style {
            match create_progress_style() {
                Ok(style) => self.pb.set_style(style),
                Err(e) => tracing::debug!("progress style unavailable: {e}"),
            }
            self.bar_style = true;
        }
        self.pb.set_position(overall);
        self.pb.set_message(label.to_string());
    }

    fn show_spinner(&mut self, frame: char, label: &str) {
        self.pb.set_message(format!("{frame} {label}"));
    }

    fn clear(&mut self) {
        self.pb.finish_and_clear();
    }
}

/// Single overwritten stderr line, no bars
#[derive(Clone, Copy, Debug, Default)]
pub struct LineRenderer;

impl ProgressRenderer for LineRenderer {
    fn supports_bars(&self) -> bool {
        false
    }

    fn open(&self, _label: &str) -> Box<dyn ProgressSurface> {
        Box::new(LineSurface { dirty: false })
    }
}

struct LineSurface {
    dirty: bool,
}

impl LineSurface {
    fn write_line(&mut self, text: &str) {
        let mut stderr = std::io::stderr().lock();
        // Progress output is best effort
        let _ = write!(stderr, "{CLEAR_LINE}{text}");
        let _ = stderr.flush();
        self.dirty = true;
    }
}

impl ProgressSurface for LineSurface {
    fn show_progress(&mut self, overall: u64, label: &str) {
        self.write_line(&format!("{overall:>3}% {label}"));
    }

    fn show_spinner(&mut self, frame: char, label: &str) {
        self.write_line(&format!("{frame} {label}"));
    }

    fn clear(&mut self) {
        if self.dirty {
            let mut stderr = std::io::stderr().lock();
            let _ = write!(stderr, "{CLEAR_LINE}");
            let _ = stderr.flush();
            self.dirty = false;
        }
    }
}

/// Draws nothing
#[derive(Clone, Copy, Debug, Default)]
pub struct QuietRenderer;

impl ProgressRenderer for QuietRenderer {
    fn supports_bars(&self) -> bool {
        false
    }

    fn open(&self, _label: &str) -> Box<dyn ProgressSurface> {
        Box::new(QuietSurface)
    }
}

struct QuietSurface;

impl ProgressSurface for QuietSurface {
    fn show_progress(&mut self, _overall: u64, _label: &str) {}
    fn show_spinner(&mut self, _frame: char, _label: &str) {}
    fn clear(&mut self) {}
}
