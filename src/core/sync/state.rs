//! Progress state folded from parsed git output lines.

use crate::core::config::{RECEIVING_SHARE, RESOLVING_SHARE};
use crate::git::parser::{parse_progress_line, Phase, ProgressEvent};

/// What the display should show after a line was observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// Overall bar position 0..=100, if the phase drives the bar
    pub overall: Option<u64>,
    pub label: String,
}

/// Running progress of one operation
#[derive(Debug, Clone)]
pub struct ProgressState {
    base_label: String,
    label: String,
    overall: Option<u64>,
}

impl ProgressState {
    pub fn new(label: &str) -> Self {
        Self {
            base_label: label.to_string(),
            label: label.to_string(),
            overall: None,
        }
    }

    /// Folds one raw output line into the state
    ///
    /// Returns `None` for lines that are not progress lines.
    pub fn observe(&mut self, line: &str) -> Option<ProgressUpdate> {
        let event = parse_progress_line(line)?;
        self.label = describe(&self.base_label, &event);
        if let Some(position) = overall_position(&event) {
            self.overall = Some(position);
        }
        Some(ProgressUpdate {
            overall: self.overall,
            label: self.label.clone(),
        })
    }

    /// True once a phase that drives the bar has been seen
    pub fn has_bar_position(&self) -> bool {
        self.overall.is_some()
    }

    pub fn overall(&self) -> Option<u64> {
        self.overall
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Maps a phase percentage onto the single overall bar
///
/// Receiving covers 0..=90, resolving 90..=100. Compressing phases only
/// change the label.
pub fn overall_position(event: &ProgressEvent) -> Option<u64> {
    let percent = u64::from(event.percent.min(100));
    match event.phase {
        Phase::Receiving => Some(percent * RECEIVING_SHARE / 100),
        Phase::Resolving => Some(RECEIVING_SHARE + percent * RESOLVING_SHARE / 100),
        Phase::Compressing | Phase::Decompressing => None,
    }
}

fn describe(base_label: &str, event: &ProgressEvent) -> String {
    let mut label = format!(
        "{base_label} • {} {}% ({}/{})",
        event.phase.label(),
        event.percent,
        event.current,
        event.total
    );
    match (&event.transfer_size, &event.transfer_speed) {
        (Some(size), Some(speed)) => label.push_str(&format!(" • {size} | {speed}")),
        (Some(size), None) => label.push_str(&format!(" • {size}")),
        _ => {}
    }
    label
}
