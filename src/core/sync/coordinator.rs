//! Progress reporter driving one display surface per operation.

use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::core::config::{SPINNER_FRAMES, SPINNER_TICK};
use crate::core::sync::renderer::{ProgressRenderer, ProgressSurface};
use crate::core::sync::state::ProgressState;
use crate::git::LineSender;

/// Live progress for one running command
///
/// Lines sent through [`ProgressReporter::sender`] are parsed and rendered by
/// a spawned task. [`ProgressReporter::finish`] stops and joins that task;
/// dropping the reporter without finishing still signals it to stop, so the
/// surface is cleared on panic and cancellation paths too.
pub struct ProgressReporter {
    lines: LineSender,
    stop_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl ProgressReporter {
    pub fn start(renderer: Arc<dyn ProgressRenderer>, label: &str) -> Self {
        let (lines_tx, lines_rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = watch::channel(false);
        let supports_bars = renderer.supports_bars();
        let surface = renderer.open(label);
        let state = ProgressState::new(label);

        let handle = tokio::spawn(drive(surface, state, supports_bars, lines_rx, stop_rx));

        Self {
            lines: lines_tx,
            stop_tx,
            handle: Some(handle),
        }
    }

    /// Channel the runner forwards output lines into
    pub fn sender(&self) -> LineSender {
        self.lines.clone()
    }

    /// Stops the ticking loop and waits for the surface to be cleared
    pub async fn finish(mut self) {
        let _ = self.stop_tx.send(true);
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!("progress task ended abnormally: {e}");
            }
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if self.handle.take().is_some() {
            let _ = self.stop_tx.send(true);
        }
    }
}

async fn drive(
    mut surface: Box<dyn ProgressSurface>,
    mut state: ProgressState,
    supports_bars: bool,
    mut lines_rx: mpsc::UnboundedReceiver<String>,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(SPINNER_TICK);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut frame = 0usize;
    let mut lines_open = true;

    loop {
        tokio::select! {
            biased;
            changed = stop_rx.changed() => {
                // A dropped sender counts as a stop signal too
                if changed.is_err() || *stop_rx.borrow() {
                    break;
                }
            }
            line = lines_rx.recv(), if lines_open => {
                match line {
                    Some(line) => {
                        if let Some(update) = state.observe(&line) {
                            if let (true, Some(overall)) = (supports_bars, update.overall) {
                                surface.show_progress(overall, &update.label);
                            }
                        }
                    }
                    None => lines_open = false,
                }
            }
            _ = interval.tick() => {
                if !supports_bars || !state.has_bar_position() {
                    let glyph = SPINNER_FRAMES[frame % SPINNER_FRAMES.len()];
                    frame = frame.wrapping_add(1);
                    surface.show_spinner(glyph, state.label());
                }
            }
        }
    }

    surface.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    enum Drawn {
        Bar(u64),
        Spinner(char),
        Cleared,
    }

    #[derive(Clone, Default)]
    struct RecordingRenderer {
        bars: bool,
        drawn: Arc<Mutex<Vec<Drawn>>>,
    }

    struct RecordingSurface {
        drawn: Arc<Mutex<Vec<Drawn>>>,
    }

    impl ProgressRenderer for RecordingRenderer {
        fn supports_bars(&self) -> bool {
            self.bars
        }

        fn open(&self, _label: &str) -> Box<dyn ProgressSurface> {
            Box::new(RecordingSurface {
                drawn: Arc::clone(&self.drawn),
            })
        }
    }

    impl ProgressSurface for RecordingSurface {
        fn show_progress(&mut self, overall: u64, _label: &str) {
            self.drawn.lock().unwrap().push(Drawn::Bar(overall));
        }

        fn show_spinner(&mut self, frame: char, _label: &str) {
            self.drawn.lock().unwrap().push(Drawn::Spinner(frame));
        }

        fn clear(&mut self) {
            self.drawn.lock().unwrap().push(Drawn::Cleared);
        }
    }

    #[tokio::test]
    async fn test_structured_lines_drive_the_bar() {
        let renderer = RecordingRenderer {
            bars: true,
            ..Default::default()
        };
        let drawn = Arc::clone(&renderer.drawn);
        let reporter = ProgressReporter::start(Arc::new(renderer), "cloning");

        let tx = reporter.sender();
        tx.send("Receiving objects:  50% (5/10)".to_string()).unwrap();
        tx.send("Resolving deltas: 100% (4/4), done.".to_string()).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        reporter.finish().await;

        let drawn = drawn.lock().unwrap().clone();
        assert!(drawn.contains(&Drawn::Bar(45)));
        assert!(drawn.contains(&Drawn::Bar(100)));
        assert_eq!(drawn.last(), Some(&Drawn::Cleared));
    }

    #[tokio::test]
    async fn test_spinner_ticks_without_structured_events() {
        let renderer = RecordingRenderer {
            bars: true,
            ..Default::default()
        };
        let drawn = Arc::clone(&renderer.drawn);
        let reporter = ProgressReporter::start(Arc::new(renderer), "pulling");

        tokio::time::sleep(Duration::from_millis(350)).await;
        reporter.finish().await;

        let drawn = drawn.lock().unwrap().clone();
        let spins = drawn
            .iter()
            .filter(|d| matches!(d, Drawn::Spinner(_)))
            .count();
        assert!(spins >= 2, "expected several spinner frames, got {drawn:?}");
        assert!(!drawn.iter().any(|d| matches!(d, Drawn::Bar(_))));
        assert_eq!(drawn.last(), Some(&Drawn::Cleared));
    }

    #[tokio::test]
    async fn test_no_bar_capability_keeps_spinning() {
        let renderer = RecordingRenderer::default();
        let drawn = Arc::clone(&renderer.drawn);
        let reporter = ProgressReporter::start(Arc::new(renderer), "cloning");

        reporter
            .sender()
            .send("Receiving objects:  50% (5/10)".to_string())
            .unwrap();
        tokio::time::sleep(Duration::from_millis(250)).await;
        reporter.finish().await;

        let drawn = drawn.lock().unwrap().clone();
        assert!(!drawn.iter().any(|d| matches!(d, Drawn::Bar(_))));
        assert!(drawn.iter().any(|d| matches!(d, Drawn::Spinner(_))));
    }

    #[tokio::test]
    async fn test_finish_without_output_clears_surface() {
        let renderer = RecordingRenderer::default();
        let drawn = Arc::clone(&renderer.drawn);
        let reporter = ProgressReporter::start(Arc::new(renderer), "cloning");
        reporter.finish().await;
        assert_eq!(drawn.lock().unwrap().last(), Some(&Drawn::Cleared));
    }

    #[tokio::test]
    async fn test_drop_without_finish_stops_ticking() {
        let renderer = RecordingRenderer::default();
        let drawn = Arc::clone(&renderer.drawn);
        let reporter = ProgressReporter::start(Arc::new(renderer), "cloning");
        tokio::time::sleep(Duration::from_millis(150)).await;
        drop(reporter);

        tokio::time::sleep(Duration::from_millis(50)).await;
        let count_after_drop = drawn.lock().unwrap().len();
        assert_eq!(drawn.lock().unwrap().last(), Some(&Drawn::Cleared));
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(drawn.lock().unwrap().len(), count_after_drop);
    }
}
