//! Live progress reporting for running commands.

pub mod coordinator;
pub mod renderer;
pub mod state;

pub use coordinator::ProgressReporter;
pub use renderer::{
    renderer_for, BarRenderer, LineRenderer, ProgressRenderer, ProgressSurface, QuietRenderer,
};
pub use state::{ProgressState, ProgressUpdate};
