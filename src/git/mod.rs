pub mod errors;
pub mod operations;
pub mod parser;
pub mod prompt;
pub mod runner;
pub mod status;

// Public API - curated exports only
pub mod api;

// Re-export commonly used items
pub use api::*;
