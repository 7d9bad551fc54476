//! Command handlers behind the CLI

pub mod clone;
pub mod pull;
pub mod repos;

use crate::git::SyncOutcome;

/// Prints the result line for one operation, plus its detail when present
pub(crate) fn print_outcome(subject: &str, outcome: &SyncOutcome) {
    println!("{} {:<20} {}", outcome.symbol(), outcome.text(), subject);

    if let Some(category) = outcome.category() {
        println!("   └─ [{}]", category.text());
    }
    if let Some(detail) = outcome.detail() {
        for line in detail.trim_end().lines() {
            println!("      {line}");
        }
    }
}
