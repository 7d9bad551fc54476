//! Parsing of git transfer progress lines

use regex::Regex;
use std::sync::OnceLock;

/// Transfer phase reported by a progress line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Receiving,
    Resolving,
    Compressing,
    Decompressing,
}

impl Phase {
    pub fn label(&self) -> &str {
        match self {
            Phase::Receiving => "Receiving objects",
            Phase::Resolving => "Resolving deltas",
            Phase::Compressing => "Compressing objects",
            Phase::Decompressing => "Decompressing objects",
        }
    }
}

/// One parsed progress line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressEvent {
    pub phase: Phase,
    pub percent: u8,
    pub current: u64,
    pub total: u64,
    pub transfer_size: Option<String>,
    pub transfer_speed: Option<String>,
}

// Size and speed are opaque; git separates them with " | " and may append ", done."
const COUNTS_PATTERN: &str = r":\s+(\d{1,3})%\s+\((\d+)/(\d+)\)";
const TRANSFER_PATTERN: &str = r"(?:,\s*([^,|]+?)\s*\|\s*([^,]+?))?\s*(?:,\s*done\.?)?\s*$";

fn patterns() -> &'static [(Phase, Regex)] {
    static PATTERNS: OnceLock<Vec<(Phase, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        // Evaluated in order; the first matching phase wins
        [
            (Phase::Receiving, "Receiving objects"),
            (Phase::Resolving, "Resolving deltas"),
            (Phase::Decompressing, "Decompressing objects"),
            (Phase::Compressing, "Compressing objects"),
        ]
        .into_iter()
        .filter_map(|(phase, prefix)| {
            let pattern = format!("{prefix}{COUNTS_PATTERN}{TRANSFER_PATTERN}");
            match Regex::new(&pattern) {
                Ok(re) => Some((phase, re)),
                Err(e) => {
                    tracing::warn!("invalid progress pattern for {prefix}: {e}");
                    None
                }
            }
        })
        .collect()
    })
}

/// Parses one line of git output into a progress event
///
/// Lines that are not progress lines, including malformed ones, yield `None`.
/// Percentages above 100 are clamped. Counts pass through as given.
pub fn parse_progress_line(line: &str) -> Option<ProgressEvent> {
    patterns().iter().find_map(|(phase, re)| {
        let caps = re.captures(line)?;
        let percent: u16 = caps.get(1)?.as_str().parse().ok()?;
        let current: u64 = caps.get(2)?.as_str().parse().ok()?;
        let total: u64 = caps.get(3)?.as_str().parse().ok()?;

        // Size and speed only accompany the receiving phase
        let (transfer_size, transfer_speed) = if *phase == Phase::Receiving {
            (
                caps.get(4).map(|m| m.as_str().to_string()),
                caps.get(5).map(|m| m.as_str().to_string()),
            )
        } else {
            (None, None)
        };

        Some(ProgressEvent {
            phase: *phase,
            percent: u8::try_from(percent.min(100)).unwrap_or(100),
            current,
            total,
            transfer_size,
            transfer_speed,
        })
    })
}
