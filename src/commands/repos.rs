//! Registry commands: list, add and remove remembered repositories

use anyhow::Result;

use crate::core::config::PATH_DISPLAY_WIDTH;
use crate::registry::{RepoRecord, RepoRegistryStore};
use crate::utils::shorten_path;

const NO_REPOS_MESSAGE: &str = "No repositories remembered yet. Clone one to add it.";

/// Renders the registry as numbered lines, 1-based
pub fn format_repo_list(records: &[RepoRecord]) -> Vec<String> {
    let max_name_length = records.iter().map(|r| r.name.len()).max().unwrap_or(0);

    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let location = record
                .local_path()
                .map(|p| shorten_path(p, PATH_DISPLAY_WIDTH))
                .unwrap_or_else(|| "(not cloned)".to_string());
            format!(
                "{:>3}: {:width$}  {}  {}",
                i + 1,
                record.name,
                record.url,
                location,
                width = max_name_length
            )
        })
        .collect()
}

/// Handles `repos list`
pub fn handle_list_command(store: &RepoRegistryStore) -> Result<bool> {
    let records = store.load();
    if records.is_empty() {
        println!("{NO_REPOS_MESSAGE}");
        return Ok(true);
    }

    println!("--- Frequent Repositories ---");
    for line in format_repo_list(&records) {
        println!("{line}");
    }
    Ok(true)
}

/// Handles `repos add`
pub fn handle_add_command(
    store: &RepoRegistryStore,
    url: String,
    name: Option<String>,
    path: Option<String>,
) -> Result<bool> {
    let record = match name {
        Some(name) => RepoRecord::new(name, url, path),
        None => RepoRecord::from_url(url, path),
    };
    let url = record.url.clone();
    store.add(record)?;
    println!("🟢 remembered {url}");
    Ok(true)
}

/// Handles `repos remove`; `number` is 1-based as shown by `list`
pub fn handle_remove_command(store: &RepoRegistryStore, number: usize) -> Result<bool> {
    let removed = number
        .checked_sub(1)
        .is_some_and(|index| store.remove(index));

    if removed {
        println!("🟢 removed entry {number}");
    } else {
        println!("🔴 no entry numbered {number}");
    }
    Ok(removed)
}
