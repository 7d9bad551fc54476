//! Persistent registry of known repositories
//!
//! The registry is a pretty-printed JSON array in the config directory. Files
//! written by older versions (one URL per line) are migrated on first load.
//! An unparseable registry is moved aside to `<file>.bak` and treated as empty.
//!
//! There is no inter-process locking: two processes doing read-modify-write at
//! the same time can lose one update. Writes go through a temporary file and a
//! rename, so a reader never sees a half-written registry.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::record::RepoRecord;
use crate::core::config::{
    resolve_config_dir, BACKUP_SUFFIX, LEGACY_REGISTRY_FILE_NAME, REGISTRY_FILE_NAME,
};

/// File-backed, URL-deduplicated list of repositories
#[derive(Clone, Debug)]
pub struct RepoRegistryStore {
    dir: PathBuf,
}

impl RepoRegistryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store in the configured or default config directory
    pub fn open(config_dir: Option<PathBuf>) -> Result<Self> {
        let dir = resolve_config_dir(config_dir)
            .context("Could not determine the home directory for the registry")?;
        Ok(Self::new(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn registry_path(&self) -> PathBuf {
        self.dir.join(REGISTRY_FILE_NAME)
    }

    pub fn legacy_path(&self) -> PathBuf {
        self.dir.join(LEGACY_REGISTRY_FILE_NAME)
    }

    pub fn backup_path(&self) -> PathBuf {
        self.dir.join(format!("{REGISTRY_FILE_NAME}{BACKUP_SUFFIX}"))
    }

    /// Loads all records in stored order
    ///
    /// Never fails: unreadable or corrupted files degrade to an empty list.
    pub fn load(&self) -> Vec<RepoRecord> {
        self.load_checked().unwrap_or_else(|e| {
            warn!("{e:#}");
            Vec::new()
        })
    }

    /// Loads records for a read-modify-write
    ///
    /// Fails only when a registry exists that could neither be read nor moved
    /// aside, so that a following save cannot overwrite it.
    fn load_checked(&self) -> Result<Vec<RepoRecord>> {
        let registry_path = self.registry_path();
        if registry_path.exists() {
            return self.load_structured(&registry_path);
        }

        let legacy_path = self.legacy_path();
        if legacy_path.exists() {
            return Ok(self.migrate_legacy(&legacy_path));
        }

        Ok(Vec::new())
    }

    /// Overwrites the registry with `records`
    pub fn save(&self, records: &[RepoRecord]) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let mut content =
            serde_json::to_string_pretty(records).context("Failed to serialize registry")?;
        content.push('\n');

        let mut tmp = NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("Failed to create a temporary file in {}", self.dir.display()))?;
        tmp.write_all(content.as_bytes())
            .context("Failed to write registry")?;
        tmp.as_file().sync_all().context("Failed to flush registry")?;

        let registry_path = self.registry_path();
        tmp.persist(&registry_path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to replace {}", registry_path.display()))?;

        debug!("saved {} records to {}", records.len(), registry_path.display());
        Ok(())
    }

    /// Inserts a record, or updates the path of the record with the same URL
    pub fn add(&self, record: RepoRecord) -> Result<()> {
        let mut records = self.load_checked()?;
        upsert(&mut records, record);
        self.save(&records)
    }

    /// Removes the record at a 0-based index
    ///
    /// Returns false, leaving the registry untouched, when the index is out of
    /// range or the registry could not be read or written.
    pub fn remove(&self, index: usize) -> bool {
        let mut records = match self.load_checked() {
            Ok(records) => records,
            Err(e) => {
                warn!("{e:#}");
                return false;
            }
        };
        if index >= records.len() {
            return false;
        }

        let removed = records.remove(index);
        match self.save(&records) {
            Ok(()) => {
                debug!("removed {} from registry", removed.url);
                true
            }
            Err(e) => {
                warn!("failed to remove {} from registry: {e:#}", removed.url);
                false
            }
        }
    }

    fn load_structured(&self, registry_path: &Path) -> Result<Vec<RepoRecord>> {
        let bytes = match fs::read(registry_path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("failed to read {}: {e}", registry_path.display());
                self.back_up(registry_path)?;
                return Ok(Vec::new());
            }
        };

        match serde_json::from_slice::<Vec<RepoRecord>>(&bytes) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!("registry {} is corrupted: {e}", registry_path.display());
                self.back_up(registry_path)?;
                Ok(Vec::new())
            }
        }
    }

    /// Moves an unusable registry to the backup path
    fn back_up(&self, registry_path: &Path) -> Result<()> {
        let backup_path = self.backup_path();
        if backup_path.exists() {
            warn!("replacing earlier backup {}", backup_path.display());
        }
        warn!(
            "moving {} to {}",
            registry_path.display(),
            backup_path.display()
        );
        fs::rename(registry_path, &backup_path).with_context(|| {
            format!(
                "Registry {} is unusable and could not be moved to {}; leaving it in place",
                registry_path.display(),
                backup_path.display()
            )
        })
    }

    fn migrate_legacy(&self, legacy_path: &Path) -> Vec<RepoRecord> {
        let content = match fs::read_to_string(legacy_path) {
            Ok(content) => content,
            Err(e) => {
                warn!("failed to read legacy registry {}: {e}", legacy_path.display());
                return Vec::new();
            }
        };

        let mut records = Vec::new();
        for url in content.lines().map(str::trim).filter(|line| !line.is_empty()) {
            upsert(&mut records, RepoRecord::from_legacy_line(url));
        }

        if let Err(e) = self.save(&records) {
            // Keep the legacy file so the migration is retried next time
            warn!("failed to migrate legacy registry: {e:#}");
            return records;
        }

        if let Err(e) = fs::remove_file(legacy_path) {
            warn!("migrated legacy registry but could not delete it: {e}");
        }
        info!(
            "migrated {} repositories from {}",
            records.len(),
            legacy_path.display()
        );
        records
    }
}

/// Upserts by exact URL; returns true when a new record was appended
///
/// An existing record keeps its name and position; only its path changes,
/// and only when the incoming record carries one.
pub fn upsert(records: &mut Vec<RepoRecord>, record: RepoRecord) -> bool {
    match records.iter_mut().find(|existing| existing.url == record.url) {
        Some(existing) => {
            if record.local_path().is_some() {
                existing.path = record.path;
            }
            false
        }
        None => {
            records.push(record);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_appends_new_url() {
        let mut records = vec![RepoRecord::new("a", "https://a", None)];
        assert!(upsert(&mut records, RepoRecord::new("b", "https://b", None)));
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].url, "https://b");
    }

    #[test]
    fn test_upsert_updates_only_path() {
        let mut records = vec![RepoRecord::new("a", "https://a", None)];
        let inserted = upsert(
            &mut records,
            RepoRecord::new("renamed", "https://a", Some("/src/a".to_string())),
        );
        assert!(!inserted);
        assert_eq!(records, vec![RepoRecord::new("a", "https://a", Some("/src/a".to_string()))]);
    }

    #[test]
    fn test_upsert_without_path_keeps_known_path() {
        let mut records = vec![RepoRecord::new("a", "https://a", Some("/src/a".to_string()))];
        upsert(&mut records, RepoRecord::new("a", "https://a", None));
        assert_eq!(records[0].path.as_deref(), Some("/src/a"));
    }

    #[test]
    fn test_upsert_url_match_is_case_sensitive() {
        let mut records = vec![RepoRecord::new("a", "https://host/A", None)];
        assert!(upsert(&mut records, RepoRecord::new("a", "https://host/a", None)));
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_file_locations() {
        let store = RepoRegistryStore::new("/cfg");
        assert_eq!(store.registry_path(), PathBuf::from("/cfg/repos.json"));
        assert_eq!(store.legacy_path(), PathBuf::from("/cfg/frequent_repos.txt"));
        assert_eq!(store.backup_path(), PathBuf::from("/cfg/repos.json.bak"));
    }
}
