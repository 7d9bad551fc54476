use anyhow::Result;
use gittty::registry::{RepoRecord, RepoRegistryStore};
use tempfile::TempDir;

mod common;
use common::lock_test;

fn record(name: &str, url: &str, path: Option<&str>) -> RepoRecord {
    RepoRecord::new(name, url, path.map(str::to_string))
}

#[test]
fn test_missing_registry_loads_empty() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = RepoRegistryStore::new(temp_dir.path().join("never-created"));
    assert!(store.load().is_empty());
    assert!(!store.dir().exists());
    Ok(())
}

#[test]
fn test_save_creates_directory_and_round_trips() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = RepoRegistryStore::new(temp_dir.path().join("nested").join("gittty"));
    let records = vec![
        record("dotfiles", "https://h/dotfiles.git", Some("/src/dotfiles")),
        record("tools", "git@h:me/tools.git", None),
    ];

    store.save(&records)?;

    assert_eq!(store.load(), records);
    let content = std::fs::read_to_string(store.registry_path())?;
    assert!(content.ends_with('\n'));
    assert!(content.contains("\"path\": null"));
    Ok(())
}

#[test]
fn test_add_is_idempotent_per_url() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = RepoRegistryStore::new(temp_dir.path());

    store.add(record("a", "https://h/a.git", None))?;
    store.add(record("b", "https://h/b.git", None))?;
    store.add(record("a-again", "https://h/a.git", Some("/src/a")))?;

    let records = store.load();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], record("a", "https://h/a.git", Some("/src/a")));
    assert_eq!(records[1].url, "https://h/b.git");
    Ok(())
}

#[test]
fn test_legacy_file_is_migrated_once() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = RepoRegistryStore::new(temp_dir.path());
    std::fs::write(
        store.legacy_path(),
        "https://h/a.git\n\n  https://h/b.git  \nhttps://h/a.git\n",
    )?;

    let records = store.load();

    assert_eq!(
        records,
        vec![
            RepoRecord::from_legacy_line("https://h/a.git"),
            RepoRecord::from_legacy_line("https://h/b.git"),
        ]
    );
    assert!(!store.legacy_path().exists());
    assert!(store.registry_path().exists());

    // A new legacy file is ignored once the structured registry exists
    std::fs::write(store.legacy_path(), "https://h/c.git\n")?;
    assert_eq!(store.load().len(), 2);
    assert!(store.legacy_path().exists());
    Ok(())
}

#[test]
fn test_corrupted_registry_is_backed_up() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = RepoRegistryStore::new(temp_dir.path());
    let garbage = b"[{\"name\": \"a\", \"url\": ";
    std::fs::write(store.registry_path(), garbage)?;

    assert!(store.load().is_empty());

    assert!(!store.registry_path().exists());
    assert_eq!(std::fs::read(store.backup_path())?, garbage);

    // The registry starts over cleanly
    store.add(record("a", "https://h/a.git", None))?;
    assert_eq!(store.load().len(), 1);
    Ok(())
}

#[test]
fn test_wrong_shape_counts_as_corruption() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = RepoRegistryStore::new(temp_dir.path());
    std::fs::write(store.registry_path(), r#"{"name": "a", "url": "u"}"#)?;

    assert!(store.load().is_empty());
    assert!(store.backup_path().exists());
    Ok(())
}

#[test]
fn test_remove_by_index() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = RepoRegistryStore::new(temp_dir.path());
    store.save(&[
        record("a", "https://h/a.git", None),
        record("b", "https://h/b.git", None),
        record("c", "https://h/c.git", None),
    ])?;

    assert!(store.remove(1));

    let urls: Vec<String> = store.load().into_iter().map(|r| r.url).collect();
    assert_eq!(urls, vec!["https://h/a.git", "https://h/c.git"]);
    Ok(())
}

#[test]
fn test_remove_out_of_range_leaves_file_untouched() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = RepoRegistryStore::new(temp_dir.path());
    store.save(&[record("a", "https://h/a.git", None)])?;
    let before = std::fs::read(store.registry_path())?;

    assert!(!store.remove(1));
    assert!(!store.remove(usize::MAX));

    assert_eq!(std::fs::read(store.registry_path())?, before);
    Ok(())
}

#[test]
fn test_open_honours_config_dir_env() -> Result<()> {
    let _guard = lock_test();
    let temp_dir = TempDir::new()?;

    std::env::set_var("GITTTY_CONFIG_DIR", temp_dir.path());
    let from_env = RepoRegistryStore::open(None);
    std::env::remove_var("GITTTY_CONFIG_DIR");

    assert_eq!(from_env?.dir(), temp_dir.path());

    let explicit = RepoRegistryStore::open(Some(temp_dir.path().join("flag")))?;
    assert_eq!(explicit.dir(), temp_dir.path().join("flag"));
    Ok(())
}

#[test]
fn test_unreadable_registry_is_moved_aside_before_writing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = RepoRegistryStore::new(temp_dir.path());
    // A directory in place of the file cannot be read as bytes
    std::fs::create_dir(store.registry_path())?;
    std::fs::write(store.registry_path().join("inside.txt"), "keep me")?;

    store.add(record("a", "https://h/a.git", None))?;

    assert_eq!(
        std::fs::read_to_string(store.backup_path().join("inside.txt"))?,
        "keep me"
    );
    assert_eq!(store.load(), vec![record("a", "https://h/a.git", None)]);
    Ok(())
}

#[test]
fn test_registry_that_cannot_be_moved_aside_is_never_overwritten() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = RepoRegistryStore::new(temp_dir.path());
    std::fs::create_dir(store.registry_path())?;
    std::fs::write(store.registry_path().join("inside.txt"), "keep me")?;
    // A non-empty directory at the backup path blocks the rename
    std::fs::create_dir(store.backup_path())?;
    std::fs::write(store.backup_path().join("older.txt"), "older")?;

    assert!(store.load().is_empty());
    assert!(store.add(record("a", "https://h/a.git", None)).is_err());
    assert!(!store.remove(0));

    assert!(store.registry_path().is_dir());
    assert_eq!(
        std::fs::read_to_string(store.registry_path().join("inside.txt"))?,
        "keep me"
    );
    Ok(())
}

#[test]
fn test_second_corruption_replaces_backup_with_latest_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = RepoRegistryStore::new(temp_dir.path());

    std::fs::write(store.registry_path(), b"first garbage")?;
    assert!(store.load().is_empty());
    std::fs::write(store.registry_path(), b"second garbage")?;
    assert!(store.load().is_empty());

    assert_eq!(std::fs::read(store.backup_path())?, b"second garbage");
    assert!(!store.registry_path().exists());
    Ok(())
}
