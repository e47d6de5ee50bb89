//! Layered configuration: defaults, jxref.toml, explicit file, environment.

use jxref::config::{Config, CONFIG_FILE_NAME};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_root_file_feeds_index_options() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(CONFIG_FILE_NAME),
        "[index]\nchanged_only = true\ninclude = [\"src/**\"]\nexclude = [\"**/generated/**\"]\n",
    )
    .unwrap();

    let config = Config::load(temp_dir.path(), None).unwrap();
    let options = config.index_options(temp_dir.path());
    assert_eq!(options.root, temp_dir.path());
    assert!(options.changed_only);
    assert_eq!(options.include, vec!["src/**".to_string()]);
    assert_eq!(options.exclude, vec!["**/generated/**".to_string()]);
    assert!(!options.progress);
}

#[test]
fn test_explicit_file_replaces_root_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(CONFIG_FILE_NAME),
        "database = \"root.db\"\n",
    )
    .unwrap();
    let explicit = temp_dir.path().join("other.toml");
    fs::write(&explicit, "database = \"other.db\"\n").unwrap();

    let config = Config::load(temp_dir.path(), Some(&explicit)).unwrap();
    assert_eq!(config.database, PathBuf::from("other.db"));
    assert_eq!(
        config.database_path(temp_dir.path()),
        temp_dir.path().join("other.db")
    );
}

#[test]
fn test_invalid_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(CONFIG_FILE_NAME),
        "[index]\nthreads = \"many\"\n",
    )
    .unwrap();
    assert!(Config::load(temp_dir.path(), None).is_err());
}

#[test]
fn test_environment_overrides_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(CONFIG_FILE_NAME),
        "[index]\nthreads = 2\n",
    )
    .unwrap();

    std::env::set_var("JXREF_INDEX__THREADS", "6");
    std::env::set_var("JXREF_LOGGING__DEFAULT", "debug");
    let loaded = Config::load(temp_dir.path(), None);
    std::env::remove_var("JXREF_INDEX__THREADS");
    std::env::remove_var("JXREF_LOGGING__DEFAULT");

    let config = loaded.unwrap();
    assert_eq!(config.index.threads, 6);
    assert_eq!(config.logging.default, "debug");
}
