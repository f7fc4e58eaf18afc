//! Unit tests for configuration and root folder resolution
//!
//! Note: Uses serial_test to prevent ENV variable race conditions. Tests that
//! manipulate TARAB_ROOT_FOLDER or PORT are marked #[serial] so they run
//! sequentially, not in parallel.

use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tarab_common::config::{listen_port, RootFolderInitializer, RootFolderResolver};

#[test]
#[serial]
fn test_cli_argument_has_highest_priority() {
    env::set_var("TARAB_ROOT_FOLDER", "/tmp/from-env");

    let resolver = RootFolderResolver::new(Some(PathBuf::from("/tmp/from-cli")));
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/from-cli"));

    env::remove_var("TARAB_ROOT_FOLDER");
}

#[test]
#[serial]
fn test_env_variable_overrides_default() {
    env::set_var("TARAB_ROOT_FOLDER", "/tmp/from-env");

    let resolver = RootFolderResolver::new(None);
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/from-env"));

    env::remove_var("TARAB_ROOT_FOLDER");
}

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    env::remove_var("TARAB_ROOT_FOLDER");

    let resolver = RootFolderResolver::new(None);
    let root_folder = resolver.resolve();

    // Should return a valid non-empty path
    assert!(!root_folder.as_os_str().is_empty());
}

#[test]
fn test_initializer_creates_directory_and_database_path() {
    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let root = tmp.path().join("nested").join("tarab-root");

    let initializer = RootFolderInitializer::new(root.clone());
    initializer
        .ensure_directory_exists()
        .expect("Should create missing directories");

    assert!(root.is_dir());
    assert_eq!(initializer.database_path(), root.join("tarab.db"));
}

#[test]
#[serial]
fn test_listen_port_default_and_override() {
    env::remove_var("PORT");
    assert_eq!(listen_port(), 5000);

    env::set_var("PORT", "8080");
    assert_eq!(listen_port(), 8080);

    // Garbage values fall back to the default
    env::set_var("PORT", "not-a-port");
    assert_eq!(listen_port(), 5000);

    env::remove_var("PORT");
}
