//! Tests for the RealFileSystem boundary used by the dictionary store

use glossa::infrastructure::traits::{FileSystem, RealFileSystem};
use std::fs;
use std::io;
use tempfile::TempDir;

#[test]
fn given_existing_file_when_write_then_content_replaced() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("dictionaries.json");
    fs::write(&path, "a much longer previous content").unwrap();

    let fs = RealFileSystem;

    // Act
    fs.write(&path, "{}").unwrap();

    // Assert
    assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
}

#[test]
fn given_missing_file_when_read_then_not_found_kind() {
    let temp = TempDir::new().unwrap();

    let err = RealFileSystem
        .read(&temp.path().join("absent.json"))
        .unwrap_err();

    assert_eq!(err.kind(), io::ErrorKind::NotFound);
}

#[test]
fn given_file_when_exists_then_true_only_for_present_paths() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("dictionaries.json.corrupt");
    fs::write(&path, "garbage").unwrap();

    assert!(RealFileSystem.exists(&path));
    assert!(!RealFileSystem.exists(&temp.path().join("dictionaries.json.corrupt.1")));
}

#[test]
fn given_nested_path_when_ensure_parent_then_creates_directories() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("a/b/dictionaries.json");

    RealFileSystem.ensure_parent(&path).unwrap();

    assert!(temp.path().join("a/b").is_dir());
    assert!(!path.exists());
}

#[test]
fn given_bare_file_name_when_ensure_parent_then_noop() {
    RealFileSystem
        .ensure_parent(std::path::Path::new("dictionaries.json"))
        .unwrap();
}

#[test]
fn given_file_when_rename_then_moved() {
    let temp = TempDir::new().unwrap();
    let from = temp.path().join("dictionaries.json");
    let to = temp.path().join("dictionaries.json.corrupt");
    fs::write(&from, "garbage").unwrap();

    RealFileSystem.rename(&from, &to).unwrap();

    assert!(!from.exists());
    assert_eq!(fs::read_to_string(&to).unwrap(), "garbage");
}
