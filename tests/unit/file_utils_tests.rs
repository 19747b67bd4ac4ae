/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::path::Path;

use spreadshred::file_utils::FileManager;
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "draft.txt", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that dir_exists returns false for non-existent directories
#[test]
fn test_dir_exists_withNonExistentDir_shouldReturnFalse() {
    assert!(!FileManager::dir_exists("./non_existent_directory_12345"));
}

/// Test that generate_output_path keeps the output next to the input
#[test]
fn test_generate_output_path_withValidInputs_shouldCreateCorrectPath() {
    let output_path = FileManager::generate_output_path(Path::new("/tmp/input/essay.txt"), "txt");
    assert_eq!(output_path, Path::new("/tmp/input/essay.fitted.txt"));
}

/// Test that writing creates missing parent directories
#[test]
fn test_write_to_file_withMissingParents_shouldCreateThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("a").join("b").join("out.txt");

    FileManager::write_to_file(&path, "fitted text")?;

    assert_eq!(FileManager::read_to_string(&path)?, "fitted text");
    Ok(())
}

/// Test that reading a missing file is an error
#[test]
fn test_read_to_string_withMissingFile_shouldFail() {
    assert!(FileManager::read_to_string("does/not/exist.txt").is_err());
}

/// Test that find_files returns sorted matches and ignores other extensions
#[test]
fn test_find_files_shouldReturnSortedMatches() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "b.txt", "b")?;
    common::create_test_file(dir, "a.txt", "a")?;
    common::create_test_file(dir, "a.fitted.txt", "a")?;
    common::create_test_file(dir, "c.md", "c")?;

    let files = FileManager::find_files(dir, "txt")?;

    let names: Vec<String> = files
        .iter()
        .map(|f| f.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a.txt", "b.txt"]);
    Ok(())
}
