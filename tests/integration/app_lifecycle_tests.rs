/*!
 * Integration tests for the application controller
 */

use anyhow::Result;
use std::path::Path;

use spreadshred::app_config::{CacheBackend, Config, SynonymProvider};
use spreadshred::app_controller::Controller;
use spreadshred::file_utils::FileManager;
use spreadshred::reconcile::Targets;
use spreadshred::text::word_count;

use crate::common;

fn offline_config() -> Config {
    let mut config = Config::default();
    config.synonyms.provider = SynonymProvider::None;
    config.cache.backend = CacheBackend::Memory;
    config
}

/// Test that a folder run processes, skips and reprocesses on force
#[tokio::test]
async fn test_runFolder_rerun_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "first.txt", "We do not know.")?;
    common::create_test_file(dir, "second.txt", "They did not come.")?;
    let controller = Controller::with_config(offline_config())?;

    let summary = controller.run_folder(dir.to_path_buf(), Targets::words(3), false).await?;
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.missed, 0);
    assert_eq!(summary.errors, 0);
    assert_eq!(FileManager::read_to_string(dir.join("first.fitted.txt"))?, "We don't know.");
    assert_eq!(FileManager::read_to_string(dir.join("second.fitted.txt"))?, "They didn't come.");

    let again = controller.run_folder(dir.to_path_buf(), Targets::words(3), false).await?;
    assert_eq!(again.skipped, 2);
    assert_eq!(again.processed, 0);

    let forced = controller.run_folder(dir.to_path_buf(), Targets::words(3), true).await?;
    assert_eq!(forced.processed, 2);
    Ok(())
}

/// Test that a target out of reach counts as missed, not as an error
#[tokio::test]
async fn test_runFolder_unreachableTarget_shouldCountMissed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "short.txt", "Short text.")?;
    let controller = Controller::with_config(offline_config())?;

    let summary = controller
        .run_folder(temp_dir.path().to_path_buf(), Targets::words(50), false)
        .await?;

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.missed, 1);
    assert_eq!(summary.errors, 0);
    Ok(())
}

/// Test that a directory without text files is an error
#[tokio::test]
async fn test_runFolder_withoutTextFiles_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "notes.md", "Not a text file.")?;
    let controller = Controller::with_config(offline_config())?;

    let result = controller.run_folder(temp_dir.path().to_path_buf(), Targets::words(3), false).await;

    assert!(result.is_err());
    Ok(())
}

/// Test that a missing input file is an error
#[test]
fn test_run_missingInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(offline_config())?;

    let result = tokio_test::block_on(async {
        controller
            .run(temp_dir.path().join("missing.txt"), None, Targets::words(3), false)
            .await
    });

    assert!(result.is_err());
    assert!(!temp_dir.path().join("missing.fitted.txt").exists());
    Ok(())
}

/// Test that the configured wrap width shapes the written output
#[tokio::test]
async fn test_run_withWrapWidth_shouldWrapOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "note.txt", "We do not know. They did not come.")?;
    let mut config = offline_config();
    config.output.wrap_width = Some(10);
    let controller = Controller::with_config(config)?;

    controller.run(input, None, Targets::words(7), false).await?;

    let written = FileManager::read_to_string(temp_dir.path().join("note.fitted.txt"))?;
    assert!(written.contains('\n'));
    assert!(written.lines().all(|line| line.chars().count() <= 10));
    assert_eq!(word_count(&written), 7);
    Ok(())
}

/// Test that a SQLite cache written by one controller warms the next
#[tokio::test]
async fn test_sqliteCache_shouldPersistAcrossControllers() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let db_path = temp_dir.path().join("cache").join("synonyms.db");
    let mut config = offline_config();
    config.cache.backend = CacheBackend::Sqlite;
    config.cache.path = Some(db_path.clone());

    let first = Controller::with_config(config.clone())?;
    assert!(first.reconciler().synonyms().is_empty());
    first.reconcile_text("The colour faded.", Targets::chars(16)).await?;
    let resolved = first.reconciler().synonyms().len();
    assert!(resolved > 0);
    assert!(db_path.exists());

    let second = Controller::with_config(config)?;
    assert_eq!(second.reconciler().synonyms().len(), resolved);
    Ok(())
}

/// Test that a configured sense table that cannot be read stops construction
#[test]
fn test_withConfig_missingSenseTable_shouldFail() {
    let mut config = offline_config();
    config.synonyms.sense_table = Some(Path::new("does/not/exist.json").to_path_buf());

    assert!(Controller::with_config(config).is_err());
}

/// Test that the offline constructor ignores a configured provider
#[tokio::test]
async fn test_offline_withDatamuseConfigured_shouldStillReconcile() -> Result<()> {
    let mut config = Config::default();
    config.cache.backend = CacheBackend::Memory;
    assert_eq!(config.synonyms.provider, SynonymProvider::Datamuse);
    let controller = Controller::offline(config)?;

    let (text, report) = controller.reconcile_text("The colour faded.", Targets::chars(16)).await?;

    assert_eq!(text, "The color faded.");
    assert!(report.is_exact());
    Ok(())
}
