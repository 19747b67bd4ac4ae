/*!
 * Tests for application configuration
 */

use anyhow::Result;
use std::path::PathBuf;
use std::str::FromStr;

use spreadshred::app_config::{CacheBackend, Config, LogLevel, SynonymProvider};
use crate::common;

/// Test that a missing config file is created with defaults
#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nested").join("spreadshred.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(config.engine.max_candidates, 24);
    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded.synonyms.endpoint, config.synonyms.endpoint);
    Ok(())
}

/// Test that values written to disk survive a reload
#[test]
fn test_save_thenLoad_shouldKeepValues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("config.json");
    let mut config = Config::default();
    config.cache.backend = CacheBackend::Sqlite;
    config.synonyms.provider = SynonymProvider::None;
    config.output.wrap_width = Some(72);
    config.log_level = LogLevel::Debug;

    config.save(&path)?;
    let loaded = Config::load_or_create(&path)?;

    assert_eq!(loaded.cache.backend, CacheBackend::Sqlite);
    assert_eq!(loaded.synonyms.provider, SynonymProvider::None);
    assert_eq!(loaded.output.wrap_width, Some(72));
    assert_eq!(loaded.log_level, LogLevel::Debug);
    Ok(())
}

/// Test that a malformed config file is an error
#[test]
fn test_loadOrCreate_withMalformedFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "config.json", "{\"engine\": ")?;

    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

/// Test that validation rejects each inconsistent setting
#[test]
fn test_validate_withInvalidValues_shouldFail() {
    let mut config = Config::default();
    config.synonyms.concurrent_requests = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.synonyms.timeout_secs = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.synonyms.endpoint = "  ".to_string();
    assert!(config.validate().is_err());

    config.synonyms.provider = SynonymProvider::None;
    assert!(config.validate().is_ok());
}

/// Test parsing of provider, backend and log level names
#[test]
fn test_fromStr_shouldAcceptKnownNames() {
    assert_eq!(SynonymProvider::from_str("Datamuse").unwrap(), SynonymProvider::Datamuse);
    assert_eq!(SynonymProvider::from_str("offline").unwrap(), SynonymProvider::None);
    assert!(SynonymProvider::from_str("wordnet").is_err());

    assert_eq!(CacheBackend::from_str("json").unwrap(), CacheBackend::JsonLog);
    assert_eq!(CacheBackend::from_str("SQLITE").unwrap(), CacheBackend::Sqlite);
    assert!(CacheBackend::from_str("redis").is_err());

    assert_eq!(LogLevel::from_str("warning").unwrap(), LogLevel::Warn);
    assert!(LogLevel::from_str("loud").is_err());
}

/// Test that provider names round-trip through Display
#[test]
fn test_synonymProvider_display_shouldBeLowercase() {
    assert_eq!(SynonymProvider::Datamuse.to_string(), "datamuse");
    assert_eq!(SynonymProvider::None.to_string(), "none");
}

/// Test that an explicit cache path wins over the data directory
#[test]
fn test_resolvedPath_withExplicitPath_shouldUseIt() {
    let mut config = Config::default();
    config.cache.path = Some("/tmp/custom.jsonl".into());
    assert_eq!(config.cache.resolved_path(), Some(PathBuf::from("/tmp/custom.jsonl")));
}
