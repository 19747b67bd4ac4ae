/*!
 * Common test utilities for the spreadshred test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use spreadshred::LengthReconciler;
use spreadshred::patterns::PatternTable;
use spreadshred::providers::mock::MockSynonymSource;
use spreadshred::summarize::FrequencySummarizer;
use spreadshred::synonyms::{MemoryStore, SenseInventory, SynonymCache, SynonymStore};
use spreadshred::text::{RuleTagger, Tagger};


/// Four paragraphs of three, two, three and one sentences
pub const HOUND_TEXT: &str = "The hound howled across the moor at night. Holmes lit his pipe and listened. \
The hound was a spectral hound, the moor folk said.

Watson wrote long letters home. Letters reached London slowly.

Sir Henry walked the moor alone. The moor was wide and grey and silent. \
Henry feared the hound of the moor.

It was late.";

/// Route engine logs to the test output; safe to call more than once
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).filter_level(log::LevelFilter::Debug).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Synonym cache over `source` with an in-memory store
pub fn memory_cache(source: MockSynonymSource) -> SynonymCache {
    cache_with_store(source, Arc::new(MemoryStore::new()))
}

/// Synonym cache over `source` persisting into `store`
pub fn cache_with_store(source: MockSynonymSource, store: Arc<dyn SynonymStore>) -> SynonymCache {
    let tagger: Arc<dyn Tagger> = Arc::new(RuleTagger::new());
    SynonymCache::open(Arc::new(source), tagger, store, SenseInventory::new()).expect("memory store loads")
}

/// Engine with the built-in collaborators and rules
pub fn engine(source: MockSynonymSource) -> LengthReconciler {
    engine_with_cache(memory_cache(source))
}

/// Engine with the built-in collaborators around `cache`
pub fn engine_with_cache(cache: SynonymCache) -> LengthReconciler {
    LengthReconciler::new(
        Arc::new(RuleTagger::new()),
        Arc::new(FrequencySummarizer::new()),
        PatternTable::builtin().expect("built-in patterns parse"),
        cache,
    )
}
