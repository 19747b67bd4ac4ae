use anyhow::{Context, Result, anyhow};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{CacheBackend, Config, SynonymProvider};
use crate::file_utils::FileManager;
use crate::patterns::PatternTable;
use crate::providers::SynonymSource;
use crate::providers::datamuse::Datamuse;
use crate::providers::mock::MockSynonymSource;
use crate::reconcile::{LengthReconciler, ReconcileReport, Reconciler, Targets};
use crate::summarize::FrequencySummarizer;
use crate::synonyms::{JsonLogStore, MemoryStore, SenseInventory, SqliteStore, SynonymCache, SynonymStore};
use crate::text::normalize::wrap;
use crate::text::{RuleTagger, Tagger};

// @module: Application controller for length reconciliation

/// Extension of the text files picked up in folder mode
pub const TEXT_EXTENSION: &str = "txt";

/// Main application controller: wires the engine from configuration and
/// runs it over files
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Engine built from the configuration
    reconciler: LengthReconciler,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let offline = config.synonyms.provider == SynonymProvider::None;
        Self::build(config, offline)
    }

    /// Create a controller that never calls the synonym service
    pub fn offline(config: Config) -> Result<Self> {
        Self::build(config, true)
    }

    fn build(config: Config, offline: bool) -> Result<Self> {
        let tagger: Arc<dyn Tagger> = Arc::new(RuleTagger::new());
        let patterns = PatternTable::load(config.patterns.path.as_deref()).context("Failed to load phrase rules")?;

        let senses = match &config.synonyms.sense_table {
            Some(path) => SenseInventory::from_json_file(path)
                .with_context(|| format!("Failed to load sense table: {:?}", path))?,
            None => SenseInventory::new(),
        };

        let source = Self::create_source(&config, offline);
        let store = Self::create_store(&config)?;
        let synonyms = SynonymCache::open(source, tagger.clone(), store, senses)
            .context("Failed to open synonym cache")?
            .with_lookup_timeout(Self::lookup_timeout(&config));
        debug!("Synonym cache opened with {} entries", synonyms.len());

        let reconciler = LengthReconciler::new(tagger, Arc::new(FrequencySummarizer::new()), patterns, synonyms)
            .with_options(config.reconcile_options());

        Ok(Self { config, reconciler })
    }

    fn create_source(config: &Config, offline: bool) -> Arc<dyn SynonymSource> {
        if offline {
            info!("Running offline, synonym lookups disabled");
            return Arc::new(MockSynonymSource::offline());
        }
        let synonyms = &config.synonyms;
        Arc::new(Datamuse::new_with_config(
            synonyms.endpoint.clone(),
            synonyms.timeout_secs,
            synonyms.retry_count,
            synonyms.retry_backoff_ms,
            synonyms.max_results,
        ))
    }

    fn create_store(config: &Config) -> Result<Arc<dyn SynonymStore>> {
        let Some(path) = config.cache.resolved_path() else {
            if config.cache.backend != CacheBackend::Memory {
                warn!("No data directory available, synonym cache will not persist");
            }
            return Ok(Arc::new(MemoryStore::new()));
        };

        let store: Arc<dyn SynonymStore> = match config.cache.backend {
            CacheBackend::JsonLog => Arc::new(
                JsonLogStore::open(&path).with_context(|| format!("Failed to open synonym log: {:?}", path))?,
            ),
            CacheBackend::Sqlite => Arc::new(
                SqliteStore::open(&path).with_context(|| format!("Failed to open synonym database: {:?}", path))?,
            ),
            CacheBackend::Memory => Arc::new(MemoryStore::new()),
        };
        debug!("Synonym cache: {}", store.describe());
        Ok(store)
    }

    /// Upper bound for one lookup including every retry and its backoff
    fn lookup_timeout(config: &Config) -> Duration {
        let synonyms = &config.synonyms;
        let attempts = u64::from(synonyms.retry_count) + 1;
        let backoff_ms: u64 = (0..synonyms.retry_count)
            .map(|attempt| synonyms.retry_backoff_ms.saturating_mul(1 << attempt.min(16)))
            .sum();
        Duration::from_secs(synonyms.timeout_secs.saturating_mul(attempts)) + Duration::from_millis(backoff_ms)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn reconciler(&self) -> &LengthReconciler {
        &self.reconciler
    }

    /// Reconcile a text in memory, applying the configured output wrapping
    pub async fn reconcile_text(&self, text: &str, targets: Targets) -> Result<(String, ReconcileReport)> {
        let outcome = self.reconciler.reconcile(text, targets).await?;
        let rendered = match self.config.output.wrap_width {
            Some(width) => wrap(&outcome.text, width),
            None => outcome.text,
        };
        Ok((rendered, outcome.report))
    }

    /// Reconcile one file. Returns `None` when the output exists and
    /// `force_overwrite` is off.
    pub async fn run(
        &self,
        input_file: PathBuf,
        output_file: Option<PathBuf>,
        targets: Targets,
        force_overwrite: bool,
    ) -> Result<Option<ReconcileReport>> {
        let start_time = std::time::Instant::now();

        if !FileManager::file_exists(&input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let output_path =
            output_file.unwrap_or_else(|| FileManager::generate_output_path(&input_file, TEXT_EXTENSION));
        if output_path.exists() && !force_overwrite {
            warn!("Skipping file, output already exists (use -f to force overwrite): {:?}", output_path);
            return Ok(None);
        }

        let content = FileManager::read_to_string(&input_file)?;
        let (text, report) = self.reconcile_text(&content, targets).await?;
        FileManager::write_to_file(&output_path, &text)?;

        if report.is_exact() {
            info!("Success: {} ({})", output_path.display(), report);
        } else {
            warn!("Target not reached for {}: {}", output_path.display(), report);
        }
        debug!("Finished in {}", Self::format_duration(start_time.elapsed()));

        Ok(Some(report))
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }

    /// Reconcile every text file under a directory, writing each result
    /// next to its input. Files with an existing output are skipped.
    pub async fn run_folder(&self, input_dir: PathBuf, targets: Targets, force_overwrite: bool) -> Result<FolderSummary> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let text_files = FileManager::find_files(&input_dir, TEXT_EXTENSION)?;
        if text_files.is_empty() {
            return Err(anyhow!("No text files found in directory: {:?}", input_dir));
        }

        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(text_files.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Processing files");

        let mut summary = FolderSummary::default();

        for text_file in &text_files {
            let file_name = text_file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            match self.run(text_file.clone(), None, targets, force_overwrite).await {
                Ok(Some(report)) => {
                    summary.processed += 1;
                    if !report.is_exact() {
                        summary.missed += 1;
                    }
                }
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {}", file_name, e);
                    summary.errors += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        info!(
            "Folder processing completed in {}: {}",
            Self::format_duration(start_time.elapsed()),
            summary
        );

        Ok(summary)
    }

    /// Whether `path` should be handled by [`Controller::run_folder`]
    pub fn is_folder(path: &Path) -> bool {
        FileManager::dir_exists(path)
    }
}

/// Counts of a folder run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
    /// Processed files whose targets were not reached
    pub missed: usize,
}

impl std::fmt::Display for FolderSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} processed ({} off target), {} skipped, {} errors",
            self.processed, self.missed, self.skipped, self.errors
        )
    }
}
