use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};

use crate::reconcile::{ReconcileOptions, SearchLimits};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Engine bounds and pass switches
    #[serde(default)]
    pub engine: EngineConfig,

    /// Synonym lookup service
    #[serde(default)]
    pub synonyms: SynonymConfig,

    /// Synonym cache persistence
    #[serde(default)]
    pub cache: CacheConfig,

    /// Phrase rule source
    #[serde(default)]
    pub patterns: PatternsConfig,

    /// Output formatting
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Synonym lookup provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SynonymProvider {
    // @provider: Datamuse "means like" API
    #[default]
    Datamuse,
    // @provider: No external lookups
    None,
}

impl SynonymProvider {
    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Datamuse => "datamuse".to_string(),
            Self::None => "none".to_string(),
        }
    }
}

impl std::fmt::Display for SynonymProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for SynonymProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "datamuse" => Ok(Self::Datamuse),
            "none" | "offline" => Ok(Self::None),
            _ => Err(anyhow!("Invalid synonym provider: {}", s)),
        }
    }
}

/// Synonym cache backend type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    // @backend: Append-only JSON lines file
    #[default]
    JsonLog,
    // @backend: SQLite database
    Sqlite,
    // @backend: Process memory only
    Memory,
}

impl CacheBackend {
    /// File name used when no explicit path is configured
    pub fn default_file_name(&self) -> &'static str {
        match self {
            Self::JsonLog => "synonyms.jsonl",
            Self::Sqlite => "synonyms.db",
            Self::Memory => "",
        }
    }
}

impl std::str::FromStr for CacheBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "jsonlog" | "json" => Ok(Self::JsonLog),
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            _ => Err(anyhow!("Invalid cache backend: {}", s)),
        }
    }
}

/// Engine configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EngineConfig {
    /// Maximum summary candidates fed to the combination search
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,

    /// Maximum nodes the combination search may visit
    #[serde(default = "default_search_node_budget")]
    pub search_node_budget: usize,

    /// Run the paragraph summarization pass
    #[serde(default = "default_true")]
    pub enable_summarization: bool,

    /// Run the phrase substitution pass
    #[serde(default = "default_true")]
    pub enable_phrases: bool,

    /// Run the token substitution pass
    #[serde(default = "default_true")]
    pub enable_tokens: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_candidates: default_max_candidates(),
            search_node_budget: default_search_node_budget(),
            enable_summarization: true,
            enable_phrases: true,
            enable_tokens: true,
        }
    }
}

/// Synonym lookup service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SynonymConfig {
    /// Lookup provider to use
    #[serde(default)]
    pub provider: SynonymProvider,

    /// Service endpoint URL
    #[serde(default = "default_datamuse_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Maximum number of concurrent lookups during warm-up
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Maximum candidates requested per lookup
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Optional JSON file mapping words to their number of senses
    #[serde(default)]
    pub sense_table: Option<PathBuf>,
}

impl Default for SynonymConfig {
    fn default() -> Self {
        Self {
            provider: SynonymProvider::default(),
            endpoint: default_datamuse_endpoint(),
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            concurrent_requests: default_concurrent_requests(),
            max_results: default_max_results(),
            sense_table: None,
        }
    }
}

/// Synonym cache configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CacheConfig {
    /// Storage backend
    #[serde(default)]
    pub backend: CacheBackend,

    /// Storage location; defaults to the user data directory
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl CacheConfig {
    /// Configured path, or the backend's file under the user data directory
    pub fn resolved_path(&self) -> Option<PathBuf> {
        if self.backend == CacheBackend::Memory {
            return None;
        }
        self.path.clone().or_else(|| {
            dirs::data_dir().map(|dir| dir.join("spreadshred").join(self.backend.default_file_name()))
        })
    }
}

/// Phrase rule configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PatternsConfig {
    /// JSON rule file replacing the built-in rules
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Output configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct OutputConfig {
    /// Re-wrap output lines to this width
    #[serde(default)]
    pub wrap_width: Option<usize>,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(anyhow!("Invalid log level: {}", s)),
        }
    }
}

fn default_max_candidates() -> usize {
    24
}

fn default_search_node_budget() -> usize {
    2_000_000
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_retry_count() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    500 // doubled on each retry
}

fn default_max_results() -> usize {
    100
}

fn default_true() -> bool {
    true
}

fn default_datamuse_endpoint() -> String {
    crate::providers::datamuse::DEFAULT_ENDPOINT.to_string()
}

impl Config {
    /// Load the configuration from `path`, writing a default file when missing
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            return Ok(config);
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_json::from_str(&raw).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
            }
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, json).with_context(|| format!("Failed to write config file: {:?}", path))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.engine.max_candidates == 0 {
            return Err(anyhow!("engine.max_candidates must be at least 1"));
        }

        if self.synonyms.concurrent_requests == 0 {
            return Err(anyhow!("synonyms.concurrent_requests must be at least 1"));
        }

        if self.synonyms.timeout_secs == 0 {
            return Err(anyhow!("synonyms.timeout_secs must be at least 1"));
        }

        if self.synonyms.provider == SynonymProvider::Datamuse && self.synonyms.endpoint.trim().is_empty() {
            return Err(anyhow!("An endpoint is required for the datamuse provider"));
        }

        if let Some(width) = self.output.wrap_width {
            if width < 10 {
                return Err(anyhow!("output.wrap_width must be at least 10, got {}", width));
            }
        }

        Ok(())
    }

    /// Engine options derived from this configuration
    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            limits: SearchLimits {
                max_candidates: self.engine.max_candidates,
                node_budget: self.engine.search_node_budget,
            },
            enable_summarization: self.engine.enable_summarization,
            enable_phrases: self.engine.enable_phrases,
            enable_tokens: self.engine.enable_tokens,
            warm_concurrency: self.synonyms.concurrent_requests,
        }
    }
}
