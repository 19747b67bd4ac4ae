/*!
 * # spreadshred - fit prose to an exact word or character count
 *
 * A Rust library that rewrites English text until its length hits a target,
 * changing as little meaning as it can.
 *
 * ## Features
 *
 * - Exact word and/or character targets
 * - Paragraph summarization chosen by an exact-sum combination search
 * - Contraction, filler and compound phrase rules, applied both ways
 * - Same-tag synonym swaps and British/American spelling swaps
 * - Persistent synonym cache (JSON lines or SQLite)
 * - Configurable engine bounds and pass switches
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `text`: Normalization, documents and part-of-speech tagging
 * - `patterns`: Phrase rule table and regional spellings
 * - `synonyms`: Memoized synonym resolution and its persistence
 * - `summarize`: Extractive paragraph summarization
 * - `reconcile`: The three-pass length reconciliation engine:
 *   - `reconcile::combination`: Exact-sum subset search
 *   - `reconcile::paragraph_pass`: Pass 1, paragraph summaries
 *   - `reconcile::phrase_pass`: Pass 2, phrase rules
 *   - `reconcile::token_pass`: Pass 3, token swaps
 * - `providers`: Client implementations for synonym lookup services:
 *   - `providers::datamuse`: Datamuse API client
 *   - `providers::mock`: In-memory sources
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod patterns;
pub mod providers;
pub mod reconcile;
pub mod summarize;
pub mod synonyms;
pub mod text;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{AppError, ProviderError, ReconcileError, StoreError};
pub use patterns::PatternTable;
pub use reconcile::{LengthReconciler, ReconcileOutcome, ReconcileReport, Reconciler, Targets};
pub use synonyms::SynonymCache;
pub use text::{Document, char_count, word_count};
