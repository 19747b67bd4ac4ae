// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use spreadshred::app_config::{self, Config, SynonymProvider};
use spreadshred::{Controller, Targets};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fit a text file or a folder of text files to a length (default command)
    #[command(alias = "fit")]
    Reconcile(ReconcileArgs),

    /// Generate shell completions for spreadshred
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ReconcileArgs {
    /// Input text file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Target word count
    #[arg(short, long)]
    words: Option<usize>,

    /// Target character count
    #[arg(long)]
    chars: Option<usize>,

    /// Output file (single file input only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "spreadshred.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Never call the synonym service
    #[arg(long)]
    offline: bool,

    /// Re-wrap output lines to this width
    #[arg(long)]
    wrap: Option<usize>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,
}

/// spreadshred - fit prose to an exact length
///
/// Rewrites a text until its word and/or character count hits a target by
/// summarizing paragraphs, applying phrase rules and swapping words.
#[derive(Parser, Debug)]
#[command(name = "spreadshred")]
#[command(version)]
#[command(about = "Fit prose to an exact word or character count")]
#[command(long_about = "spreadshred rewrites a text until its word and/or character count hits a target.

EXAMPLES:
    spreadshred --words 500 essay.txt              # Fit to exactly 500 words
    spreadshred --chars 2000 abstract.txt          # Fit to exactly 2000 characters
    spreadshred -w 300 --chars 1800 note.txt       # Fit both counts
    spreadshred -w 300 -o short.txt note.txt       # Write to a chosen file
    spreadshred -w 300 --offline note.txt          # No synonym service calls
    spreadshred -w 250 /drafts/                    # Fit every .txt file in a folder
    spreadshred completions bash > spreadshred.bash

OUTPUT:
    Results are written to <name>.fitted.txt next to each input unless -o is
    given. An unreachable target is not an error: the closest text is written
    and the remaining difference is logged.

CONFIGURATION:
    Configuration is stored in spreadshred.json by default. You can specify a
    different config file with --config-path. If the config file doesn't exist,
    a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input text file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Target word count
    #[arg(short, long)]
    words: Option<usize>,

    /// Target character count
    #[arg(long)]
    chars: Option<usize>,

    /// Output file (single file input only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "spreadshred.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Never call the synonym service
    #[arg(long)]
    offline: bool,

    /// Re-wrap output lines to this width
    #[arg(long)]
    wrap: Option<usize>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize with trace so later set_max_level calls can raise verbosity
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "spreadshred", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Reconcile(args)) => run_reconcile(args).await,
        None => {
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

            let args = ReconcileArgs {
                input_path,
                words: cli.words,
                chars: cli.chars,
                output: cli.output,
                config_path: cli.config_path,
                log_level: cli.log_level,
                offline: cli.offline,
                wrap: cli.wrap,
                force_overwrite: cli.force_overwrite,
            };
            run_reconcile(args).await
        }
    }
}

/// Load the configuration and apply command line overrides
fn load_config(options: &ReconcileArgs) -> Result<Config> {
    let config_path = Path::new(&options.config_path);
    if !config_path.exists() {
        warn!("Config file not found at '{}', creating default config.", options.config_path);
    }
    let mut config = Config::load_or_create(config_path)?;

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if options.offline {
        config.synonyms.provider = SynonymProvider::None;
    }
    if let Some(width) = options.wrap {
        config.output.wrap_width = Some(width);
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

async fn run_reconcile(options: ReconcileArgs) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let config = load_config(&options)?;
    log::set_max_level(level_filter(&config.log_level));

    let targets = Targets::new(options.words, options.chars);
    if targets.is_empty() {
        warn!("No --words or --chars target given, the text will only be normalized");
    }

    let controller = Controller::with_config(config)?;

    if options.input_path.is_file() {
        if let Some(report) = controller
            .run(options.input_path.clone(), options.output.clone(), targets, options.force_overwrite)
            .await?
        {
            info!(
                "Final length: {} words, {} chars (remaining {:+} words, {:+} chars)",
                report.final_words,
                report.final_chars,
                report.remaining.words(),
                report.remaining.chars()
            );
        }
    } else if Controller::is_folder(&options.input_path) {
        if options.output.is_some() {
            return Err(anyhow!("--output cannot be used with a directory input"));
        }
        controller
            .run_folder(options.input_path.clone(), targets, options.force_overwrite)
            .await?;
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    Ok(())
}
