//! Command-line interface for MDS.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// How parsed documents are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The full document as JSON
    Json,
    /// One line per step
    Outline,
}

/// MDS - parse markdown step documents.
///
/// Splits documents into linked steps, extracts their metadata and lifts
/// registered components out of the content.
#[derive(Parser, Debug)]
#[command(
    name = "mds",
    author = "MDS Contributors",
    version,
    about = "Parse MDS step documents into linked steps with metadata",
    after_help = "Examples:\n  \
                  cat lesson.md | mds\n  \
                  mds -f outline lesson.md\n  \
                  mds -C card -C quiz --compact lesson.md\n  \
                  mds -c ./mds.toml lesson.md"
)]
pub struct Cli {
    /// Input files to parse (reads from stdin if not provided)
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(short = 'l', long = "loglevel", default_value = "warn")]
    pub log_level: String,

    /// Use a custom config file or inline TOML
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Register a component name (repeatable)
    #[arg(short = 'C', long = "component", value_name = "NAME")]
    pub components: Vec<String>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Print JSON on a single line
    #[arg(long = "compact")]
    pub compact: bool,

    /// Show configuration paths and exit
    #[arg(long = "paths")]
    pub show_paths: bool,
}

impl Cli {
    /// Check if we should read from stdin.
    pub fn should_read_stdin(&self) -> bool {
        self.files.is_empty()
    }
}

/// Show paths information.
pub fn show_paths() {
    use mds_config::Config;

    let config_path = Config::config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not found)".to_string());

    println!("paths:");
    println!("  config                {}", config_path);
}
