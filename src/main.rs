//! MDS - parse markdown step documents.
//!
//! This binary provides the CLI interface to the MDS parser, reading
//! documents from files or stdin and printing them as JSON or an outline.

mod cli;

use clap::Parser as ClapParser;
use cli::{Cli, OutputFormat};
use log::{debug, error, info, LevelFilter};
use std::io::{self, Read, Write};

use mds_config::Config;
use mds_core::{Document, Result};
use mds_parser::Parser;

fn main() {
    let cli = <Cli as ClapParser>::parse();

    // Handle --paths flag
    if cli.show_paths {
        cli::show_paths();
        return;
    }

    setup_logging(&cli.log_level);
    info!("mds v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}

/// Set up logging based on the log level argument.
fn setup_logging(level: &str) {
    let filter = match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Warn,
    };

    env_logger::Builder::new()
        .filter_level(filter)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

/// Main application logic.
fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    debug!(
        "markdown: {:?}, components: {:?}",
        config.markdown, config.components.registered
    );
    let parser = Parser::from_config(&config);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.should_read_stdin() {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        let doc = parser.parse(&source)?;
        emit(&mut out, cli, &doc)?;
    } else {
        for path in &cli.files {
            debug!("parsing {}", path.display());
            let source = std::fs::read_to_string(path)?;
            let doc = parser
                .parse(&source)
                .inspect_err(|_| error!("Failed to parse {}", path.display()))?;
            if cli.files.len() > 1 && cli.format == OutputFormat::Outline {
                writeln!(out, "==> {} <==", path.display())?;
            }
            emit(&mut out, cli, &doc)?;
        }
    }

    out.flush()?;
    Ok(())
}

/// Load configuration, apply the override argument, then `-C` components.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load().unwrap_or_else(|e| {
        error!("Failed to load config: {}", e);
        Config::default()
    });

    if let Some(ref config_arg) = cli.config {
        config.merge(&Config::resolve_override(config_arg)?);
        debug!("Merged config override");
    }

    for name in &cli.components {
        if !config.components.registered.contains(name) {
            config.components.registered.push(name.clone());
        }
    }

    Ok(config)
}

/// Print one document in the selected format.
fn emit<W: Write>(out: &mut W, cli: &Cli, doc: &Document) -> Result<()> {
    match cli.format {
        OutputFormat::Outline => write!(out, "{}", doc)?,
        OutputFormat::Json => {
            let json = if cli.compact {
                serde_json::to_string(doc)
            } else {
                serde_json::to_string_pretty(doc)
            }
            .map_err(io::Error::from)?;
            writeln!(out, "{}", json)?;
        }
    }
    Ok(())
}
