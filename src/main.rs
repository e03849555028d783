//! changegraph CLI entrypoint.
//!
//! This is the main entrypoint for the changegraph command-line tool.

use std::path::Path;
use std::process::ExitCode;

use changegraph::cli::{Cli, execute};
use changegraph::config::{ConfigParser, ExtractorConfig};
use changegraph::error::Result;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
///
/// Logs go to stderr so stdout carries only the graph.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolves configuration and runs the selected command.
fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    execute(cli, &config, std::io::stdin().lock(), &mut std::io::stdout().lock())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Loads `.env` and resolves the configuration.
fn load_config(config_path: Option<&Path>) -> Result<ExtractorConfig> {
    let base = config_path
        .and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let parser = ConfigParser::new().with_base_path(base);
    parser.load_dotenv()?;

    let config = parser.resolve(config_path)?;
    debug!("Effective configuration: {config:?}");
    Ok(config)
}
