//! Command execution.
//!
//! Runs a parsed [`Cli`] against an already resolved configuration. Input and
//! output streams are passed in so the binary can hand over stdin and stdout.

use std::io::{Read, Write};
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::config::ExtractorConfig;
use crate::error::Result;
use crate::graph::extract;
use crate::plan::{PlanDocument, PlanReader};

use super::commands::{Cli, Commands};
use super::output::OutputFormatter;

/// Executes the selected command.
///
/// The plan document is read from the command's input path, or from `stdin`
/// when there is none. Reports go to `stdout`. In strict mode any diagnostic
/// fails the command after its report has been written; `extract` fails
/// before writing anything.
///
/// # Errors
///
/// Returns an error if the document cannot be read, output cannot be
/// written, or strict mode rejects the run.
pub fn execute<R, W>(cli: &Cli, config: &ExtractorConfig, stdin: R, stdout: &mut W) -> Result<()>
where
    R: Read,
    W: Write,
{
    let document = load_document(cli.command.input(), stdin)?;
    let extraction = extract(&document, config);
    for diagnostic in extraction.diagnostics.iter() {
        warn!("{diagnostic}");
    }

    let formatter = OutputFormatter::new(cli.output);
    match &cli.command {
        Commands::Extract { pretty, .. } => {
            extraction.ensure_clean(config.strict)?;
            let json = if *pretty || config.output.pretty {
                extraction.graph.to_json_pretty()?
            } else {
                extraction.graph.to_json()?
            };
            emit(stdout, &json)
        }
        Commands::Summary { .. } => {
            let digest = extraction.digest()?;
            emit(stdout, &formatter.format_summary(&extraction, &digest))?;
            extraction.ensure_clean(config.strict)
        }
        Commands::Check { .. } => {
            emit(stdout, &formatter.format_diagnostics(&extraction.diagnostics))?;
            extraction.ensure_clean(config.strict)
        }
    }
}

fn load_document(input: Option<&PathBuf>, stdin: impl Read) -> Result<PlanDocument> {
    let reader = PlanReader::new();
    match input {
        Some(path) => reader.load_file(path),
        None => {
            debug!("Reading plan document from stdin");
            reader.load_reader(stdin)
        }
    }
}

fn emit(stdout: &mut impl Write, text: &str) -> Result<()> {
    writeln!(stdout, "{text}")?;
    stdout.flush()?;
    Ok(())
}
