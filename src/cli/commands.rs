//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// changegraph - Annotated dependency graph of a planned infrastructure change.
#[derive(Parser, Debug)]
#[command(name = "changegraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true, env = "CHANGEGRAPH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for reports (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the change graph as JSON.
    Extract {
        /// Plan document to read ('-' or omitted for stdin).
        input: Option<PathBuf>,

        /// Indent the JSON output.
        #[arg(short, long)]
        pretty: bool,
    },

    /// Show a table of the change graph and its action counts.
    Summary {
        /// Plan document to read ('-' or omitted for stdin).
        input: Option<PathBuf>,
    },

    /// Report records and nodes that could not be placed in the graph.
    Check {
        /// Plan document to read ('-' or omitted for stdin).
        input: Option<PathBuf>,
    },
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

impl Commands {
    /// Plan document path, `None` meaning standard input.
    #[must_use]
    pub fn input(&self) -> Option<&PathBuf> {
        let input = match self {
            Self::Extract { input, .. } | Self::Summary { input } | Self::Check { input } => input,
        };
        input.as_ref().filter(|p| p.as_os_str() != "-")
    }
}
