//! CLI module for the extractor.
//!
//! This module provides the command-line interface, report formatting and
//! command execution.

mod commands;
mod output;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use output::OutputFormatter;
pub use runner::execute;
