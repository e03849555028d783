//! Error types for the change-graph extractor.
//!
//! Fatal failures (configuration, unreadable plan documents, I/O) are modeled
//! here. Per-record problems found while projecting or merging are not errors;
//! they are collected as [`crate::graph::Diagnostics`] and only become an
//! [`ExtractError`] when the caller asks for strict handling.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the extractor.
#[derive(Debug, Error)]
pub enum ChangeGraphError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Plan document errors.
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Extraction errors.
    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Output serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// An environment override holds an unusable value.
    #[error("Invalid value '{value}' for environment variable {name}")]
    InvalidEnvValue {
        /// Name of the variable.
        name: String,
        /// The rejected value.
        value: String,
    },
}

/// Errors reading the upstream plan document.
#[derive(Debug, Error)]
pub enum InputError {
    /// The plan document was not found.
    #[error("Plan document not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The plan document could not be parsed.
    #[error("Failed to parse plan document: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },
}

/// Errors raised by the extraction pipeline.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Strict mode refused a run that produced diagnostics.
    #[error("{count} diagnostic(s) reported while extracting the change graph")]
    DiagnosticsRejected {
        /// Number of diagnostics collected.
        count: usize,
    },
}

/// Result type alias for extractor operations.
pub type Result<T> = std::result::Result<T, ChangeGraphError>;

impl InputError {
    /// Creates a parse error for the given source.
    #[must_use]
    pub fn parse(message: impl Into<String>, location: Option<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            location,
        }
    }
}

impl ConfigError {
    /// Creates a parse error for the given source.
    #[must_use]
    pub fn parse(message: impl Into<String>, location: Option<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            location,
        }
    }
}
