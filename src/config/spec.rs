//! Configuration types for the extractor.
//!
//! These structs map to `changegraph.yaml`. Every field has a default, so an
//! absent file and an empty file behave the same.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Output settings.
    pub output: OutputConfig,
    /// Treat any diagnostic as a failure.
    pub strict: bool,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// Indent the JSON output.
    pub pretty: bool,
    /// Keep data sources as vertices.
    pub include_data_sources: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: false,
            include_data_sources: true,
        }
    }
}
