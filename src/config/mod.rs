//! Configuration module for the extractor.
//!
//! This module handles all configuration-related functionality:
//! - Parsing and deserializing `changegraph.yaml`
//! - Applying `CHANGEGRAPH_*` environment overrides

mod parser;
mod spec;

pub use parser::{ConfigParser, DEFAULT_CONFIG_FILES, find_config_file};
pub use spec::{ExtractorConfig, OutputConfig};
