//! Plan document loading.
//!
//! A plan document is the serialized output of the upstream plan engine: the
//! dependency graph it walked and the change records it produced.

use crate::error::{ChangeGraphError, InputError, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use super::changes::ChangeEnvelope;
use super::graph::PlanGraph;

/// Upstream plan output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanDocument {
    /// Dependency graph walked by the plan.
    pub graph: PlanGraph,
    /// Raw change records, one per resource instance.
    #[serde(default)]
    pub resource_changes: Vec<ChangeEnvelope>,
}

/// Reader for plan documents.
#[derive(Debug, Default)]
pub struct PlanReader;

impl PlanReader {
    /// Creates a new reader.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Loads a plan document from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<PlanDocument> {
        let path = path.as_ref();
        info!("Loading plan document from: {}", path.display());

        if !path.exists() {
            return Err(ChangeGraphError::Input(InputError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ChangeGraphError::Input(InputError::parse(
                format!("Failed to read file: {e}"),
                Some(path.display().to_string()),
            ))
        })?;

        self.parse_json(&content, Some(path))
    }

    /// Loads a plan document from a reader, typically standard input.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream cannot be read or parsed.
    pub fn load_reader(&self, mut reader: impl Read) -> Result<PlanDocument> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        self.parse_json(&content, None)
    }

    /// Parses a plan document from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or the graph section is malformed.
    pub fn parse_json(&self, content: &str, source: Option<&Path>) -> Result<PlanDocument> {
        debug!("Parsing plan document");

        let document: PlanDocument = serde_json::from_str(content).map_err(|e| {
            ChangeGraphError::Input(InputError::parse(
                format!("JSON parse error: {e}"),
                source.map(|p| p.display().to_string()),
            ))
        })?;

        let dangling = document.graph.dangling_edges();
        if dangling > 0 {
            warn!("Plan graph has {dangling} edge(s) referencing unknown nodes");
        }

        debug!(
            "Parsed plan document: {} node(s), {} edge(s), {} change record(s)",
            document.graph.nodes().len(),
            document.graph.edges().len(),
            document.resource_changes.len()
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DOCUMENT: &str = r#"{
        "graph": {
            "nodes": [
                {"id": "web", "kind": "resource", "address": "aws_instance.web", "mode": "managed"}
            ],
            "edges": []
        },
        "resource_changes": [
            {"address": "aws_instance.web", "action": "create", "before": null, "after": {"id": "i-1"}},
            {"address": 42}
        ]
    }"#;

    #[test]
    fn test_parse_document() {
        let document = PlanReader::new()
            .parse_json(DOCUMENT, None)
            .expect("document should parse");

        assert_eq!(document.graph.nodes().len(), 1);
        // Malformed records survive parsing; the merger reports them.
        assert_eq!(document.resource_changes.len(), 2);
    }

    #[test]
    fn test_changes_default_to_empty() {
        let document = PlanReader::new()
            .parse_json(r#"{"graph": {"nodes": [], "edges": []}}"#, None)
            .expect("document should parse");

        assert!(document.resource_changes.is_empty());
    }

    #[test]
    fn test_invalid_json_is_fatal() {
        let result = PlanReader::new().parse_json("{not json", None);
        assert!(matches!(
            result,
            Err(ChangeGraphError::Input(InputError::ParseError { .. }))
        ));
    }

    #[test]
    fn test_malformed_graph_is_fatal() {
        let result = PlanReader::new().parse_json(r#"{"graph": {"nodes": [{"kind": 3}]}}"#, None);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(DOCUMENT.as_bytes()).expect("Failed to write document");

        let document = PlanReader::new()
            .load_file(file.path())
            .expect("document should load");
        assert_eq!(document.resource_changes.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let result = PlanReader::new().load_file("/nonexistent/plan.json");
        assert!(matches!(
            result,
            Err(ChangeGraphError::Input(InputError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_load_reader() {
        let document = PlanReader::new()
            .load_reader(DOCUMENT.as_bytes())
            .expect("document should load");
        assert_eq!(document.graph.nodes().len(), 1);
    }
}
