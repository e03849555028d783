//! Change graph extraction.
//!
//! This module turns a plan document into the annotated dependency graph:
//! the [`GraphProjector`] keeps the resource nodes of the plan graph and the
//! [`ChangeMerger`] folds the change records into them. [`extract`] runs both.

mod diagnostics;
mod merge;
mod model;
mod project;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use merge::{ChangeMerger, MergeOutcome};
pub use model::{AttributeChanges, ChangeGraph, GraphSummary, Vertex};
pub use project::{GraphProjector, Projection};

use sha2::{Digest, Sha256};
use tracing::info;

use crate::config::ExtractorConfig;
use crate::error::{ExtractError, Result};
use crate::plan::PlanDocument;

/// Outcome of a full extraction run.
#[derive(Debug)]
pub struct Extraction {
    /// The annotated graph.
    pub graph: ChangeGraph,
    /// Number of change records merged into a vertex.
    pub merged: usize,
    /// Number of change records for resources excluded by configuration.
    pub excluded: usize,
    /// Everything skipped during projection and merge.
    pub diagnostics: Diagnostics,
}

/// Projects the document's graph and merges its change records.
#[must_use]
pub fn extract(document: &PlanDocument, config: &ExtractorConfig) -> Extraction {
    let projector = GraphProjector::new().with_data_sources(config.output.include_data_sources);
    let Projection {
        mut graph,
        mut diagnostics,
        excluded,
    } = projector.project(&document.graph);

    let outcome = ChangeMerger::new()
        .with_excluded(excluded)
        .merge(&mut graph, &document.resource_changes);
    diagnostics.extend(outcome.diagnostics);

    info!(
        "Extracted {} vertex(es), merged {} of {} change record(s), {} excluded",
        graph.len(),
        outcome.merged,
        document.resource_changes.len(),
        outcome.excluded
    );

    Extraction {
        graph,
        merged: outcome.merged,
        excluded: outcome.excluded,
        diagnostics,
    }
}

impl Extraction {
    /// Fails when `strict` is set and anything was reported.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::DiagnosticsRejected`] in strict mode when diagnostics exist.
    pub fn ensure_clean(&self, strict: bool) -> Result<()> {
        if strict && !self.diagnostics.is_empty() {
            return Err(ExtractError::DiagnosticsRejected {
                count: self.diagnostics.len(),
            }
            .into());
        }
        Ok(())
    }

    /// Hex SHA-256 of the compact JSON output.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph cannot be serialized.
    pub fn digest(&self) -> Result<String> {
        let json = self.graph.to_json()?;
        Ok(hex::encode(Sha256::digest(json.as_bytes())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChangeGraphError;
    use crate::plan::PlanReader;
    use serde_json::json;

    const SCENARIO: &str = r#"{
        "graph": {
            "nodes": [
                {"id": "root", "kind": "module"},
                {"id": "web", "kind": "resource", "address": "aws_instance.web", "mode": "managed"},
                {"id": "lb", "kind": "resource", "address": "aws_instance.lb", "mode": "managed"}
            ],
            "edges": [
                {"source": "root", "target": "web"},
                {"source": "web", "target": "lb"}
            ]
        },
        "resource_changes": [
            {"address": "aws_instance.web", "index": null, "action": "create",
             "before": null, "after": {"id": "i-1"}}
        ]
    }"#;

    fn scenario() -> Extraction {
        let document = PlanReader::new()
            .parse_json(SCENARIO, None)
            .expect("scenario should parse");
        extract(&document, &ExtractorConfig::default())
    }

    #[test]
    fn test_scenario_output() {
        let extraction = scenario();
        let output: serde_json::Value =
            serde_json::from_str(&extraction.graph.to_json().expect("json")).expect("valid json");

        assert_eq!(
            output,
            json!([
                {
                    "type": "managed",
                    "mode": "create",
                    "addr": "aws_instance.web",
                    "changes": {"0": {"id": "i-1"}},
                    "to": []
                },
                {
                    "type": "managed",
                    "mode": "",
                    "addr": "aws_instance.lb",
                    "changes": {},
                    "to": ["aws_instance.web"]
                }
            ])
        );
        assert_eq!(extraction.merged, 1);
        assert!(extraction.diagnostics.is_empty());
    }

    #[test]
    fn test_output_is_byte_identical_across_runs() {
        let document = PlanReader::new()
            .parse_json(SCENARIO, None)
            .expect("scenario should parse");
        let config = ExtractorConfig::default();

        let first = extract(&document, &config).graph.to_json().expect("json");
        for _ in 0..10 {
            let again = extract(&document, &config).graph.to_json().expect("json");
            assert_eq!(again, first);
        }
    }

    #[test]
    fn test_digest_is_stable() {
        let a = scenario().digest().expect("digest");
        let b = scenario().digest().expect("digest");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_strict_mode_rejects_diagnostics() {
        let document = PlanReader::new()
            .parse_json(
                r#"{"graph": {"nodes": []},
                    "resource_changes": [{"address": "aws_instance.gone", "action": "delete"}]}"#,
                None,
            )
            .expect("document should parse");
        let extraction = extract(&document, &ExtractorConfig::default());

        assert!(extraction.graph.is_empty());
        assert!(extraction.ensure_clean(false).is_ok());
        assert!(matches!(
            extraction.ensure_clean(true),
            Err(ChangeGraphError::Extract(ExtractError::DiagnosticsRejected { count: 1 }))
        ));
    }

    #[test]
    fn test_empty_document_gives_empty_array() {
        let document = PlanDocument::default();
        let extraction = extract(&document, &ExtractorConfig::default());

        assert_eq!(extraction.graph.to_json().expect("json"), "[]");
        assert!(extraction.ensure_clean(true).is_ok());
    }
}
