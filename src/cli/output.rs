//! Output formatting for CLI commands.
//!
//! The graph itself is always emitted as JSON; this module formats the
//! human-facing reports around it.

use colored::Colorize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::graph::{Diagnostics, Extraction, GraphSummary, Vertex};
use crate::plan::Action;

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Vertex row for table display.
#[derive(Tabled)]
struct VertexRow {
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Changes")]
    changes: String,
    #[tabled(rename = "Depends on")]
    depends_on: String,
}

/// Diagnostic row for table display.
#[derive(Tabled)]
struct DiagnosticRow {
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Detail")]
    message: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the summary of an extraction.
    #[must_use]
    pub fn format_summary(&self, extraction: &Extraction, digest: &str) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&SummaryJson {
                digest,
                merged: extraction.merged,
                excluded: extraction.excluded,
                diagnostics: extraction.diagnostics.len(),
                counts: extraction.graph.summary(),
            })
            .unwrap_or_default(),
            OutputFormat::Text => Self::format_summary_text(extraction, digest),
        }
    }

    /// Formats a summary as text.
    fn format_summary_text(extraction: &Extraction, digest: &str) -> String {
        let graph = &extraction.graph;
        if graph.is_empty() {
            return format!("{} No resources in plan graph.\n", "✓".green());
        }

        let mut output = String::new();
        let _ = writeln!(output, "\nChange Graph");
        let _ = write!(output, "   Digest: {}\n\n", &digest[..12.min(digest.len())]);

        let rows: Vec<VertexRow> = graph.vertices().iter().map(Self::vertex_row).collect();
        output.push_str(&Table::new(rows).to_string());
        output.push('\n');

        let summary: GraphSummary = graph.summary();
        if summary.has_changes() {
            let _ = write!(output, "\n{} {summary}\n", "Plan:".bold());
        } else {
            let _ = write!(output, "\n{} No changes planned.\n", "✓".green());
        }

        if extraction.excluded > 0 {
            let _ = writeln!(
                output,
                "{} change record(s) for excluded data sources ignored",
                extraction.excluded
            );
        }

        if !extraction.diagnostics.is_empty() {
            let _ = write!(
                output,
                "\n{} {} record(s) or node(s) skipped, run 'check' for details\n",
                "⚠".yellow(),
                extraction.diagnostics.len()
            );
        }

        output
    }

    /// Formats diagnostics for display.
    #[must_use]
    pub fn format_diagnostics(&self, diagnostics: &Diagnostics) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(diagnostics).unwrap_or_default(),
            OutputFormat::Text => {
                if diagnostics.is_empty() {
                    return format!(
                        "{} No diagnostics - every node and record was placed.\n",
                        "✓".green()
                    );
                }

                let rows: Vec<DiagnosticRow> = diagnostics
                    .iter()
                    .map(|d| DiagnosticRow {
                        kind: d.kind.to_string(),
                        subject: Self::truncate(&d.subject, 40),
                        message: Self::truncate(&d.message, 60),
                    })
                    .collect();

                let mut output =
                    format!("{} {} diagnostic(s):\n\n", "⚠".yellow(), diagnostics.len());
                output.push_str(&Table::new(rows).to_string());
                output.push('\n');
                output
            }
        }
    }

    fn vertex_row(vertex: &Vertex) -> VertexRow {
        let attributes: usize = vertex.changes.values().map(|attrs| attrs.len()).sum();
        VertexRow {
            address: vertex.address.clone(),
            kind: vertex.kind.to_string(),
            action: Self::format_action(vertex.action),
            changes: if vertex.changes.is_empty() {
                String::from("-")
            } else {
                format!("{} attr(s) in {} instance(s)", attributes, vertex.changes.len())
            },
            depends_on: Self::truncate(&vertex.depends_on.join(", "), 40),
        }
    }

    /// Formats an action with color.
    fn format_action(action: Option<Action>) -> String {
        match action {
            Some(Action::Create) => "+create".green().to_string(),
            Some(Action::Update) => "~update".yellow().to_string(),
            Some(Action::Delete) => "-delete".red().to_string(),
            Some(a @ (Action::DeleteThenCreate | Action::CreateThenDelete)) => {
                format!("±{a}").yellow().to_string()
            }
            Some(Action::Read) => "read".cyan().to_string(),
            Some(Action::NoOp) => "no-op".dimmed().to_string(),
            None => "-".dimmed().to_string(),
        }
    }

    /// Truncates a string to a maximum number of characters.
    fn truncate(s: &str, max_len: usize) -> String {
        if s.chars().count() <= max_len {
            s.to_string()
        } else {
            let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
            format!("{kept}...")
        }
    }
}

#[derive(serde::Serialize)]
struct SummaryJson<'a> {
    digest: &'a str,
    merged: usize,
    excluded: usize,
    diagnostics: usize,
    counts: GraphSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractorConfig;
    use crate::graph::extract;
    use crate::plan::PlanReader;

    fn extraction() -> Extraction {
        let document = PlanReader::new()
            .parse_json(
                r#"{
                    "graph": {
                        "nodes": [
                            {"id": "web", "kind": "resource", "address": "aws_instance.web", "mode": "managed"},
                            {"id": "lb", "kind": "resource", "address": "aws_instance.lb", "mode": "managed"}
                        ],
                        "edges": [{"source": "web", "target": "lb"}]
                    },
                    "resource_changes": [
                        {"address": "aws_instance.web", "action": "create", "after": {"id": "i-1"}},
                        {"address": "aws_instance.gone", "action": "delete"}
                    ]
                }"#,
                None,
            )
            .expect("document should parse");
        extract(&document, &ExtractorConfig::default())
    }

    #[test]
    fn test_text_summary_lists_vertices() {
        colored::control::set_override(false);
        let text = OutputFormatter::new(OutputFormat::Text)
            .format_summary(&extraction(), "abcdef0123456789");

        assert!(text.contains("aws_instance.web"));
        assert!(text.contains("aws_instance.lb"));
        assert!(text.contains("+create"));
        assert!(text.contains("abcdef012345"));
        assert!(text.contains("Plan: 1 to create, 0 to update, 0 to replace, 0 to destroy"));
        assert!(text.contains("1 record(s) or node(s) skipped"));
    }

    #[test]
    fn test_text_summary_without_changes() {
        colored::control::set_override(false);
        let document = PlanReader::new()
            .parse_json(
                r#"{"graph": {"nodes": [
                    {"id": "a", "kind": "resource", "address": "null_resource.a", "mode": "managed"}
                ]}}"#,
                None,
            )
            .expect("document should parse");
        let extraction = extract(&document, &ExtractorConfig::default());

        let text = OutputFormatter::new(OutputFormat::Text).format_summary(&extraction, "abc");
        assert!(text.contains("No changes planned."));
        assert!(!text.contains("to create"));
    }

    #[test]
    fn test_json_summary() {
        let text = OutputFormatter::new(OutputFormat::Json).format_summary(&extraction(), "abc");
        let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");

        assert_eq!(value["merged"], 1);
        assert_eq!(value["excluded"], 0);
        assert_eq!(value["diagnostics"], 1);
        assert_eq!(value["counts"]["creates"], 1);
        assert_eq!(value["counts"]["untouched"], 1);
    }

    #[test]
    fn test_diagnostics_json() {
        let text = OutputFormatter::new(OutputFormat::Json)
            .format_diagnostics(&extraction().diagnostics);
        let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");

        assert_eq!(value[0]["kind"], "orphan_change");
        assert_eq!(value[0]["subject"], "aws_instance.gone");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(OutputFormatter::truncate("short", 10), "short");
        assert_eq!(OutputFormatter::truncate("abcdefghijkl", 8), "abcde...");
    }
}
