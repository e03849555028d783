//! Merging change records into a projected graph.

use std::collections::HashSet;
use tracing::{debug, warn};

use crate::plan::ChangeEnvelope;

use super::diagnostics::{DiagnosticKind, Diagnostics};
use super::model::ChangeGraph;

/// Decodes change records and merges them into vertices by address.
#[derive(Debug, Default, Clone)]
pub struct ChangeMerger {
    /// Addresses whose records are skipped without a diagnostic.
    excluded: HashSet<String>,
}

/// Result of a merge.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    /// Records merged into a vertex.
    pub merged: usize,
    /// Records skipped because their resource was excluded by configuration.
    pub excluded: usize,
    /// Records skipped, with the reason.
    pub diagnostics: Diagnostics,
}

impl ChangeMerger {
    /// Creates a new merger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the addresses left out of the graph on purpose.
    #[must_use]
    pub fn with_excluded(mut self, excluded: HashSet<String>) -> Self {
        self.excluded = excluded;
        self
    }

    /// Merges every record into `graph`.
    ///
    /// Records that fail to decode or whose address has no vertex are skipped
    /// and reported; the remaining records are still merged. Records are
    /// applied in iteration order, so a later record for the same address and
    /// instance key replaces an earlier one.
    pub fn merge<'a, I>(&self, graph: &mut ChangeGraph, envelopes: I) -> MergeOutcome
    where
        I: IntoIterator<Item = &'a ChangeEnvelope>,
    {
        let mut outcome = MergeOutcome::default();

        for (position, envelope) in envelopes.into_iter().enumerate() {
            let change = match envelope.decode() {
                Ok(change) => change,
                Err(e) => {
                    warn!("Skipping change record #{position}: {e}");
                    let subject = e
                        .address
                        .clone()
                        .unwrap_or_else(|| format!("record #{position}"));
                    outcome
                        .diagnostics
                        .push(DiagnosticKind::DecodeFailed, subject, e.message);
                    continue;
                }
            };

            if self.excluded.contains(&change.address) {
                debug!("Skipping change record for excluded {}", change.address);
                outcome.excluded += 1;
                continue;
            }

            if graph.apply_change(&change) {
                debug!(
                    "Merged {} {} [{}]",
                    change.action,
                    change.address,
                    change.instance_key()
                );
                outcome.merged += 1;
            } else {
                debug!("No vertex for change record {}", change.address);
                outcome.diagnostics.push(
                    DiagnosticKind::OrphanChange,
                    change.address,
                    format!("{} change has no matching resource vertex", change.action),
                );
            }
        }

        debug!(
            "Merged {} change record(s), excluded {}, skipped {}",
            outcome.merged,
            outcome.excluded,
            outcome.diagnostics.len()
        );
        outcome
    }
}
