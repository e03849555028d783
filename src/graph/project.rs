//! Projection of the plan graph onto resource vertices.

use std::collections::HashSet;
use tracing::{debug, warn};

use crate::plan::{DependencyGraph, PlanNode, ResourceMode};

use super::diagnostics::{DiagnosticKind, Diagnostics};
use super::model::{ChangeGraph, Vertex};

/// Walks a dependency graph and keeps only its resource nodes.
#[derive(Debug, Clone, Copy)]
pub struct GraphProjector {
    /// Whether data sources become vertices.
    include_data_sources: bool,
}

/// Result of a projection.
#[derive(Debug, Default)]
pub struct Projection {
    /// The projected graph.
    pub graph: ChangeGraph,
    /// Nodes skipped along the way.
    pub diagnostics: Diagnostics,
    /// Addresses of data sources left out by configuration.
    pub excluded: HashSet<String>,
}

impl Default for GraphProjector {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphProjector {
    /// Creates a projector that keeps managed resources and data sources.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            include_data_sources: true,
        }
    }

    /// Sets whether data sources are kept.
    #[must_use]
    pub const fn with_data_sources(mut self, include: bool) -> Self {
        self.include_data_sources = include;
        self
    }

    /// Projects `graph` onto its resource nodes.
    ///
    /// Vertices appear in the order the graph yields its nodes. Each vertex
    /// depends on the resource nodes found at the source end of its incoming
    /// edges; every other node kind is skipped and contributes no edges.
    pub fn project<G: DependencyGraph>(&self, graph: &G) -> Projection {
        let mut projection = Projection::default();

        for node in graph.vertices() {
            if !node.is_resource() {
                continue;
            }

            let (Some(address), Some(mode)) = (node.resource_address(), node.resource_mode()) else {
                warn!("Skipping {}: no usable address or mode", node.label());
                projection.diagnostics.push(
                    DiagnosticKind::MalformedNode,
                    node.label(),
                    "resource node has no usable address or mode",
                );
                continue;
            };

            if !self.keeps(mode) {
                debug!("Skipping data source {address}");
                projection.excluded.insert(address.to_string());
                continue;
            }

            let depends_on = self.dependencies(graph, node);
            let vertex = Vertex::new(address, mode, depends_on);

            if let Err(rejected) = projection.graph.insert(vertex) {
                warn!("Skipping {}: address {} already projected", node.label(), rejected.address);
                projection.diagnostics.push(
                    DiagnosticKind::DuplicateAddress,
                    rejected.address,
                    format!("{} repeats an address already in the graph", node.label()),
                );
            }
        }

        debug!(
            "Projected {} resource vertex(es) with {} diagnostic(s)",
            projection.graph.len(),
            projection.diagnostics.len()
        );
        projection
    }

    /// Addresses of resource nodes with an edge into `node`, first occurrence only.
    fn dependencies<G: DependencyGraph>(&self, graph: &G, node: &G::Node) -> Vec<String> {
        let mut seen = HashSet::new();
        graph
            .edges_to(node)
            .into_iter()
            .filter(|source| source.is_resource())
            .filter(|source| source.resource_mode().is_some_and(|m| self.keeps(m)))
            .filter_map(|source| source.resource_address())
            .filter(|address| seen.insert(*address))
            .map(String::from)
            .collect()
    }

    const fn keeps(&self, mode: ResourceMode) -> bool {
        match mode {
            ResourceMode::Managed => true,
            ResourceMode::Data => self.include_data_sources,
        }
    }
}
