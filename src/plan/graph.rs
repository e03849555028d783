//! Upstream dependency graph contract.
//!
//! The projector only needs two capabilities from the plan engine's graph:
//! enumerating nodes in discovery order and enumerating the sources of edges
//! incoming to a node. [`DependencyGraph`] and [`PlanNode`] capture exactly
//! that; [`PlanGraph`] is the serialized form read from plan documents.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Mode of a resource node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceMode {
    /// A managed resource, created and destroyed by the plan.
    Managed,
    /// A data source, read during the plan.
    Data,
}

/// Capability query on a single graph node.
pub trait PlanNode {
    /// Returns true if the node is a plannable resource.
    fn is_resource(&self) -> bool;

    /// Canonical address of the resource, if the node has a usable one.
    fn resource_address(&self) -> Option<&str>;

    /// Mode of the resource, if the node has a usable one.
    fn resource_mode(&self) -> Option<ResourceMode>;

    /// Short label used in diagnostics.
    fn label(&self) -> String;
}

/// A directed graph of plan nodes.
pub trait DependencyGraph {
    /// Node type of the graph.
    type Node: PlanNode;

    /// All nodes, in discovery order.
    fn vertices(&self) -> Vec<&Self::Node>;

    /// Sources of every edge whose target is `node`, in edge order.
    fn edges_to(&self, node: &Self::Node) -> Vec<&Self::Node>;
}

/// Node kinds found in a plan graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Plannable resource or data source.
    Resource,
    /// Provider configuration.
    Provider,
    /// Local value.
    Local,
    /// Output value.
    Output,
    /// Module call.
    Module,
    /// Input variable.
    Variable,
    /// Anything else the engine emits.
    #[serde(other)]
    Other,
}

/// A node in a serialized plan graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    /// Identifier referenced by edges.
    pub id: String,
    /// Node kind.
    pub kind: NodeKind,
    /// Resource address (resource nodes only).
    #[serde(default)]
    pub address: Option<String>,
    /// Resource mode (resource nodes only).
    #[serde(default)]
    pub mode: Option<ResourceMode>,
}

/// A directed edge; `target` depends on `source`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Node the edge starts from (the dependency).
    pub source: String,
    /// Node the edge points to (the dependent).
    pub target: String,
}

#[derive(Deserialize)]
struct GraphSpec {
    #[serde(default)]
    nodes: Vec<GraphNode>,
    #[serde(default)]
    edges: Vec<GraphEdge>,
}

/// Plan graph as carried by a plan document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "GraphSpec")]
pub struct PlanGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    #[serde(skip)]
    positions: HashMap<String, usize>,
    #[serde(skip)]
    incoming: HashMap<String, Vec<usize>>,
}

impl PlanGraph {
    /// Builds a graph from nodes and edges.
    ///
    /// When two nodes share an id the first one wins edge resolution.
    #[must_use]
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        let mut positions = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            positions.entry(node.id.clone()).or_insert(i);
        }

        let mut incoming: HashMap<String, Vec<usize>> = HashMap::new();
        for edge in &edges {
            match positions.get(&edge.source) {
                Some(&source) if positions.contains_key(&edge.target) => {
                    incoming.entry(edge.target.clone()).or_default().push(source);
                }
                _ => debug!("Ignoring dangling edge {} -> {}", edge.source, edge.target),
            }
        }

        Self {
            nodes,
            edges,
            positions,
            incoming,
        }
    }

    /// Returns the nodes in document order.
    #[must_use]
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Returns the edges in document order.
    #[must_use]
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Number of edges whose endpoints do not both resolve to nodes.
    #[must_use]
    pub fn dangling_edges(&self) -> usize {
        self.edges
            .iter()
            .filter(|e| {
                !self.positions.contains_key(&e.source) || !self.positions.contains_key(&e.target)
            })
            .count()
    }
}

impl From<GraphSpec> for PlanGraph {
    fn from(spec: GraphSpec) -> Self {
        Self::new(spec.nodes, spec.edges)
    }
}

impl DependencyGraph for PlanGraph {
    type Node = GraphNode;

    fn vertices(&self) -> Vec<&GraphNode> {
        self.nodes.iter().collect()
    }

    fn edges_to(&self, node: &GraphNode) -> Vec<&GraphNode> {
        self.incoming
            .get(&node.id)
            .map(|sources| sources.iter().filter_map(|&i| self.nodes.get(i)).collect())
            .unwrap_or_default()
    }
}

impl PlanNode for GraphNode {
    fn is_resource(&self) -> bool {
        self.kind == NodeKind::Resource
    }

    fn resource_address(&self) -> Option<&str> {
        self.address.as_deref().filter(|a| !a.trim().is_empty())
    }

    fn resource_mode(&self) -> Option<ResourceMode> {
        self.mode
    }

    fn label(&self) -> String {
        format!("{} node '{}'", self.kind, self.id)
    }
}

impl fmt::Display for ResourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Managed => "managed",
            Self::Data => "data",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Resource => "resource",
            Self::Provider => "provider",
            Self::Local => "local",
            Self::Output => "output",
            Self::Module => "module",
            Self::Variable => "variable",
            Self::Other => "other",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> PlanGraph {
        serde_json::from_str(json).expect("graph should parse")
    }

    #[test]
    fn test_parse_graph() {
        let graph = parse(
            r#"{
                "nodes": [
                    {"id": "p", "kind": "provider"},
                    {"id": "w", "kind": "resource", "address": "aws_instance.web", "mode": "managed"},
                    {"id": "x", "kind": "root_module_close"}
                ],
                "edges": [{"source": "p", "target": "w"}]
            }"#,
        );

        assert_eq!(graph.nodes().len(), 3);
        assert_eq!(graph.nodes()[2].kind, NodeKind::Other);
        assert!(graph.nodes()[1].is_resource());
        assert_eq!(graph.nodes()[1].resource_mode(), Some(ResourceMode::Managed));
        assert!(!graph.nodes()[0].is_resource());
    }

    #[test]
    fn test_edges_to_returns_sources_of_incoming_edges() {
        let graph = parse(
            r#"{
                "nodes": [
                    {"id": "a", "kind": "resource", "address": "a.a", "mode": "managed"},
                    {"id": "b", "kind": "resource", "address": "b.b", "mode": "managed"},
                    {"id": "c", "kind": "resource", "address": "c.c", "mode": "managed"}
                ],
                "edges": [
                    {"source": "a", "target": "c"},
                    {"source": "b", "target": "c"},
                    {"source": "c", "target": "b"}
                ]
            }"#,
        );

        let c = &graph.nodes()[2];
        let sources: Vec<&str> = graph.edges_to(c).iter().map(|n| n.id.as_str()).collect();
        assert_eq!(sources, vec!["a", "b"]);

        let a = &graph.nodes()[0];
        assert!(graph.edges_to(a).is_empty());
    }

    #[test]
    fn test_dangling_edges_are_ignored() {
        let graph = parse(
            r#"{
                "nodes": [{"id": "a", "kind": "resource", "address": "a.a", "mode": "data"}],
                "edges": [{"source": "ghost", "target": "a"}]
            }"#,
        );

        assert_eq!(graph.dangling_edges(), 1);
        let a = &graph.nodes()[0];
        assert!(graph.edges_to(a).is_empty());
    }

    #[test]
    fn test_blank_address_is_unusable() {
        let node = GraphNode {
            id: String::from("n"),
            kind: NodeKind::Resource,
            address: Some(String::from("  ")),
            mode: Some(ResourceMode::Managed),
        };
        assert_eq!(node.resource_address(), None);
    }

    #[test]
    fn test_empty_graph() {
        let graph = parse("{}");
        assert!(graph.vertices().is_empty());
    }
}
