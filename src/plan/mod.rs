//! Upstream plan contract.
//!
//! Everything the extractor consumes from the plan engine lives here: the
//! dependency graph, the change records and the dynamically typed attribute
//! values they carry, plus the reader for serialized plan documents.

mod changes;
mod document;
mod graph;
mod value;

pub use changes::{Action, ChangeEnvelope, DecodeError, InstanceKey, ResourceChange, SINGLETON_KEY};
pub use document::{PlanDocument, PlanReader};
pub use graph::{DependencyGraph, GraphEdge, GraphNode, NodeKind, PlanGraph, PlanNode, ResourceMode};
pub use value::{AttrMap, AttrValue, changed_attributes};
